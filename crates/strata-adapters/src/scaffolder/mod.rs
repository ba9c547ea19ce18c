//! Boundary to the external project templating tool.

mod process;

pub use process::ProcessScaffolder;
