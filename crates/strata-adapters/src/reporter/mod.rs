//! Reporter adapters.

mod collecting;

pub use collecting::CollectingReporter;
