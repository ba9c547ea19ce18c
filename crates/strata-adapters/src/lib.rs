//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod registry_store;
pub mod renderer;
pub mod reporter;
pub mod scaffolder;
pub mod source;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use registry_store::JsonRegistryStore;
pub use renderer::CSharpArtifactRenderer;
pub use reporter::CollectingReporter;
pub use scaffolder::ProcessScaffolder;
pub use source::CSharpSourceLoader;
