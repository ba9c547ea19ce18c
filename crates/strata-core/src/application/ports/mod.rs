//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `SourceLoader`: Source tree to symbol table
//!   - `RegistryStore`: Registry persistence
//!   - `ArtifactRenderer`: Service/controller text
//!   - `Reporter`: Progress events for the host
//!   - `Scaffolder`: External project templating tool
//!
//! - **Driving (Input) Ports**: Called by the CLI, implemented by services

pub mod output;

pub use output::{
    ArtifactRenderer, Filesystem, RegistryStore, Reporter, ScaffoldOutcome, ScaffoldRequest,
    Scaffolder, SourceLoader,
};

#[cfg(test)]
pub use output::{
    MockArtifactRenderer, MockFilesystem, MockRegistryStore, MockReporter, MockScaffolder,
    MockSourceLoader,
};
