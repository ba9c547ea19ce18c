//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, WiringService,
//!   ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Events**: Progress values handed to the host's reporter
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod events;
pub mod ports;
pub mod services;

pub use services::{
    DEFAULT_TEMPLATE, GenerationOptions, GenerationReport, GenerationService, ScaffoldReport,
    ScaffoldService, StepStatus, WiringReport, WiringService, WiringStep,
};

pub use ports::{
    ArtifactRenderer, Filesystem, RegistryStore, Reporter, ScaffoldOutcome, ScaffoldRequest,
    Scaffolder, SourceLoader,
};

pub use error::ApplicationError;
pub use events::{BlockKind, GenerationEvent, Placement, Severity};
