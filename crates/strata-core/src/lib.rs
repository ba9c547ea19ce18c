//! Strata Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the Strata incremental entity-artifact
//! generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │  (config, logging, Reporter impl)       │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, WiringService, ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, SourceLoader, Registry...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    strata-adapters (Infrastructure)     │
//! │ (LocalFilesystem, CSharpSourceLoader)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (SymbolTable, Registry, MarkedDocument) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strata_core::prelude::*;
//!
//! let layout = ModuleLayout::new("./Shop", None)?;
//! let service = GenerationService::new(loader, store, renderer, filesystem, reporter);
//! let report = service.generate(&layout, &GenerationOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationEvent, GenerationOptions, GenerationReport, GenerationService, ScaffoldService,
        Severity, WiringReport, WiringService,
        ports::{ArtifactRenderer, Filesystem, RegistryStore, Reporter, Scaffolder, SourceLoader},
    };
    pub use crate::domain::{
        ArtifactKind, EmissionContext, EntityCandidate, KeyType, ModuleLayout, Provider,
        QualifiedName, Registry, RegistryEntry, SymbolTable,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
