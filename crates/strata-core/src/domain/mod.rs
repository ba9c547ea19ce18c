//! Core domain layer for Strata.
//!
//! Pure logic only: the symbol model, marker resolution, entity discovery,
//! registry state, artifact layout and the marked-document patch policies.
//! All I/O sits behind the ports in the application layer.
//!
//! - **No I/O**: no filesystem, process or network calls
//! - **Synchronous**: every function runs to completion
//! - **Value types**: domain objects are `Clone + PartialEq`
pub mod discovery;
pub mod entities;
pub mod error;
pub mod marker;
pub mod providers;
pub mod value_objects;
pub mod wiring;

mod validation;

pub use discovery::{discover_entities, partition_new};
pub use entities::{
    artifact::{ArtifactKind, EmissionContext, GeneratedArtifact},
    document::{MarkedDocument, PROVIDER_TAGS, REGISTRATION_TAGS, TagPair},
    entity::EntityCandidate,
    layout::ModuleLayout,
    registry::{Registry, RegistryEntry},
    symbol::{Member, ResolutionScope, SymbolTable, TypeDeclaration, TypeKind},
};
pub use error::{DomainError, ErrorCategory};
pub use marker::{DEFAULT_MARKER, MarkerResolution, resolve_marker};
pub use providers::{ProviderDef, find_provider};
pub use validation::DomainValidator;
pub use value_objects::{KeyType, Provider, QualifiedName};
pub use wiring::{IncludeOutcome, RegistrationAnchor, SectionPlacement};
