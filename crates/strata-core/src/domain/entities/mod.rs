pub mod artifact;
pub mod document;
pub mod entity;
pub mod layout;
pub mod registry;
pub mod symbol;

pub use crate::domain::DomainError;
pub use artifact::{ArtifactKind, EmissionContext, GeneratedArtifact};
pub use document::{MarkedDocument, TagPair};
pub use entity::EntityCandidate;
pub use layout::ModuleLayout;
pub use registry::{Registry, RegistryEntry};
pub use symbol::{SymbolTable, TypeDeclaration};
