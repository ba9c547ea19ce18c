//! Progress events emitted by the application services.
//!
//! Services never print. Every skip, fallback and partial failure becomes a
//! [`GenerationEvent`] handed to the host's `Reporter`.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{ArtifactKind, IncludeOutcome, Provider, RegistrationAnchor, SectionPlacement};

/// How much attention an event deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something was done.
    Info,
    /// Nothing to do.
    Skip,
    /// Could not proceed as intended.
    Warning,
}

/// Which marked region or line a wiring step touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    ServicesInclude,
    ProviderReference,
    Registration,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ServicesInclude => "services include",
            Self::ProviderReference => "provider reference",
            Self::Registration => "provider registration",
        })
    }
}

/// Where a wiring step placed its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Placement {
    Include(IncludeOutcome),
    Section(SectionPlacement),
    Anchor(RegistrationAnchor),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GenerationEvent {
    EntityGenerated {
        entity: String,
        key_type: String,
        files: Vec<PathBuf>,
    },
    ArtifactSkipped {
        entity: String,
        kind: ArtifactKind,
        path: PathBuf,
    },
    AlreadyGenerated {
        entity: String,
    },
    /// The pass stopped here; entities written before it are still committed.
    ArtifactWriteFailed {
        entity: String,
        reason: String,
    },
    NoNewEntities,
    MarkerUnresolved {
        marker: String,
    },
    MarkerFallback {
        expected: String,
        resolved: String,
    },
    RegistryUpdated {
        path: PathBuf,
        added: Vec<String>,
    },
    TargetFileNotFound {
        path: PathBuf,
    },
    BlockInjected {
        path: PathBuf,
        block: BlockKind,
        placement: Placement,
        provider: Option<Provider>,
    },
    AnchorNotFound {
        path: PathBuf,
    },
    IncludeAlreadyPresent {
        path: PathBuf,
    },
    BlockUnbalanced {
        path: PathBuf,
        block: BlockKind,
        reason: String,
    },
}

impl GenerationEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EntityGenerated { .. } | Self::RegistryUpdated { .. } | Self::BlockInjected { .. } => {
                Severity::Info
            }
            Self::ArtifactSkipped { .. }
            | Self::AlreadyGenerated { .. }
            | Self::NoNewEntities
            | Self::IncludeAlreadyPresent { .. } => Severity::Skip,
            Self::MarkerUnresolved { .. }
            | Self::ArtifactWriteFailed { .. }
            | Self::MarkerFallback { .. }
            | Self::TargetFileNotFound { .. }
            | Self::AnchorNotFound { .. }
            | Self::BlockUnbalanced { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for GenerationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityGenerated { entity, key_type, .. } => {
                write!(f, "Generated service and controller for {entity} (key: {key_type})")
            }
            Self::ArtifactSkipped { entity, kind, path } => write!(
                f,
                "Skipped {kind} for {entity}: {} already exists",
                path.display()
            ),
            Self::AlreadyGenerated { entity } => write!(f, "{entity} was already generated"),
            Self::ArtifactWriteFailed { entity, reason } => {
                write!(f, "Stopped at {entity}: {reason}")
            }
            Self::NoNewEntities => f.write_str("No new entities to generate"),
            Self::MarkerUnresolved { marker } => write!(
                f,
                "Marker type {marker} not found; skipping generation"
            ),
            Self::MarkerFallback { expected, resolved } => write!(
                f,
                "Marker {expected} not found by exact name; using {resolved}"
            ),
            Self::RegistryUpdated { added, .. } => {
                write!(f, "Registered {} new entit{}", added.len(), if added.len() == 1 { "y" } else { "ies" })
            }
            Self::TargetFileNotFound { path } => {
                write!(f, "Cannot wire {}: file not found", path.display())
            }
            Self::BlockInjected { path, block, .. } => {
                write!(f, "Wrote {block} into {}", path.display())
            }
            Self::AnchorNotFound { path } => write!(
                f,
                "No insertion anchor in {}; appended registration at end of file",
                path.display()
            ),
            Self::IncludeAlreadyPresent { path } => {
                write!(f, "Services include already present in {}", path.display())
            }
            Self::BlockUnbalanced { path, block, reason } => {
                write!(f, "Cannot replace {block} in {}: {reason}", path.display())
            }
        }
    }
}
