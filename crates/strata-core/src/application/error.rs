//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Domain module root or its project descriptor is missing.
    #[error("Module not found at {path}")]
    ModuleNotFound { path: PathBuf },

    /// Registry document exists but does not parse.
    #[error("Generation registry at {path} is corrupt: {reason}")]
    RegistryCorrupt { path: PathBuf, reason: String },

    /// Writing a generated artifact failed; earlier artifacts were kept.
    #[error("Failed to write artifact for '{entity}' at {path}: {reason}")]
    ArtifactWriteFailure {
        entity: String,
        path: PathBuf,
        reason: String,
    },

    /// A file the wiring step patches does not exist.
    #[error("Target file not found: {path}")]
    TargetFileNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The external project templating tool failed.
    #[error("Scaffolding '{name}' failed: {reason}")]
    ScaffoldFailed { name: String, reason: String },

    /// Shared adapter state was poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ModuleNotFound { path } => vec![
                format!("No domain project found at {}", path.display()),
                "Run the command from the solution root, or pass ROOT explicitly".into(),
                "Use --module if the module name differs from the directory name".into(),
            ],
            Self::RegistryCorrupt { path, .. } => vec![
                format!("Inspect or repair {}", path.display()),
                "The file must be JSON with a top-level \"entities\" array".into(),
                "Deleting it makes every marked entity count as new (existing files are still kept)"
                    .into(),
            ],
            Self::ArtifactWriteFailure { path, .. } => vec![
                format!("Could not write {}", path.display()),
                "Entities written before the failure were registered; rerun after fixing permissions"
                    .into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ScaffoldFailed { .. } => vec![
                "Make sure the dotnet SDK is installed and on PATH".into(),
                "Check that the template name is installed: dotnet new list".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::TargetFileNotFound { path } => {
                vec![format!("Create {} or rerun the scaffold", path.display())]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModuleNotFound { .. } | Self::TargetFileNotFound { .. } => ErrorCategory::NotFound,
            Self::RegistryCorrupt { .. } => ErrorCategory::Conflict,
            Self::ArtifactWriteFailure { .. }
            | Self::FilesystemError { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
            Self::ScaffoldFailed { .. } => ErrorCategory::External,
        }
    }
}
