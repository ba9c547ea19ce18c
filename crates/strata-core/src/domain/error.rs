// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("Invalid entity name '{name}': {reason}")]
    InvalidEntityName { name: String, reason: String },

    #[error("Invalid marker name '{name}': {reason}")]
    InvalidMarkerName { name: String, reason: String },

    #[error("Unknown data-access provider '{0}'")]
    UnknownProvider(String),

    #[error("Duplicate registry entry: {name}")]
    DuplicateRegistryEntry { name: String },

    // ========================================================================
    // Document Errors
    // ========================================================================
    #[error("Unbalanced marker block {start}…{end}: {reason}")]
    UnbalancedBlock {
        start: String,
        end: String,
        reason: String,
    },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidModuleName { name, reason } => vec![
                format!("'{}' cannot be used as a module name: {}", name, reason),
                "Module names are dotted C# identifiers, e.g. Shop or Acme.Billing".into(),
                "Pass --module explicitly if the directory name differs".into(),
            ],
            Self::UnknownProvider(value) => vec![
                format!("'{}' is not a supported provider", value),
                "Supported providers:".into(),
                "  • postgresql (aliases: postgres, pg)".into(),
                "  • sqlserver  (aliases: mssql, sql-server)".into(),
                "  • oracle".into(),
            ],
            Self::InvalidMarkerName { name, .. } => vec![
                format!("Marker '{}' is not a qualified type name", name),
                "Set generator.marker to e.g. Acme.Annotations.GenerateCrudAttribute".into(),
            ],
            Self::UnbalancedBlock { start, end, .. } => vec![
                format!("The file contains an unmatched {} / {} tag", start, end),
                "Remove the stray tag by hand and run the command again".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModuleName { .. }
            | Self::InvalidEntityName { .. }
            | Self::InvalidMarkerName { .. }
            | Self::UnknownProvider(_) => ErrorCategory::Validation,
            Self::UnbalancedBlock { .. } => ErrorCategory::Conflict,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
