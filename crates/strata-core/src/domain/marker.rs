//! Two-phase resolution of the generation marker type.

use serde::Serialize;

use crate::domain::{entities::symbol::SymbolTable, value_objects::QualifiedName};

/// Default marker annotation type.
pub const DEFAULT_MARKER: &str = "Strata.Annotations.GenerateCrudAttribute";

/// Outcome of [`resolve_marker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum MarkerResolution {
    /// A declared type has exactly the expected qualified name.
    Exact(QualifiedName),
    /// Found by simple name during the depth-first scan.
    Fallback(QualifiedName),
    /// Nothing declared matches; generation is skipped for the run.
    Absent,
}

impl MarkerResolution {
    pub fn marker(&self) -> Option<&QualifiedName> {
        match self {
            Self::Exact(name) | Self::Fallback(name) => Some(name),
            Self::Absent => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Resolve `expected` against the declared types.
///
/// Exact qualified-name match first. On a miss, the first type in
/// depth-first namespace order whose simple name equals the expected simple
/// name (ignoring case) wins. That order follows declaration order, so
/// reordering source files can change which type a fallback picks.
pub fn resolve_marker(table: &SymbolTable, expected: &QualifiedName) -> MarkerResolution {
    if let Some(found) = table.find(expected.as_str()) {
        return MarkerResolution::Exact(found.qualified_name());
    }

    let simple = expected.simple_name();
    table
        .types()
        .into_iter()
        .find(|t| t.simple_name.eq_ignore_ascii_case(simple))
        .map(|t| MarkerResolution::Fallback(t.qualified_name()))
        .unwrap_or(MarkerResolution::Absent)
}
