//! Domain value objects: Provider, KeyType, QualifiedName.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! Provider-specific text (package names, registration calls) lives in
//! `providers.rs`; this file only defines the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Provider ─────────────────────────────────────────────────────────────────

/// A supported data-access provider.
///
/// To add a provider: add a variant here, then add a `ProviderDef` in
/// `providers.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    PostgreSql,
    SqlServer,
    Oracle,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Self::PostgreSql, Self::SqlServer, Self::Oracle];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PostgreSql => "postgresql",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::PostgreSql
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSql),
            "sqlserver" | "sql-server" | "mssql" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

// ── KeyType ──────────────────────────────────────────────────────────────────

/// The C# type used for an entity's primary key (`int`, `Guid`, `long`, ...).
///
/// Stored as written in source; two key types compare equal only when their
/// text matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyType(String);

impl KeyType {
    pub const DEFAULT_FALLBACK: &'static str = "int";

    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeyType {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FALLBACK)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── QualifiedName ────────────────────────────────────────────────────────────

/// A dotted, namespace-qualified type name such as `Shop.Domain.Customer`.
///
/// Comparison through [`QualifiedName::matches`] is ASCII case-insensitive;
/// `PartialEq` stays exact so the name can be used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Join a namespace and a simple name; an empty namespace means global.
    pub fn join(namespace: &str, simple: &str) -> Self {
        if namespace.is_empty() {
            Self(simple.to_string())
        } else {
            Self(format!("{namespace}.{simple}"))
        }
    }

    /// Last dotted segment.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last dot, or `""` for global names.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }

    pub fn matches(&self, other: &QualifiedName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a configured marker name. Rejects empty segments and anything
    /// that is not a dotted identifier.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::InvalidMarkerName {
                name: value.into(),
                reason: "name is empty".into(),
            });
        }
        if let Some(segment) = value.split('.').find(|s| !is_identifier(s)) {
            return Err(DomainError::InvalidMarkerName {
                name: value.into(),
                reason: format!("'{segment}' is not an identifier"),
            });
        }
        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `true` when `s` is a plain C# identifier (letters, digits, `_`; not starting
/// with a digit). The verbatim `@` prefix is accepted.
pub fn is_identifier(s: &str) -> bool {
    let s = s.strip_prefix('@').unwrap_or(s);
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
