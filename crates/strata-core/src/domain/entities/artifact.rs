//! Generated artifacts and the context they are rendered from.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use super::{entity::EntityCandidate, layout::ModuleLayout};

/// Which of the two per-entity artifacts a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Service,
    Controller,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [Self::Service, Self::Controller];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Controller => "controller",
        }
    }

    /// Target path under the module layout.
    pub fn path_for(&self, layout: &ModuleLayout, entity: &str) -> PathBuf {
        match self {
            Self::Service => layout.service_file(entity),
            Self::Controller => layout.controller_file(entity),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered text plus the path it belongs at.
///
/// Written only when nothing exists at `path` yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub entity: String,
    pub path: PathBuf,
    pub content: String,
}

/// Everything an artifact renderer may read.
///
/// ## Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `MODULE` | `Shop` |
/// | `ENTITY` | `Order` |
/// | `ENTITY_CAMEL` | `order` |
/// | `ENTITY_NAMESPACE` | `Shop.Domain.Entities` |
/// | `KEY_TYPE` | `Guid` |
/// | `SERVICE_NAMESPACE` | `Shop.Application.Services.Order` |
/// | `CONTROLLER_NAMESPACE` | `Shop.API.Controllers` |
/// | `REPOSITORY_NAMESPACE` | `Shop.Application.Common.Interfaces` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionContext {
    entity: EntityCandidate,
    soft_delete: bool,
    /// Ordered so rendering is independent of hashing.
    variables: BTreeMap<&'static str, String>,
}

impl EmissionContext {
    pub fn new(layout: &ModuleLayout, entity: &EntityCandidate, soft_delete: bool) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("MODULE", layout.name().to_string());
        variables.insert("ENTITY", entity.name.clone());
        variables.insert("ENTITY_CAMEL", to_camel_case(&entity.name));
        variables.insert("ENTITY_NAMESPACE", entity.namespace.clone());
        variables.insert("KEY_TYPE", entity.primary_key.to_string());
        variables.insert("SERVICE_NAMESPACE", layout.service_namespace(&entity.name));
        variables.insert("CONTROLLER_NAMESPACE", layout.controller_namespace());
        variables.insert("REPOSITORY_NAMESPACE", layout.repository_namespace());

        Self {
            entity: entity.clone(),
            soft_delete,
            variables,
        }
    }

    pub fn entity(&self) -> &EntityCandidate {
        &self.entity
    }

    pub fn soft_delete(&self) -> bool {
        self.soft_delete
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `{{VARIABLE}}` placeholders. Unknown placeholders are left as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

/// `OrderLine` → `orderLine`; used for parameter and field names.
pub fn to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
