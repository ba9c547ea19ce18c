//! JSON-backed generation registry.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "entities": [
//!     { "name": "Customer", "includeSoftDelete": false, "generatedOn": "2026-03-01T10:00:00Z" }
//!   ]
//! }
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::{debug, instrument};

use strata_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, RegistryStore},
    },
    domain::Registry,
    error::StrataResult,
};

/// Why a registry document could not be used.
#[derive(Debug, Error)]
enum RegistryDocumentError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] strata_core::domain::DomainError),
}

pub struct JsonRegistryStore {
    filesystem: Box<dyn Filesystem>,
}

impl JsonRegistryStore {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }
}

fn decode(text: &str) -> Result<Registry, RegistryDocumentError> {
    let registry: Registry = serde_json::from_str(text)?;
    registry.validate()?;
    Ok(registry)
}

impl RegistryStore for JsonRegistryStore {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn load(&self, path: &Path) -> StrataResult<Registry> {
        if !self.filesystem.exists(path) {
            debug!("No registry document; starting empty");
            return Ok(Registry::new());
        }

        let text = self.filesystem.read_file(path)?;
        let registry = decode(&text).map_err(|e| ApplicationError::RegistryCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(entries = registry.len(), "Registry loaded");
        Ok(registry)
    }

    #[instrument(skip_all, fields(path = %path.display(), entries = registry.len()))]
    fn save(&self, path: &Path, registry: &Registry) -> StrataResult<()> {
        let mut text = serde_json::to_string_pretty(registry).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to serialize registry: {e}"),
            }
        })?;
        text.push('\n');

        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use chrono::{TimeZone, Utc};
    use strata_core::{domain::RegistryEntry, error::StrataError};

    const PATH: &str = "/m/src/M.Application/Services/.generation-registry.json";

    fn store(fs: &MemoryFilesystem) -> JsonRegistryStore {
        JsonRegistryStore::new(Box::new(fs.clone()))
    }

    #[test]
    fn missing_document_is_empty() {
        let fs = MemoryFilesystem::new();
        let registry = store(&fs).load(Path::new(PATH)).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn save_writes_stable_camel_case_document() {
        let fs = MemoryFilesystem::new();
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let registry = Registry::new().append([RegistryEntry::new("Customer", true, when)]);

        store(&fs).save(Path::new(PATH), &registry).unwrap();

        let text = fs.get(PATH).unwrap();
        assert_eq!(
            text,
            "{\n  \"entities\": [\n    {\n      \"name\": \"Customer\",\n      \"includeSoftDelete\": true,\n      \"generatedOn\": \"2026-03-01T10:00:00Z\"\n    }\n  ]\n}\n"
        );
        assert_eq!(store(&fs).load(Path::new(PATH)).unwrap(), registry);
    }

    #[test]
    fn unparsable_document_is_corrupt() {
        let fs = MemoryFilesystem::new().with_file(PATH, "{ \"entities\": [ { \"name\": 3 } ] }");
        let err = store(&fs).load(Path::new(PATH)).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::RegistryCorrupt { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_corrupt() {
        let entry = r#"{ "name": "A", "includeSoftDelete": false, "generatedOn": "2026-03-01T10:00:00Z" }"#;
        let fs = MemoryFilesystem::new()
            .with_file(PATH, &format!("{{ \"entities\": [ {entry}, {entry} ] }}"));
        let err = store(&fs).load(Path::new(PATH)).unwrap_err();
        assert!(err.to_string().contains("Duplicate"), "{err}");
    }

    #[test]
    fn document_without_entities_key_is_empty() {
        let fs = MemoryFilesystem::new().with_file(PATH, "{}");
        assert!(store(&fs).load(Path::new(PATH)).unwrap().is_empty());
    }
}
