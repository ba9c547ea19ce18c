//! Generation registry state.
//!
//! The registry is the durable record of every entity the generator has
//! emitted artifacts for. It only ever grows: nothing in this crate removes
//! or edits an entry once written. Persistence lives behind the
//! `RegistryStore` port; this module is the pure state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// One generated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub name: String,
    pub include_soft_delete: bool,
    pub generated_on: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, include_soft_delete: bool, generated_on: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            include_soft_delete,
            generated_on,
        }
    }
}

/// Ordered sequence of entries, persisted under a top-level `entities` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    entities: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entities: Vec<RegistryEntry>) -> Self {
        Self { entities }
    }

    /// Exact, case-sensitive containment check.
    pub fn already_generated(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name == name)
    }

    /// Return the registry extended with `entries`, in order. Entries whose
    /// name is already present (or repeated within `entries`) are dropped so
    /// names stay unique and existing entries stay untouched.
    pub fn append(&self, entries: impl IntoIterator<Item = RegistryEntry>) -> Registry {
        let mut known = self.names();
        let mut entities = self.entities.clone();
        for entry in entries {
            if known.insert(entry.name.clone()) {
                entities.push(entry);
            }
        }
        Registry { entities }
    }

    pub fn names(&self) -> HashSet<String> {
        self.entities.iter().map(|e| e.name.clone()).collect()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Names must be unique and non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for entry in &self.entities {
            if entry.name.trim().is_empty() {
                return Err(DomainError::InvalidEntityName {
                    name: entry.name.clone(),
                    reason: "registry entry has an empty name".into(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(DomainError::DuplicateRegistryEntry {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn containment_is_case_sensitive() {
        let registry = Registry::new().append([RegistryEntry::new("Customer", false, at(1))]);
        assert!(registry.already_generated("Customer"));
        assert!(!registry.already_generated("customer"));
    }

    #[test]
    fn append_is_pure_and_monotonic() {
        let before = Registry::new().append([RegistryEntry::new("Customer", false, at(1))]);
        let after = before.append([
            RegistryEntry::new("Order", true, at(2)),
            RegistryEntry::new("Customer", true, at(3)),
        ]);

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert!(before.names().is_subset(&after.names()));
        // the original Customer entry is not replaced
        assert_eq!(after.entries()[0], before.entries()[0]);
    }

    #[test]
    fn append_nothing_returns_equal_registry() {
        let registry = Registry::new().append([RegistryEntry::new("Customer", false, at(1))]);
        assert_eq!(registry.append(Vec::new()), registry);
    }

    #[test]
    fn validate_rejects_duplicates() {
        let registry = Registry::from_entries(vec![
            RegistryEntry::new("Customer", false, at(1)),
            RegistryEntry::new("Customer", false, at(2)),
        ]);
        assert!(matches!(
            registry.validate(),
            Err(DomainError::DuplicateRegistryEntry { .. })
        ));
    }

    #[test]
    fn serialises_with_entities_key_and_camel_case() {
        let registry = Registry::new().append([RegistryEntry::new("Order", true, at(4))]);
        let json = serde_json::to_value(&registry).unwrap();

        assert_eq!(json["entities"][0]["name"], "Order");
        assert_eq!(json["entities"][0]["includeSoftDelete"], true);
        assert_eq!(json["entities"][0]["generatedOn"], "2026-03-01T04:00:00Z");
    }
}
