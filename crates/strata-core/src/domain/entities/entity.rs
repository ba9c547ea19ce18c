use std::fmt;

use crate::domain::{
    entities::symbol::TypeDeclaration,
    value_objects::{KeyType, QualifiedName},
};

/// Member name that carries the primary key.
pub const KEY_MEMBER: &str = "Id";

/// A declared type carrying the generation marker.
///
/// Ephemeral: rebuilt from source on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCandidate {
    pub name: String,
    pub namespace: String,
    pub primary_key: KeyType,
    /// `false` when `primary_key` came from the fallback.
    pub key_inferred: bool,
}

impl EntityCandidate {
    /// Build a candidate from a declaration. The key type is the type of the
    /// `Id` member (any casing), else `fallback`.
    pub fn from_declaration(declaration: &TypeDeclaration, fallback: &KeyType) -> Self {
        let (primary_key, key_inferred) = match declaration.member(KEY_MEMBER) {
            Some(member) => (KeyType::new(member.type_ref.clone()), true),
            None => (fallback.clone(), false),
        };

        Self {
            name: declaration.simple_name.clone(),
            namespace: declaration.containing_namespace.clone(),
            primary_key,
            key_inferred,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::join(&self.namespace, &self.name)
    }
}

impl fmt::Display for EntityCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (key: {})", self.qualified_name(), self.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::symbol::TypeKind;

    #[test]
    fn key_type_comes_from_id_member() {
        let decl = TypeDeclaration::new("Order", "Shop.Domain", TypeKind::Class)
            .with_member("Id", "Guid")
            .with_member("Total", "decimal");

        let candidate = EntityCandidate::from_declaration(&decl, &KeyType::default());
        assert_eq!(candidate.primary_key.as_str(), "Guid");
        assert!(candidate.key_inferred);
        assert_eq!(candidate.qualified_name().as_str(), "Shop.Domain.Order");
    }

    #[test]
    fn missing_id_uses_fallback() {
        let decl = TypeDeclaration::new("Invoice", "Shop.Domain", TypeKind::Class)
            .with_member("InvoiceId", "long");

        let candidate = EntityCandidate::from_declaration(&decl, &KeyType::new("int"));
        assert_eq!(candidate.primary_key.as_str(), "int");
        assert!(!candidate.key_inferred);
    }
}
