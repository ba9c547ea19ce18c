//! Entity discovery: filter the symbol table down to marked types.

use crate::domain::{
    entities::{entity::EntityCandidate, registry::Registry, symbol::SymbolTable},
    value_objects::{KeyType, QualifiedName},
};

/// Every declared type carrying `marker`, in traversal order.
///
/// Types that share a simple name across namespaces are all returned; see
/// [`partition_new`] for how that plays out downstream.
pub fn discover_entities(
    table: &SymbolTable,
    marker: &QualifiedName,
    fallback_key: &KeyType,
) -> Vec<EntityCandidate> {
    table
        .types()
        .into_iter()
        .filter(|t| t.has_annotation(marker))
        .map(|t| EntityCandidate::from_declaration(t, fallback_key))
        .collect()
}

/// Split candidates into (new, already generated) by exact registry name.
pub fn partition_new(
    candidates: Vec<EntityCandidate>,
    registry: &Registry,
) -> (Vec<EntityCandidate>, Vec<EntityCandidate>) {
    candidates
        .into_iter()
        .partition(|c| !registry.already_generated(&c.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        registry::RegistryEntry,
        symbol::{TypeDeclaration, TypeKind},
    };
    use chrono::Utc;

    const MARKER: &str = "Shop.Annotations.GenerateCrudAttribute";

    fn table() -> SymbolTable {
        SymbolTable::new()
            .with(
                TypeDeclaration::new("Customer", "Shop.Entities", TypeKind::Class)
                    .with_member("Id", "int")
                    .with_annotation(MARKER),
            )
            .with(
                TypeDeclaration::new("Order", "Shop.Entities", TypeKind::Class)
                    .with_member("id", "Guid")
                    .with_annotation("System.SerializableAttribute")
                    .with_annotation("shop.annotations.generatecrudattribute"),
            )
            .with(TypeDeclaration::new("Audit", "Shop.Entities", TypeKind::Class).with_member("Id", "long"))
            .with(
                TypeDeclaration::new("Invoice", "Shop.Billing", TypeKind::Record)
                    .with_annotation(MARKER),
            )
    }

    #[test]
    fn only_marked_types_are_candidates() {
        let found = discover_entities(&table(), &QualifiedName::new(MARKER), &KeyType::default());
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order", "Invoice"]);
    }

    #[test]
    fn keys_inferred_or_defaulted() {
        let found = discover_entities(&table(), &QualifiedName::new(MARKER), &KeyType::new("int"));
        let key = |name: &str| {
            found
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.primary_key.as_str().to_string())
        };
        assert_eq!(key("Order").as_deref(), Some("Guid"));
        assert_eq!(key("Customer").as_deref(), Some("int"));
        assert_eq!(key("Invoice").as_deref(), Some("int"));
    }

    #[test]
    fn cross_namespace_collisions_are_kept() {
        let table = SymbolTable::new()
            .with(TypeDeclaration::new("Item", "Shop.A", TypeKind::Class).with_annotation(MARKER))
            .with(TypeDeclaration::new("Item", "Shop.B", TypeKind::Class).with_annotation(MARKER));

        let found = discover_entities(&table, &QualifiedName::new(MARKER), &KeyType::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].namespace, "Shop.A");
    }

    #[test]
    fn partition_uses_registry_names() {
        let found = discover_entities(&table(), &QualifiedName::new(MARKER), &KeyType::default());
        let registry = Registry::new().append([RegistryEntry::new("Customer", false, Utc::now())]);

        let (fresh, known) = partition_new(found, &registry);
        assert_eq!(fresh.len(), 2);
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].name, "Customer");
    }
}
