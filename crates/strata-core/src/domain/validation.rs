use crate::domain::{
    entities::entity::EntityCandidate,
    error::DomainError,
    value_objects::is_identifier,
};

/// Centralized domain validation.
///
/// Entry points the application layer calls before trusting data that came
/// from disk or from configuration.
pub struct DomainValidator;

impl DomainValidator {
    /// Entity names become file and type names, so they must be identifiers.
    pub fn validate_entity(candidate: &EntityCandidate) -> Result<(), DomainError> {
        if !is_identifier(&candidate.name) {
            return Err(DomainError::InvalidEntityName {
                name: candidate.name.clone(),
                reason: "not a valid identifier".into(),
            });
        }
        if candidate.primary_key.as_str().trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "primary key type" });
        }
        Ok(())
    }
}
