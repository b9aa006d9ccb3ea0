//! Mutable, under-construction model.
//!
//! `ModelConfiguration` is what the builder fills in. It enforces identifier
//! uniqueness as types are added and is consumed by [`ModelConfiguration::seal`]
//! into a [`SealedModel`], which carries the derived indices and has no
//! mutating operations.

use crate::error::{DuplicateTypeError, ValidationError};
use crate::model::key::DefinitionKey;
use crate::model::{EntityType, SealedModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModelWire")]
/// Entity types in declaration order, unique by identifier regardless of case.
pub struct ModelConfiguration {
    entities: Vec<EntityType>,
    #[serde(skip)]
    identifiers: BTreeSet<DefinitionKey>,
    #[serde(skip)]
    namespaces: BTreeSet<DefinitionKey>,
}

#[derive(Deserialize)]
struct ModelWire {
    #[serde(default)]
    entities: Vec<EntityType>,
}

impl TryFrom<ModelWire> for ModelConfiguration {
    type Error = DuplicateTypeError;

    fn try_from(wire: ModelWire) -> Result<Self, Self::Error> {
        let mut model = ModelConfiguration::new();
        for entity in wire.entities {
            model.add_entity_type(entity)?;
        }
        Ok(model)
    }
}

impl ModelConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type.
    ///
    /// Fails when a type with the same identifier (ignoring case) is already
    /// present; the existing type is left untouched.
    pub fn add_entity_type(&mut self, entity: EntityType) -> Result<(), DuplicateTypeError> {
        let key = entity.definition_key();
        if !self.identifiers.insert(key) {
            return Err(DuplicateTypeError {
                identifier: entity.identifier,
            });
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Record a namespace; stored upper-cased.
    pub fn register_namespace(&mut self, namespace: &str) {
        if namespace.trim().is_empty() {
            return;
        }
        self.namespaces.insert(DefinitionKey::new(namespace));
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(&DefinitionKey::new(namespace))
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entities
    }

    /// Mutable access for pipeline stages that append to registered types.
    ///
    /// Identifiers must not be changed through this view.
    pub fn entity_types_mut(&mut self) -> impl Iterator<Item = &mut EntityType> {
        self.entities.iter_mut()
    }

    pub fn get_type_by_definition_id(&self, identifier: &str) -> Option<&EntityType> {
        let key = DefinitionKey::new(identifier);
        self.entities
            .iter()
            .find(|entity| entity.definition_key() == key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Freeze the model and build its lookup indices.
    ///
    /// Fails when two unequal properties share an external data key.
    pub fn seal(self) -> Result<SealedModel, ValidationError> {
        SealedModel::from_parts(self.entities, self.namespaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_identifiers_differing_only_by_case() {
        let mut model = ModelConfiguration::new();
        model.add_entity_type(EntityType::new("Case")).unwrap();
        let err = model.add_entity_type(EntityType::new("CASE")).unwrap_err();
        assert_eq!(err.identifier, "CASE");
        assert_eq!(model.len(), 1);
        assert_eq!(model.entity_types()[0].identifier, "Case");
    }

    #[test]
    fn lookup_by_definition_id_ignores_case() {
        let mut model = ModelConfiguration::new();
        model.add_entity_type(EntityType::new("Document")).unwrap();
        assert!(model.get_type_by_definition_id("DOCUMENT").is_some());
        assert!(model.get_type_by_definition_id("Image").is_none());
    }

    #[test]
    fn namespaces_are_case_insensitive() {
        let mut model = ModelConfiguration::new();
        model.register_namespace("emf");
        model.register_namespace("  ");
        assert!(model.has_namespace("EMF"));
        assert!(!model.has_namespace(""));
    }

    #[test]
    fn wire_form_rejects_duplicate_identifiers() {
        let result: Result<ModelConfiguration, _> = serde_json::from_value(json!({
            "entities": [{"identifier": "Case"}, {"identifier": "case"}]
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate entity type identifier"), "{err}");
    }
}
