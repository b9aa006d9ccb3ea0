//! Sealed, indexed view of a compiled model.
//!
//! The indices are built once from the entity types handed over by
//! [`ModelConfiguration::seal`](crate::ModelConfiguration::seal). The sealed
//! model only hands out shared references, so nothing can change it after the
//! indices are built and it can be read from many threads without locking.
//! It is strict about data-key conflicts so downstream consumers never see two
//! competing definitions for one external field.

use crate::error::ValidationError;
use crate::model::key::{DefinitionKey, eq_folded, namespace_prefix};
use crate::model::{EntityProperty, EntityRelation, EntityType, ModelConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PropertyRef {
    entity: usize,
    property: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ModelConfiguration")]
/// Immutable model with lookup indices over types and properties.
pub struct SealedModel {
    entities: Vec<EntityType>,
    #[serde(skip)]
    by_id: HashMap<DefinitionKey, usize>,
    #[serde(skip)]
    by_data_key: HashMap<String, PropertyRef>,
    #[serde(skip)]
    by_uri: HashMap<DefinitionKey, Vec<PropertyRef>>,
    #[serde(skip)]
    namespaces: BTreeSet<DefinitionKey>,
}

impl TryFrom<ModelConfiguration> for SealedModel {
    type Error = ValidationError;

    fn try_from(model: ModelConfiguration) -> Result<Self, Self::Error> {
        model.seal()
    }
}

impl PartialEq for SealedModel {
    fn eq(&self, other: &Self) -> bool {
        self.entities == other.entities
    }
}

impl Eq for SealedModel {}

impl SealedModel {
    pub(crate) fn from_parts(
        entities: Vec<EntityType>,
        mut namespaces: BTreeSet<DefinitionKey>,
    ) -> Result<Self, ValidationError> {
        let by_id = entities
            .iter()
            .enumerate()
            .map(|(idx, entity)| (entity.definition_key(), idx))
            .collect();
        let by_data_key = build_data_key_index(&entities)?;
        let by_uri = build_uri_index(&entities);
        collect_namespaces(&entities, &mut namespaces);

        debug!(
            types = entities.len(),
            data_keys = by_data_key.len(),
            uris = by_uri.len(),
            namespaces = namespaces.len(),
            "sealed model configuration"
        );

        Ok(Self {
            entities,
            by_id,
            by_data_key,
            by_uri,
            namespaces,
        })
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity type by identifier, ignoring case.
    pub fn get_type_by_definition_id(&self, identifier: &str) -> Option<&EntityType> {
        self.by_id
            .get(&DefinitionKey::new(identifier))
            .map(|idx| &self.entities[*idx])
    }

    /// First entity type recognized under the external alias `name`.
    pub fn get_type_by_external_name(&self, name: &str) -> Option<&EntityType> {
        self.entities.iter().find(|entity| entity.has_mapping(name))
    }

    /// Entity type whose URI matches `uri`, ignoring case.
    pub fn get_type_by_uri(&self, uri: &str) -> Option<&EntityType> {
        self.entities.iter().find(|entity| {
            entity
                .uri()
                .is_some_and(|own| eq_folded(own, uri))
        })
    }

    /// Property registered under the external data key `data_key`.
    pub fn get_property_by_external_name(&self, data_key: &str) -> Option<&EntityProperty> {
        self.by_data_key
            .get(data_key.trim())
            .map(|found| self.resolve(*found))
    }

    /// Every property with the internal URI `uri`, across all types.
    pub fn get_properties_by_uri(&self, uri: &str) -> Vec<&EntityProperty> {
        self.by_uri
            .get(&DefinitionKey::new(uri))
            .map(|refs| refs.iter().map(|found| self.resolve(*found)).collect())
            .unwrap_or_default()
    }

    /// Property of the type `identifier` whose internal URI is `uri`.
    pub fn get_property_by_internal_name(
        &self,
        identifier: &str,
        uri: &str,
    ) -> Option<&EntityProperty> {
        let entity = *self.by_id.get(&DefinitionKey::new(identifier))?;
        self.by_uri
            .get(&DefinitionKey::new(uri))?
            .iter()
            .find(|found| found.entity == entity)
            .map(|found| self.resolve(*found))
    }

    /// Relation of the type `identifier` recognized under the alias `name`.
    pub fn get_relation_by_external_name(
        &self,
        identifier: &str,
        name: &str,
    ) -> Option<&EntityRelation> {
        self.get_type_by_definition_id(identifier)?
            .relation_by_mapping(name)
    }

    /// First property, in type then declaration order, accepted by `filter`.
    pub fn get_property_by_filter<F>(&self, mut filter: F) -> Option<&EntityProperty>
    where
        F: FnMut(&EntityProperty) -> bool,
    {
        self.properties().find(|property| filter(*property))
    }

    /// All properties in type then declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &EntityProperty> {
        self.entities
            .iter()
            .flat_map(|entity| entity.properties().iter())
    }

    /// URIs of all entity types in declaration order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().filter_map(EntityType::uri)
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(&DefinitionKey::new(namespace))
    }

    /// Registered namespaces, upper-cased, in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(DefinitionKey::as_str)
    }

    fn resolve(&self, found: PropertyRef) -> &EntityProperty {
        &self.entities[found.entity].properties()[found.property]
    }
}

fn property_refs(entities: &[EntityType]) -> impl Iterator<Item = (PropertyRef, &EntityProperty)> {
    entities.iter().enumerate().flat_map(|(entity, ty)| {
        ty.properties()
            .iter()
            .enumerate()
            .map(move |(property, value)| (PropertyRef { entity, property }, value))
    })
}

fn build_data_key_index(
    entities: &[EntityType],
) -> Result<HashMap<String, PropertyRef>, ValidationError> {
    let mut map: HashMap<String, PropertyRef> = HashMap::new();
    for (found, property) in property_refs(entities) {
        let Some(data_key) = property.data_key().map(str::trim).filter(|k| !k.is_empty()) else {
            continue;
        };
        if let Some(existing) = map.get(data_key) {
            let existing = &entities[existing.entity].properties()[existing.property];
            if existing != property {
                return Err(ValidationError::ConflictingDataKey {
                    data_key: data_key.to_string(),
                    existing: Box::new(existing.clone()),
                    conflicting: Box::new(property.clone()),
                });
            }
        }
        map.insert(data_key.to_string(), found);
    }
    Ok(map)
}

fn build_uri_index(entities: &[EntityType]) -> HashMap<DefinitionKey, Vec<PropertyRef>> {
    let mut map: HashMap<DefinitionKey, Vec<PropertyRef>> = HashMap::new();
    for (found, property) in property_refs(entities) {
        let Some(uri) = property.uri().filter(|uri| !uri.trim().is_empty()) else {
            continue;
        };
        map.entry(DefinitionKey::new(uri)).or_default().push(found);
    }
    map
}

fn collect_namespaces(entities: &[EntityType], namespaces: &mut BTreeSet<DefinitionKey>) {
    let uris = entities.iter().flat_map(|entity| {
        entity
            .uri()
            .into_iter()
            .chain(entity.properties().iter().filter_map(EntityProperty::uri))
            .chain(entity.relations().iter().filter_map(EntityRelation::uri))
    });
    for uri in uris {
        if let Some(prefix) = namespace_prefix(uri) {
            namespaces.insert(DefinitionKey::new(prefix));
        }
    }
}
