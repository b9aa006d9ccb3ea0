use crate::model::key::{DefinitionKey, contains_alias, eq_folded, insert_alias};
use crate::model::relation::deserialize_aliases;
use crate::model::{EntityProperty, EntityRelation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One external object type: identity, aliases, owned properties and relations.
///
/// The identifier is the unique key inside a model and is compared without
/// regard to case. Properties and relations keep their declaration order.
pub struct EntityType {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        rename = "externals",
        deserialize_with = "deserialize_aliases",
        skip_serializing_if = "Vec::is_empty"
    )]
    mappings: Vec<String>,
    #[serde(default)]
    properties: Vec<EntityProperty>,
    #[serde(default)]
    relations: Vec<EntityRelation>,
}

impl EntityType {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn definition_key(&self) -> DefinitionKey {
        DefinitionKey::new(&self.identifier)
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// True when the type title equals `title`, ignoring case.
    pub fn has_title(&self, title: &str) -> bool {
        self.title
            .as_deref()
            .is_some_and(|own| eq_folded(own, title))
    }

    pub fn add_mappings<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            insert_alias(&mut self.mappings, name.as_ref());
        }
    }

    /// Case-insensitive alias membership.
    pub fn has_mapping(&self, name: &str) -> bool {
        contains_alias(&self.mappings, name)
    }

    pub fn mappings(&self) -> &[String] {
        &self.mappings
    }

    pub fn add_property(&mut self, property: EntityProperty) {
        self.properties.push(property);
    }

    pub fn add_properties<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = EntityProperty>,
    {
        self.properties.extend(properties);
    }

    pub fn properties(&self) -> &[EntityProperty] {
        &self.properties
    }

    pub fn add_relation(&mut self, relation: EntityRelation) {
        self.relations.push(relation);
    }

    pub fn relations(&self) -> &[EntityRelation] {
        &self.relations
    }

    /// First owned property whose internal URI matches `uri`, ignoring case.
    pub fn property_by_uri(&self, uri: &str) -> Option<&EntityProperty> {
        self.properties.iter().find(|property| property.has_uri(uri))
    }

    /// First owned relation recognized under the external alias `name`.
    pub fn relation_by_mapping(&self, name: &str) -> Option<&EntityRelation> {
        self.relations
            .iter()
            .find(|relation| relation.has_mapping(name))
    }
}
