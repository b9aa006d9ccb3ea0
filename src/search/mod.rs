//! Search-criteria configuration derived from a sealed model.
//!
//! The search model names one primary searched type and binds every usable
//! search criterion to the compiled property it targets. It is built once per
//! request from a [`SealedModel`](crate::SealedModel) and then read only.

pub mod builder;
pub mod hierarchy;

pub use builder::{CULTURAL_OBJECT_MARKERS, IMAGE_MARKERS, build_search_model};
pub use hierarchy::{SemanticHierarchy, StaticHierarchy};

use crate::model::EntityProperty;
use crate::model::key::eq_folded;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// The type searches are run against.
pub struct EntitySearchType {
    /// Short form of the type URI.
    pub identifier: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the search sheet.
pub struct EntitySearchCriterion {
    /// Key of the targeted property (data key or internal URI).
    pub property_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl EntitySearchCriterion {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            operator: None,
            visible: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A criterion together with the property it resolved to.
pub struct SearchCriterionBinding {
    pub criterion: EntitySearchCriterion,
    pub property: EntityProperty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchModelConfiguration {
    searched_type: EntitySearchType,
    criteria: Vec<SearchCriterionBinding>,
}

impl SearchModelConfiguration {
    pub fn new(searched_type: EntitySearchType) -> Self {
        Self {
            searched_type,
            criteria: Vec::new(),
        }
    }

    pub(crate) fn add_criterion(
        &mut self,
        criterion: EntitySearchCriterion,
        property: EntityProperty,
    ) {
        self.criteria.push(SearchCriterionBinding {
            criterion,
            property,
        });
    }

    pub fn searched_type(&self) -> &EntitySearchType {
        &self.searched_type
    }

    pub fn criteria(&self) -> &[SearchCriterionBinding] {
        &self.criteria
    }

    /// Binding of the criterion with the given property id, ignoring case.
    pub fn criterion_for(&self, property_id: &str) -> Option<&SearchCriterionBinding> {
        self.criteria
            .iter()
            .find(|binding| eq_folded(&binding.criterion.property_id, property_id))
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}
