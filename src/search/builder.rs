use crate::definitions::DefinitionSource;
use crate::error::ModelError;
use crate::model::key::eq_folded;
use crate::model::{EntityProperty, SealedModel};
use crate::search::{
    EntitySearchCriterion, EntitySearchType, SearchModelConfiguration, SemanticHierarchy,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Classes that make a type the preferred searched type.
pub const CULTURAL_OBJECT_MARKERS: [&str; 2] = [
    "chd:CulturalObject",
    "http://www.sirma.com/ontologies/2016/02/culturalHeritageDomain#CulturalObject",
];

/// Classes that make a type the searched type when no cultural object exists.
pub const IMAGE_MARKERS: [&str; 2] = [
    "emf:Image",
    "http://ittruse.ittbg.com/ontology/enterpriseManagementFramework#Image",
];

/// Derive the search configuration for `model`.
///
/// The first type (in declaration order) descending from a cultural-object
/// class becomes the searched type, then the first image type, then
/// `default_type`. Criteria that target no known property are logged and
/// left out; a missing or unreadable search sheet fails the build.
pub fn build_search_model<S, H>(
    source: &S,
    definitions_root: &Path,
    model: &SealedModel,
    hierarchy: &H,
    default_type: &str,
) -> Result<SearchModelConfiguration, ModelError>
where
    S: DefinitionSource + ?Sized,
    H: SemanticHierarchy + ?Sized,
{
    let searched_uri = match select_searched_type(model, hierarchy) {
        Some(uri) => uri.to_string(),
        None => {
            warn!(
                default_type,
                "no cultural object or image type in model; using default searched type"
            );
            default_type.to_string()
        }
    };
    let searched_type = EntitySearchType {
        identifier: hierarchy.short_uri(&searched_uri),
        title: hierarchy.class_title(&searched_uri),
        uri: searched_uri,
    };
    debug!(
        uri = %searched_type.uri,
        identifier = %searched_type.identifier,
        "selected searched type"
    );

    let criteria = source
        .read_criteria(definitions_root)
        .map_err(|err| ModelError::build(definitions_root, err))?;

    let definition_id = model
        .get_type_by_uri(&searched_type.uri)
        .map(|entity| entity.identifier.clone());
    let mut search = SearchModelConfiguration::new(searched_type);
    let mut skipped = 0usize;
    for criterion in criteria {
        match resolve_property(model, definition_id.as_deref(), &criterion) {
            Some(property) => {
                let property = property.clone();
                search.add_criterion(criterion, property);
            }
            None => {
                skipped += 1;
                warn!(
                    property = %criterion.property_id,
                    "search criterion targets no known property; skipping"
                );
            }
        }
    }

    info!(
        root = %definitions_root.display(),
        criteria = search.len(),
        skipped,
        "built search model"
    );
    Ok(search)
}

fn select_searched_type<'m, H>(model: &'m SealedModel, hierarchy: &H) -> Option<&'m str>
where
    H: SemanticHierarchy + ?Sized,
{
    let chains: Vec<(&str, Vec<String>)> = model
        .uris()
        .map(|uri| (uri, hierarchy.ancestors(uri)))
        .collect();

    [&CULTURAL_OBJECT_MARKERS, &IMAGE_MARKERS]
        .into_iter()
        .find_map(|markers| {
            chains
                .iter()
                .find(|(uri, chain)| chain_has_marker(uri, chain, markers))
                .map(|(uri, _)| *uri)
        })
}

// The class itself counts as part of its own chain.
fn chain_has_marker(uri: &str, chain: &[String], markers: &[&str]) -> bool {
    std::iter::once(uri)
        .chain(chain.iter().map(String::as_str))
        .any(|class| {
            markers
                .iter()
                .any(|marker| eq_folded(marker, class))
        })
}

fn resolve_property<'m>(
    model: &'m SealedModel,
    definition_id: Option<&str>,
    criterion: &EntitySearchCriterion,
) -> Option<&'m EntityProperty> {
    let key = criterion.property_id.as_str();
    definition_id
        .and_then(|id| model.get_property_by_internal_name(id, key))
        .or_else(|| model.get_property_by_external_name(key))
}
