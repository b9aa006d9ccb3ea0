//! Model build pipeline.
//!
//! Reads the definition sheets in a fixed order and assembles an unsealed
//! [`ModelConfiguration`]:
//!
//! 1. `types` declares the entity types.
//! 2. `common` holds properties shared by every type.
//! 3. `<identifier>` holds the properties specific to one type (optional).
//!    Identifiers that name a reserved sheet or contain a path separator get
//!    no specific sheet.
//! 4. Each type receives the common properties, then its own, and is
//!    registered.
//! 5. `relations` holds relation definitions.
//! 6. Relations are attached by domain: wildcard domains go to every type,
//!    other domains to the types with a matching title.
//!
//! Any failure in steps 1–5 aborts the build. A relation whose domain names no
//! type is logged and dropped.

use crate::definitions::{
    COMMON_SHEET, ColumnMapping, DefinitionSource, RELATIONS_SHEET, SEARCH_SHEET, SheetError,
    TYPES_SHEET,
};
use crate::error::ModelError;
use crate::model::key::eq_folded;
use crate::model::{
    EntityProperty, EntityRelation, ModelConfiguration, SealedModel, is_wildcard_domain,
};
use std::path::Path;
use tracing::{debug, info, warn};

const RESERVED_SHEETS: [&str; 4] = [TYPES_SHEET, COMMON_SHEET, RELATIONS_SHEET, SEARCH_SHEET];

/// Build an unsealed model from the sheets under `definitions_root`.
pub fn build_model<S>(
    source: &S,
    definitions_root: &Path,
    columns: &ColumnMapping,
) -> Result<ModelConfiguration, ModelError>
where
    S: DefinitionSource + ?Sized,
{
    let fail = |err: SheetError| ModelError::build(definitions_root, err);

    let types = source.read_types(definitions_root).map_err(fail)?;
    let common = source
        .read_properties(definitions_root, COMMON_SHEET, columns)
        .map_err(fail)?;

    let mut model = ModelConfiguration::new();
    for mut entity in types {
        let specific =
            read_specific_properties(source, definitions_root, &entity.identifier, columns)
                .map_err(fail)?;
        entity.add_properties(common.iter().cloned());
        entity.add_properties(specific);
        model
            .add_entity_type(entity)
            .map_err(|err| ModelError::build(definitions_root, err))?;
    }

    let relations = source.read_relations(definitions_root).map_err(fail)?;
    attach_relations(&mut model, relations);

    info!(
        root = %definitions_root.display(),
        types = model.len(),
        common = common.len(),
        "built model configuration"
    );
    Ok(model)
}

/// Build and seal in one step.
pub fn compile_model<S>(
    source: &S,
    definitions_root: &Path,
    columns: &ColumnMapping,
) -> Result<SealedModel, ModelError>
where
    S: DefinitionSource + ?Sized,
{
    let model = build_model(source, definitions_root, columns)?;
    Ok(model.seal()?)
}

fn read_specific_properties<S>(
    source: &S,
    definitions_root: &Path,
    identifier: &str,
    columns: &ColumnMapping,
) -> Result<Vec<EntityProperty>, SheetError>
where
    S: DefinitionSource + ?Sized,
{
    let Some(sheet) = specific_sheet_name(identifier) else {
        warn!(
            identifier,
            "type identifier cannot name a definition sheet; no type-specific properties"
        );
        return Ok(Vec::new());
    };
    match source.read_properties(definitions_root, sheet, columns) {
        Ok(properties) => Ok(properties),
        Err(SheetError::Missing { path }) => {
            debug!(
                identifier,
                path = %path.display(),
                "no type-specific definition sheet"
            );
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

// The identifier doubles as a sheet name inside the definitions root.
fn specific_sheet_name(identifier: &str) -> Option<&str> {
    let name = identifier.trim();
    if name.is_empty() || name.contains(['/', '\\']) {
        return None;
    }
    if RESERVED_SHEETS.iter().any(|reserved| eq_folded(reserved, name)) {
        return None;
    }
    Some(name)
}

/// Append each relation to the types its domain selects.
pub(crate) fn attach_relations(model: &mut ModelConfiguration, relations: Vec<EntityRelation>) {
    for relation in relations {
        let domain = relation.domain().unwrap_or_default().trim().to_string();
        let wildcard = is_wildcard_domain(&domain);

        let mut attached = 0usize;
        for entity in model.entity_types_mut() {
            if wildcard || entity.has_title(&domain) {
                entity.add_relation(relation.clone());
                attached += 1;
            }
        }

        if attached == 0 {
            warn!(
                domain = %domain,
                uri = relation.uri().unwrap_or_default(),
                "relation domain matches no entity type; dropping relation"
            );
        } else {
            debug!(
                domain = %domain,
                uri = relation.uri().unwrap_or_default(),
                attached,
                "attached relation"
            );
        }
    }
}
