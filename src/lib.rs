//! Data-integration model compiler.
//!
//! Turns tabular definitions of an external system's object model (types,
//! properties, relations) into a sealed, cross-indexed [`SealedModel`], and
//! derives the [`SearchModelConfiguration`] used to query that system.

pub mod builder;
pub mod definitions;
pub mod error;
pub mod model;
pub mod search;

pub use builder::{build_model, compile_model};
pub use definitions::{ColumnMapping, DefinitionSource, JsonSheetSource, SheetError};
pub use error::{BuildFailure, DuplicateTypeError, ModelError, ValidationError};
pub use model::{
    DefinitionKey, EntityProperty, EntityRelation, EntityType, ModelConfiguration, SealedModel,
    WILDCARD_DOMAINS, is_wildcard_domain,
};
pub use search::{
    EntitySearchCriterion, EntitySearchType, SearchCriterionBinding, SearchModelConfiguration,
    SemanticHierarchy, StaticHierarchy, build_search_model,
};

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Environment variable naming the definitions directory.
pub const ENV_DEFINITIONS_ROOT: &str = "MODEL_DEFINITIONS_ROOT";

// A directory only counts as a definitions root when it holds a types sheet.
fn is_definitions_root(candidate: &Path) -> bool {
    JsonSheetSource::sheet_path(candidate, definitions::TYPES_SHEET).is_file()
}

fn root_from_env(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        return None;
    }
    let path = PathBuf::from(value);
    if !path.exists() || !is_definitions_root(&path) {
        return None;
    }
    fs::canonicalize(path).ok()
}

/// Locate the definitions directory.
///
/// Order: explicit path, `$MODEL_DEFINITIONS_ROOT`, then the current
/// directory. An explicit path is returned as given so the build reports exactly what the caller asked for.
pub fn resolve_definitions_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(env_root) = env::var(ENV_DEFINITIONS_ROOT) {
        if let Some(root) = root_from_env(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if is_definitions_root(&cwd) {
            return Ok(cwd);
        }
    }

    bail!(
        "Unable to locate a definitions directory. Pass --definitions or set {ENV_DEFINITIONS_ROOT} to a directory containing types.json."
    );
}
