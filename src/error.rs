//! Error types for model compilation.
//!
//! Fatal build failures, reportable validation failures and sheet-level
//! problems are distinct types so callers can route validation messages to
//! users while treating the rest as internal errors. Non-fatal mismatches are
//! not errors at all; they are logged and skipped by the builders.

use crate::model::EntityProperty;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a definition sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("definition sheet '{}' not found", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read definition sheet '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse definition sheet '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("definition sheet '{}' failed contract validation:\n{details}", .path.display())]
    Contract { path: PathBuf, details: String },

    #[error("sheet contract failed to compile: {0}")]
    ContractCompile(String),

    #[error("definition sheet '{}' row {row}: {message}", .path.display())]
    Row {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("invalid column mapping '{}': {message}", .path.display())]
    Columns { path: PathBuf, message: String },
}

impl SheetError {
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SheetError::Missing { path }
            | SheetError::Io { path, .. }
            | SheetError::Parse { path, .. }
            | SheetError::Contract { path, .. }
            | SheetError::Row { path, .. }
            | SheetError::Columns { path, .. } => Some(path.as_path()),
            SheetError::ContractCompile(_) => None,
        }
    }
}

/// Two declared entity types share an identifier (compared without case).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate entity type identifier '{identifier}'")]
pub struct DuplicateTypeError {
    pub identifier: String,
}

/// Conflicts found while sealing a model; these are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "external data key '{data_key}' maps to conflicting definitions: '{existing}' and '{conflicting}'"
    )]
    ConflictingDataKey {
        data_key: String,
        existing: Box<EntityProperty>,
        conflicting: Box<EntityProperty>,
    },
}

/// Cause of a fatal build failure.
#[derive(Debug, Error)]
pub enum BuildFailure {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    DuplicateType(#[from] DuplicateTypeError),
}

/// Top-level error returned by the model and search builders.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to build model from definitions in '{}'", .root.display())]
    Build {
        root: PathBuf,
        #[source]
        source: BuildFailure,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ModelError {
    pub(crate) fn build(root: impl Into<PathBuf>, source: impl Into<BuildFailure>) -> Self {
        ModelError::Build {
            root: root.into(),
            source: source.into(),
        }
    }

    /// True for conflicts that should be reported to the user as validation messages.
    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation(_))
    }
}
