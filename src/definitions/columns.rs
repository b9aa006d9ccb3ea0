//! Column mapping for property sheets.
//!
//! Property sheets (`common` and the per-type sheets) do not have a fixed
//! layout; the caller supplies the column index of each logical field. Fields
//! absent from the mapping are left unset on the parsed properties.

use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const FIELD_DATA_KEY: &str = "data_key";
pub const FIELD_URI: &str = "uri";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_PROPERTY_ID: &str = "property_id";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_MANDATORY: &str = "mandatory";
pub const FIELD_CODELIST: &str = "codelist";
pub const FIELD_DESCRIPTION: &str = "description";

/// Logical property fields, in default column order.
pub const PROPERTY_FIELDS: [&str; 8] = [
    FIELD_DATA_KEY,
    FIELD_URI,
    FIELD_TITLE,
    FIELD_PROPERTY_ID,
    FIELD_TYPE,
    FIELD_MANDATORY,
    FIELD_CODELIST,
    FIELD_DESCRIPTION,
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Logical field name -> zero-based column index.
pub struct ColumnMapping {
    columns: BTreeMap<String, usize>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            columns: PROPERTY_FIELDS
                .iter()
                .enumerate()
                .map(|(idx, field)| (field.to_string(), idx))
                .collect(),
        }
    }
}

impl ColumnMapping {
    /// Mapping with no columns; fields are added with [`ColumnMapping::with`].
    pub fn empty() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Map `field` to `column`. Unknown field names are rejected.
    pub fn with(mut self, field: &str, column: usize) -> Result<Self, String> {
        let field = field.trim().to_ascii_lowercase();
        if !PROPERTY_FIELDS.contains(&field.as_str()) {
            return Err(format!(
                "unknown property field '{field}', expected one of {PROPERTY_FIELDS:?}"
            ));
        }
        self.columns.insert(field, column);
        Ok(self)
    }

    /// Column of `field`, if mapped.
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(field, col)| (field.as_str(), *col))
    }

    /// Load a mapping from a JSON object such as `{"data_key": 0, "uri": 3}`.
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let data = fs::read_to_string(path).map_err(|source| SheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, usize> =
            serde_json::from_str(&data).map_err(|source| SheetError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if raw.is_empty() {
            return Err(SheetError::Columns {
                path: path.to_path_buf(),
                message: "mapping must name at least one field".to_string(),
            });
        }
        raw.into_iter()
            .try_fold(Self::empty(), |mapping, (field, column)| {
                mapping.with(&field, column)
            })
            .map_err(|message| SheetError::Columns {
                path: path.to_path_buf(),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_mapping_follows_field_order() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.column(FIELD_DATA_KEY), Some(0));
        assert_eq!(mapping.column(FIELD_URI), Some(1));
        assert_eq!(mapping.column(FIELD_DESCRIPTION), Some(7));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = ColumnMapping::empty().with("colour", 2).unwrap_err();
        assert!(err.contains("unknown property field 'colour'"), "{err}");
        let mapping = ColumnMapping::empty().with(" URI ", 2).unwrap();
        assert_eq!(mapping.column(FIELD_URI), Some(2));
    }

    #[test]
    fn loads_mapping_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_key": 2, "uri": 0, "title": 1}}"#).unwrap();
        let mapping = ColumnMapping::load(file.path()).unwrap();
        assert_eq!(mapping.column(FIELD_DATA_KEY), Some(2));
        assert_eq!(mapping.column(FIELD_URI), Some(0));
        assert_eq!(mapping.column(FIELD_MANDATORY), None);
    }

    #[test]
    fn mapping_file_errors_name_the_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"colour": 2}}"#).unwrap();
        let err = ColumnMapping::load(file.path()).unwrap_err();
        assert!(matches!(err, SheetError::Columns { .. }));
        assert_eq!(err.path(), Some(file.path()));

        let mut empty = NamedTempFile::new().unwrap();
        write!(empty, "{{}}").unwrap();
        assert!(ColumnMapping::load(empty.path()).is_err());
    }
}
