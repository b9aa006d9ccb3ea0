//! JSON sheet exports.
//!
//! A sheet export is a JSON array of rows, each row an array of cells holding
//! strings, numbers, booleans or null. The first row is the header. Exports are
//! validated against a bundled JSON-schema contract before any row is
//! interpreted so a malformed file fails with the offending path instead of
//! producing a half-read model.

use crate::definitions::columns::{
    FIELD_CODELIST, FIELD_DATA_KEY, FIELD_DESCRIPTION, FIELD_MANDATORY, FIELD_PROPERTY_ID,
    FIELD_TITLE, FIELD_TYPE, FIELD_URI,
};
use crate::definitions::{
    ColumnMapping, DefinitionSource, RELATIONS_SHEET, SEARCH_SHEET, SheetError, TYPES_SHEET,
};
use crate::model::{EntityProperty, EntityRelation, EntityType};
use crate::search::EntitySearchCriterion;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const SHEET_EXTENSION: &str = "json";

const SHEET_CONTRACT: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "definition sheet export",
  "type": "array",
  "items": {
    "type": "array",
    "items": { "type": ["string", "number", "boolean", "null"] }
  }
}"#;

// Fixed layouts of the sheets that do not take a column mapping.
const TYPE_IDENTIFIER: usize = 0;
const TYPE_URI: usize = 1;
const TYPE_TITLE: usize = 2;
const TYPE_ALIASES: usize = 3;

const RELATION_TITLE: usize = 0;
const RELATION_URI: usize = 1;
const RELATION_DOMAIN: usize = 2;
const RELATION_RANGE: usize = 3;
const RELATION_ALIASES: usize = 4;

const CRITERION_PROPERTY: usize = 0;
const CRITERION_OPERATOR: usize = 1;
const CRITERION_VISIBLE: usize = 2;

/// One data row of a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based row number in the export, header included.
    pub number: usize,
    cells: Vec<Option<String>>,
}

impl SheetRow {
    /// Trimmed, non-empty cell text at `column`.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells
            .get(column)?
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    fn owned(&self, column: Option<usize>) -> Option<String> {
        column.and_then(|col| self.cell(col)).map(str::to_string)
    }

    fn is_blank(&self) -> bool {
        (0..self.cells.len()).all(|col| self.cell(col).is_none())
    }
}

/// Data rows of one sheet, header removed and blank rows skipped.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub path: PathBuf,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    fn row_error(&self, row: &SheetRow, message: impl Into<String>) -> SheetError {
        SheetError::Row {
            path: self.path.clone(),
            row: row.number,
            message: message.into(),
        }
    }

    fn flag(
        &self,
        row: &SheetRow,
        column: Option<usize>,
        default: bool,
    ) -> Result<bool, SheetError> {
        let Some(raw) = column.and_then(|col| row.cell(col)) else {
            return Ok(default);
        };
        parse_flag(raw)
            .ok_or_else(|| self.row_error(row, format!("'{raw}' is not a yes/no value")))
    }
}

/// [`DefinitionSource`] over `<root>/<sheet>.json` exports.
pub struct JsonSheetSource {
    contract: JSONSchema,
}

impl JsonSheetSource {
    pub fn new() -> Result<Self, SheetError> {
        let contract: Value = serde_json::from_str(SHEET_CONTRACT)
            .map_err(|err| SheetError::ContractCompile(err.to_string()))?;
        let compiled = JSONSchema::compile(&contract)
            .map_err(|err| SheetError::ContractCompile(err.to_string()))?;
        Ok(Self { contract: compiled })
    }

    /// Location of `sheet` under `root`.
    pub fn sheet_path(root: &Path, sheet: &str) -> PathBuf {
        root.join(format!("{sheet}.{SHEET_EXTENSION}"))
    }

    /// Read, validate and split a sheet into data rows.
    pub fn load_sheet(&self, root: &Path, sheet: &str) -> Result<Sheet, SheetError> {
        let path = Self::sheet_path(root, sheet);
        if !path.is_file() {
            return Err(SheetError::Missing { path });
        }

        let raw: Value = {
            let file = File::open(&path).map_err(|source| SheetError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|source| SheetError::Parse {
                path: path.clone(),
                source,
            })?
        };

        if let Err(errors) = self.contract.validate(&raw) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(SheetError::Contract { path, details });
        }

        let rows: Vec<SheetRow> = raw
            .as_array()
            .map(|rows| rows.as_slice())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| SheetRow {
                number: idx + 1,
                cells: row
                    .as_array()
                    .map(|cells| cells.iter().map(cell_text).collect())
                    .unwrap_or_default(),
            })
            .filter(|row| !row.is_blank())
            .collect();

        debug!(sheet, path = %path.display(), rows = rows.len(), "loaded definition sheet");
        Ok(Sheet { path, rows })
    }
}

impl DefinitionSource for JsonSheetSource {
    fn read_types(&self, root: &Path) -> Result<Vec<EntityType>, SheetError> {
        let sheet = self.load_sheet(root, TYPES_SHEET)?;
        let mut types = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let identifier = row
                .cell(TYPE_IDENTIFIER)
                .ok_or_else(|| sheet.row_error(row, "missing type identifier"))?;
            let mut entity = EntityType::new(identifier);
            entity.uri = row.owned(Some(TYPE_URI));
            entity.title = row.owned(Some(TYPE_TITLE));
            if let Some(aliases) = row.cell(TYPE_ALIASES) {
                entity.add_mappings(split_aliases(aliases));
            }
            types.push(entity);
        }
        Ok(types)
    }

    fn read_properties(
        &self,
        root: &Path,
        sheet: &str,
        columns: &ColumnMapping,
    ) -> Result<Vec<EntityProperty>, SheetError> {
        let sheet = self.load_sheet(root, sheet)?;
        let mut properties = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let property = EntityProperty {
                data_key: row.owned(columns.column(FIELD_DATA_KEY)),
                uri: row.owned(columns.column(FIELD_URI)),
                title: row.owned(columns.column(FIELD_TITLE)),
                property_id: row.owned(columns.column(FIELD_PROPERTY_ID)),
                data_type: row.owned(columns.column(FIELD_TYPE)),
                codelist: row.owned(columns.column(FIELD_CODELIST)),
                description: row.owned(columns.column(FIELD_DESCRIPTION)),
                mandatory: sheet.flag(row, columns.column(FIELD_MANDATORY), false)?,
            };
            if property == EntityProperty::default() {
                // Row only has text in unmapped columns.
                continue;
            }
            properties.push(property);
        }
        Ok(properties)
    }

    fn read_relations(&self, root: &Path) -> Result<Vec<EntityRelation>, SheetError> {
        let sheet = self.load_sheet(root, RELATIONS_SHEET)?;
        let mut relations = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let uri = row
                .cell(RELATION_URI)
                .ok_or_else(|| sheet.row_error(row, "missing relation uri"))?;
            let mut relation = EntityRelation::new(uri);
            relation.title = row.owned(Some(RELATION_TITLE));
            relation.domain = row.owned(Some(RELATION_DOMAIN));
            relation.range = row.owned(Some(RELATION_RANGE));
            if let Some(aliases) = row.cell(RELATION_ALIASES) {
                relation.add_mappings(split_aliases(aliases));
            }
            relations.push(relation);
        }
        Ok(relations)
    }

    fn read_criteria(&self, root: &Path) -> Result<Vec<EntitySearchCriterion>, SheetError> {
        let sheet = self.load_sheet(root, SEARCH_SHEET)?;
        let mut criteria = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let property_id = row
                .cell(CRITERION_PROPERTY)
                .ok_or_else(|| sheet.row_error(row, "missing criterion property"))?;
            criteria.push(EntitySearchCriterion {
                property_id: property_id.to_string(),
                operator: row.owned(Some(CRITERION_OPERATOR)),
                visible: sheet.flag(row, Some(CRITERION_VISIBLE), true)?,
            });
        }
        Ok(criteria)
    }
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Aliases are separated by commas or semicolons; names may contain spaces.
fn split_aliases(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "x" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
