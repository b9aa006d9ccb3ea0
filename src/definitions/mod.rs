//! Boundary to the tabular definition parser.
//!
//! The model builders never look at raw spreadsheet data. They ask a
//! [`DefinitionSource`] for parsed records, one sheet per call, and the source
//! is responsible for locating, opening and interpreting the sheet. The bundled
//! [`JsonSheetSource`] reads JSON exports of the sheets; other formats plug in
//! behind the same trait.

pub mod columns;
pub mod sheet;

pub use crate::error::SheetError;
pub use columns::{ColumnMapping, PROPERTY_FIELDS};
pub use sheet::JsonSheetSource;

use crate::model::{EntityProperty, EntityRelation, EntityType};
use crate::search::EntitySearchCriterion;
use std::path::Path;

/// Declared entity types.
pub const TYPES_SHEET: &str = "types";
/// Properties shared by every type.
pub const COMMON_SHEET: &str = "common";
/// Relation definitions.
pub const RELATIONS_SHEET: &str = "relations";
/// Search criteria.
pub const SEARCH_SHEET: &str = "search";

/// Parser for the definition sheets under a definitions root.
///
/// Every call reads one complete sheet. Implementations must release the
/// underlying file before returning, on success and on error. A sheet that does
/// not exist is reported as [`SheetError::Missing`] so callers can decide
/// whether it is optional.
pub trait DefinitionSource {
    /// Type skeletons (identifier, URI, title, aliases) from the types sheet.
    fn read_types(&self, root: &Path) -> Result<Vec<EntityType>, SheetError>;

    /// Properties from `sheet`, interpreted with `columns`.
    fn read_properties(
        &self,
        root: &Path,
        sheet: &str,
        columns: &ColumnMapping,
    ) -> Result<Vec<EntityProperty>, SheetError>;

    /// Relations, each carrying its free-text domain.
    fn read_relations(&self, root: &Path) -> Result<Vec<EntityRelation>, SheetError>;

    /// Search criteria, each naming a target property.
    fn read_criteria(&self, root: &Path) -> Result<Vec<EntitySearchCriterion>, SheetError>;
}
