#![allow(dead_code)]

use anyhow::{Context, Result};
use integration_model::{ColumnMapping, JsonSheetSource, ModelConfiguration, SealedModel};
use serde_json::{Value, json};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

pub const PROPERTY_HEADER: [&str; 3] = ["data_key", "uri", "title"];

// Temporary definitions directory; removed on drop.
pub struct Definitions {
    dir: TempDir,
}

impl Definitions {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("failed to allocate definitions dir")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn sheet(&self, name: &str, rows: Value) -> Result<&Self> {
        let path = JsonSheetSource::sheet_path(self.root(), name);
        fs::write(&path, serde_json::to_vec_pretty(&rows)?)
            .with_context(|| format!("failed to write sheet {}", path.display()))?;
        Ok(self)
    }

    /// Types sheet from `(identifier, uri, title, aliases)` rows.
    pub fn types(&self, rows: &[(&str, &str, &str, &str)]) -> Result<&Self> {
        let mut sheet = vec![json!(["identifier", "uri", "title", "aliases"])];
        sheet.extend(
            rows.iter()
                .map(|(id, uri, title, aliases)| json!([id, uri, title, aliases])),
        );
        self.sheet("types", Value::Array(sheet))
    }

    /// Property sheet in the `data_key, uri, title` layout of [`columns`].
    pub fn properties(&self, name: &str, rows: &[(&str, &str, &str)]) -> Result<&Self> {
        let mut sheet = vec![json!(PROPERTY_HEADER)];
        sheet.extend(rows.iter().map(|(key, uri, title)| json!([key, uri, title])));
        self.sheet(name, Value::Array(sheet))
    }

    /// Relations sheet from `(title, uri, domain, aliases)` rows.
    pub fn relations(&self, rows: &[(&str, &str, &str, &str)]) -> Result<&Self> {
        let mut sheet = vec![json!(["title", "uri", "domain", "range", "aliases"])];
        sheet.extend(
            rows.iter()
                .map(|(title, uri, domain, aliases)| json!([title, uri, domain, null, aliases])),
        );
        self.sheet("relations", Value::Array(sheet))
    }

    /// Search sheet from `(property, operator, visible)` rows.
    pub fn search(&self, rows: &[(&str, &str, bool)]) -> Result<&Self> {
        let mut sheet = vec![json!(["property", "operator", "visible"])];
        sheet.extend(
            rows.iter()
                .map(|(property, operator, visible)| json!([property, operator, visible])),
        );
        self.sheet("search", Value::Array(sheet))
    }

    pub fn build(&self) -> Result<ModelConfiguration> {
        let source = JsonSheetSource::new()?;
        Ok(integration_model::build_model(
            &source,
            self.root(),
            &columns(),
        )?)
    }

    pub fn compile(&self) -> Result<SealedModel> {
        Ok(self.build()?.seal()?)
    }
}

pub fn columns() -> ColumnMapping {
    PROPERTY_HEADER
        .iter()
        .enumerate()
        .try_fold(ColumnMapping::empty(), |mapping, (idx, field)| {
            mapping.with(field, idx)
        })
        .expect("fixture columns are valid")
}

/// The two-type fixture: Document and CulturalObject sharing `title -> dc:title`.
pub fn scenario() -> Result<Definitions> {
    let defs = Definitions::new()?;
    defs.types(&[
        ("Document", "emf:Document", "document", "Doc"),
        ("CulturalObject", "chd:CulturalObject", "cultural object", ""),
    ])?
    .properties("common", &[("title", "dc:title", "Title")])?
    .properties("Document", &[])?
    .relations(&[("has parent", "emf:hasParent", "all", "parent")])?;
    Ok(defs)
}

// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return its warnings as text.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer
        .0
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    (value, String::from_utf8_lossy(&bytes).into_owned())
}
