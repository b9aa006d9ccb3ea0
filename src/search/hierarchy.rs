//! Semantic class hierarchy lookup.
//!
//! The search builder only needs three answers from the semantic layer: the
//! ancestor chain of a class, a short form of its URI and a display title.
//! `StaticHierarchy` answers them from an in-memory table, which is what tests
//! and the diagnostic binary use.

use crate::error::SheetError;
use crate::model::key::eq_folded;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

/// Lookup service for semantic class relationships.
pub trait SemanticHierarchy {
    /// Ancestors of `uri`, nearest first. Unknown classes have no ancestors.
    fn ancestors(&self, uri: &str) -> Vec<String>;

    /// Short (prefixed) form of `uri`.
    fn short_uri(&self, uri: &str) -> String {
        uri.to_string()
    }

    /// Display title of the class, when a class description is known.
    fn class_title(&self, uri: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
/// One class entry of a [`StaticHierarchy`].
pub struct ClassEntry {
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub short_uri: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
/// Table-driven hierarchy keyed by class URI.
pub struct StaticHierarchy {
    classes: BTreeMap<String, ClassEntry>,
}

impl StaticHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `uri` with direct `parents`.
    pub fn with_class<I, S>(mut self, uri: &str, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.entry(uri.to_string()).or_default().parents =
            parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, uri: &str, title: &str) -> Self {
        self.classes.entry(uri.to_string()).or_default().title = Some(title.to_string());
        self
    }

    pub fn with_short_uri(mut self, uri: &str, short: &str) -> Self {
        self.classes.entry(uri.to_string()).or_default().short_uri = Some(short.to_string());
        self
    }

    /// Load a table such as `{"emf:Document": {"parents": ["emf:Media"], "title": "Document"}}`.
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let data = fs::read_to_string(path).map_err(|source| SheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| SheetError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn entry(&self, uri: &str) -> Option<&ClassEntry> {
        self.classes.get(uri).or_else(|| {
            self.classes
                .iter()
                .find(|(known, _)| eq_folded(known, uri))
                .map(|(_, entry)| entry)
        })
    }
}

impl SemanticHierarchy for StaticHierarchy {
    /// Breadth-first over declared parents; cycles are cut.
    fn ancestors(&self, uri: &str) -> Vec<String> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        seen.insert(uri.to_string());
        let mut ancestors = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(uri);

        while let Some(current) = queue.pop_front() {
            let Some(entry) = self.entry(current) else {
                continue;
            };
            for parent in &entry.parents {
                if seen.insert(parent.clone()) {
                    ancestors.push(parent.clone());
                    queue.push_back(parent);
                }
            }
        }
        ancestors
    }

    fn short_uri(&self, uri: &str) -> String {
        self.entry(uri)
            .and_then(|entry| entry.short_uri.clone())
            .unwrap_or_else(|| uri.to_string())
    }

    fn class_title(&self, uri: &str) -> Option<String> {
        self.entry(uri).and_then(|entry| entry.title.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_are_transitive_and_cycle_safe() {
        let hierarchy = StaticHierarchy::new()
            .with_class("emf:Image", ["emf:Media"])
            .with_class("emf:Media", ["emf:Entity"])
            .with_class("emf:Entity", ["emf:Image"]);
        assert_eq!(
            hierarchy.ancestors("emf:Image"),
            vec!["emf:Media".to_string(), "emf:Entity".to_string()]
        );
        assert!(hierarchy.ancestors("emf:Unknown").is_empty());
    }

    #[test]
    fn short_uri_and_title_fall_back() {
        let hierarchy = StaticHierarchy::new()
            .with_short_uri("http://example.org/emf#Image", "emf:Image")
            .with_title("http://example.org/emf#Image", "Image");
        assert_eq!(hierarchy.short_uri("http://example.org/emf#Image"), "emf:Image");
        assert_eq!(hierarchy.short_uri("emf:Other"), "emf:Other");
        assert_eq!(
            hierarchy.class_title("HTTP://EXAMPLE.ORG/EMF#IMAGE").as_deref(),
            Some("Image")
        );
        assert_eq!(hierarchy.class_title("emf:Other"), None);
    }
}
