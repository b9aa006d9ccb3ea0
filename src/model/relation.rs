use crate::model::key::{contains_alias, eq_folded, insert_alias};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Relation domains that attach a relation to every registered entity type.
///
/// Matching is case-insensitive on the trimmed domain text.
pub const WILDCARD_DOMAINS: [&str; 4] = ["all", "entity", "media", "cultural object"];

/// Whether a relation domain is one of the [`WILDCARD_DOMAINS`].
pub fn is_wildcard_domain(domain: &str) -> bool {
    WILDCARD_DOMAINS
        .iter()
        .any(|keyword| eq_folded(keyword, domain))
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// A typed edge definition between entity types.
///
/// Identity is the URI plus the alias set; title, domain and range are
/// descriptive only.
pub struct EntityRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(
        default,
        rename = "externals",
        deserialize_with = "deserialize_aliases",
        skip_serializing_if = "Vec::is_empty"
    )]
    mappings: Vec<String>,
}

impl EntityRelation {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Builder-style setter for the domain text.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Register external aliases; each is stored lower-cased.
    pub fn add_mappings<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            insert_alias(&mut self.mappings, name.as_ref());
        }
    }

    /// Case-insensitive alias membership.
    pub fn has_mapping(&self, name: &str) -> bool {
        contains_alias(&self.mappings, name)
    }

    /// Aliases in registration order, lower-cased.
    pub fn mappings(&self) -> &[String] {
        &self.mappings
    }

    fn alias_set(&self) -> BTreeSet<&str> {
        self.mappings.iter().map(String::as_str).collect()
    }
}

impl PartialEq for EntityRelation {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.alias_set() == other.alias_set()
    }
}

impl Eq for EntityRelation {}

impl Hash for EntityRelation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        for alias in self.alias_set() {
            alias.hash(state);
        }
    }
}

pub(crate) fn deserialize_aliases<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    let mut aliases = Vec::with_capacity(raw.len());
    for name in &raw {
        insert_alias(&mut aliases, name);
    }
    Ok(aliases)
}
