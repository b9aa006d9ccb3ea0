//! Case-normalized identity keys.
//!
//! Identifiers and URIs are compared case-insensitively throughout the model.
//! Rather than folding case on every lookup, values are normalized once when
//! they enter an index and the indices are keyed by the normalized form.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Upper-cased identifier or URI used as an index key.
pub struct DefinitionKey(String);

impl DefinitionKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DefinitionKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive equality under the same folding as [`DefinitionKey`].
pub(crate) fn eq_folded(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a == b || a.to_uppercase() == b.to_uppercase()
}

/// Canonical form used for stored aliases.
pub(crate) fn normalize_alias(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Push `raw` into `aliases` in canonical form unless it is blank or already present.
pub(crate) fn insert_alias(aliases: &mut Vec<String>, raw: &str) {
    if let Some(alias) = normalize_alias(raw) {
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }
}

/// Membership test against aliases stored by [`insert_alias`].
pub(crate) fn contains_alias(aliases: &[String], name: &str) -> bool {
    match normalize_alias(name) {
        Some(alias) => aliases.contains(&alias),
        None => false,
    }
}

/// Prefix of a prefixed-name URI (`emf:hasParent` -> `emf`).
///
/// Absolute URIs (`http://...`) and bare names have no namespace prefix.
pub(crate) fn namespace_prefix(uri: &str) -> Option<&str> {
    let (prefix, local) = uri.trim().split_once(':')?;
    if prefix.is_empty() || local.starts_with("//") {
        return None;
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return None;
    }
    Some(prefix)
}
