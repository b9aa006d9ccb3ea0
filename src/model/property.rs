use crate::model::key::eq_folded;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A single field mapping between an external data-key and an internal URI.
///
/// Properties are plain values: two properties are the same definition when
/// every field matches. The descriptive fields mirror the optional columns of
/// the property sheets.
pub struct EntityProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codelist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
}

impl EntityProperty {
    /// Property with only the two identity-bearing mapping fields set.
    pub fn mapping(data_key: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            data_key: Some(data_key.into()),
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn data_key(&self) -> Option<&str> {
        self.data_key.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True when the internal URI matches `uri`, ignoring case.
    pub fn has_uri(&self, uri: &str) -> bool {
        self.uri
            .as_deref()
            .is_some_and(|own| eq_folded(own, uri))
    }
}

impl fmt::Display for EntityProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.data_key.as_deref().unwrap_or("<no data key>"),
            self.uri.as_deref().unwrap_or("<no uri>")
        )?;
        if let Some(title) = &self.title {
            write!(f, " ({title})")?;
        }
        if let Some(data_type) = &self.data_type {
            write!(f, " [{data_type}]")?;
        }
        if self.mandatory {
            f.write_str(" mandatory")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_covers_descriptive_fields() {
        let plain = EntityProperty::mapping("title", "dc:title");
        let mut titled = plain.clone();
        titled.title = Some("Title".to_string());
        assert_eq!(plain, EntityProperty::mapping("title", "dc:title"));
        assert_ne!(plain, titled);
    }

    #[test]
    fn uri_match_ignores_case() {
        let property = EntityProperty::mapping("title", "dc:title");
        assert!(property.has_uri("DC:TITLE"));
        assert!(!property.has_uri("dc:description"));
        assert!(!EntityProperty::default().has_uri("dc:title"));
    }

    #[test]
    fn display_names_both_sides_of_the_mapping() {
        let mut property = EntityProperty::mapping("title", "dc:title");
        property.data_type = Some("an..180".to_string());
        assert_eq!(property.to_string(), "title -> dc:title [an..180]");
        assert_eq!(
            EntityProperty::default().to_string(),
            "<no data key> -> <no uri>"
        );
    }
}
