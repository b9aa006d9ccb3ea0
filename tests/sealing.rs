// Sealed model guard rails: case-insensitive identity, wire round-trip, and
// read-only sharing across threads.
mod support;

use integration_model::{
    EntityProperty, EntityRelation, EntityType, ModelConfiguration, SealedModel,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::thread;

use support::scenario;

#[test]
fn definition_id_lookup_ignores_case() -> anyhow::Result<()> {
    let mut draft = ModelConfiguration::new();
    draft.add_entity_type(EntityType::new("Case"))?;
    let model = draft.seal()?;

    let lower = model.get_type_by_definition_id("case").expect("lower");
    let upper = model.get_type_by_definition_id("CASE").expect("upper");
    assert!(std::ptr::eq(lower, upper));
    Ok(())
}

#[test]
fn duplicate_identifier_differing_by_case_is_rejected() {
    let mut draft = ModelConfiguration::new();
    draft
        .add_entity_type(EntityType::new("Case"))
        .expect("first add");
    let err = draft
        .add_entity_type(EntityType::new("CASE"))
        .expect_err("second add");
    assert_eq!(err.to_string(), "duplicate entity type identifier 'CASE'");
}

#[test]
fn wire_form_carries_entities_only() -> anyhow::Result<()> {
    let model = scenario()?.compile()?;
    let value = serde_json::to_value(&model)?;

    let Value::Object(fields) = &value else {
        panic!("expected object, got {value}");
    };
    assert_eq!(fields.keys().collect::<Vec<_>>(), ["entities"]);
    assert_eq!(
        value["entities"][0]["relations"][0],
        json!({
            "title": "has parent",
            "domain": "all",
            "uri": "emf:hasParent",
            "externals": ["parent"]
        })
    );
    assert_eq!(value["entities"][0]["externals"], json!(["doc"]));
    Ok(())
}

#[test]
fn round_trip_reconstructs_equal_entities() -> anyhow::Result<()> {
    let defs = scenario()?;
    defs.properties(
        "Document",
        &[
            ("doc_number", "emf:documentNumber", "Number"),
            ("doc_date", "dc:date", "Date"),
        ],
    )?;
    let model = defs.compile()?;

    let wire = serde_json::to_string(&model)?;
    let draft: ModelConfiguration = serde_json::from_str(&wire)?;
    let resealed = draft.seal()?;
    assert_eq!(resealed.entity_types(), model.entity_types());

    let direct: SealedModel = serde_json::from_str(&wire)?;
    assert_eq!(direct, model);
    assert_eq!(
        direct.get_property_by_external_name("doc_date").and_then(EntityProperty::uri),
        Some("dc:date")
    );
    Ok(())
}

#[test]
fn sealing_conflicting_wire_form_fails() {
    let wire = json!({
        "entities": [
            {"identifier": "A", "properties": [{"data_key": "title", "uri": "dc:title"}]},
            {"identifier": "B", "properties": [{"data_key": "title", "uri": "emf:title"}]}
        ]
    });
    let result: Result<SealedModel, serde_json::Error> = serde_json::from_value(wire);
    let err = result.expect_err("conflict must be rejected").to_string();
    assert!(err.contains("conflicting definitions"), "{err}");
}

#[test]
fn sealed_model_reads_from_many_threads() -> anyhow::Result<()> {
    let model = Arc::new(scenario()?.compile()?);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            thread::spawn(move || {
                model
                    .get_property_by_external_name("title")
                    .and_then(EntityProperty::uri)
                    .map(str::to_string)
            })
        })
        .collect();
    for handle in handles {
        let uri = handle.join().expect("reader thread panicked");
        assert_eq!(uri.as_deref(), Some("dc:title"));
    }
    Ok(())
}

fn case_variant(text: &str, mask: &[bool]) -> String {
    text.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn type_aliases_match_any_case(
        alias in "[A-Za-z][A-Za-z ]{0,15}",
        mask in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let mut entity = EntityType::new("Document");
        entity.add_mappings([alias.as_str()]);
        prop_assert!(entity.has_mapping(&case_variant(&alias, &mask)));
    }

    #[test]
    fn relation_aliases_match_any_case(
        alias in "[A-Za-z][A-Za-z_]{0,15}",
        mask in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let mut relation = EntityRelation::new("emf:hasParent");
        relation.add_mappings([alias.as_str()]);
        prop_assert!(relation.has_mapping(&case_variant(&alias, &mask)));
        prop_assert!(relation.mappings().iter().all(|m| m.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn identifiers_collide_regardless_of_case(
        id in "[A-Za-z]{1,12}",
        mask in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let mut draft = ModelConfiguration::new();
        prop_assert!(draft.add_entity_type(EntityType::new(id.as_str())).is_ok());
        let variant = case_variant(&id, &mask);
        prop_assert!(draft.add_entity_type(EntityType::new(variant.as_str())).is_err());
        let model = draft.seal().expect("single type seals");
        prop_assert!(model.get_type_by_definition_id(&variant).is_some());
    }
}
