//! Compiled integration model.
//!
//! Leaf value types (`EntityProperty`, `EntityRelation`) are owned by an
//! `EntityType`; types are collected in a mutable `ModelConfiguration` while the
//! builder runs and frozen into a `SealedModel` once complete.

pub mod configuration;
pub mod entity;
pub mod key;
pub mod property;
pub mod relation;
pub mod sealed;

pub use configuration::ModelConfiguration;
pub use entity::EntityType;
pub use key::DefinitionKey;
pub use property::EntityProperty;
pub use relation::{EntityRelation, WILDCARD_DOMAINS, is_wildcard_domain};
pub use sealed::SealedModel;
