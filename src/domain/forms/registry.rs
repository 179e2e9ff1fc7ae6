//! Schema Registry - read-only catalogue of known forms.
//!
//! Loaded once at startup and never mutated afterwards, so it can be
//! shared freely behind an `Arc`.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

use super::catalogue::builtin_schemas;
use super::schema::{FormSchema, FormSummary};

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate form id: {0}")]
    DuplicateId(String),

    #[error("Invalid form schema: {0}")]
    InvalidSchema(#[from] ValidationError),

    #[error("Failed to parse catalogue: {0}")]
    Parse(String),

    #[error("Failed to read catalogue {path}: {message}")]
    Io { path: String, message: String },
}

/// Catalogue file layout.
#[derive(Debug, Deserialize)]
struct CatalogueFile {
    forms: Vec<FormSchema>,
}

/// Read-only, ordered catalogue of form schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<Arc<FormSchema>>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Builds a registry, keeping the given order as registration order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if two schemas share an id.
    pub fn new(schemas: Vec<FormSchema>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(schemas.len());
        let mut stored = Vec::with_capacity(schemas.len());

        for schema in schemas {
            if index.contains_key(schema.id()) {
                return Err(RegistryError::DuplicateId(schema.id().to_string()));
            }
            index.insert(schema.id().to_string(), stored.len());
            stored.push(Arc::new(schema));
        }

        Ok(Self {
            schemas: stored,
            index,
        })
    }

    /// Registry holding the built-in catalogue.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin_schemas()?)
    }

    /// Parses a YAML catalogue (`forms: [...]`).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let file: CatalogueFile =
            serde_yaml::from_str(yaml).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::new(file.forms)
    }

    /// Reads and parses a YAML catalogue from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Looks up a schema by id. Absence is a normal outcome, not an error.
    pub fn lookup(&self, id: &str) -> Option<Arc<FormSchema>> {
        self.index.get(id).map(|&i| Arc::clone(&self.schemas[i]))
    }

    /// True if a schema with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Summaries of every schema, in registration order.
    pub fn list(&self) -> Vec<FormSummary> {
        self.schemas.iter().map(|s| s.summary()).collect()
    }

    /// Iterates schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FormSchema>> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::{FieldDefinition, FormMetadata};

    fn schema(id: &str) -> FormSchema {
        FormSchema::new(
            id,
            id.to_uppercase(),
            FormMetadata::new("Authority"),
            vec![id.to_string()],
            vec![FieldDefinition::text("name", "Name?")],
        )
        .unwrap()
    }

    #[test]
    fn lookup_returns_registered_schema() {
        let registry = SchemaRegistry::new(vec![schema("alpha"), schema("beta")]).unwrap();
        assert_eq!(registry.lookup("beta").unwrap().id(), "beta");
        assert!(registry.contains("alpha"));
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let registry = SchemaRegistry::new(vec![schema("alpha")]).unwrap();
        assert!(registry.lookup("gamma").is_none());
    }

    #[test]
    fn list_preserves_registration_order() {
        let registry =
            SchemaRegistry::new(vec![schema("zeta"), schema("alpha"), schema("mu")]).unwrap();
        let ids: Vec<_> = registry.list().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SchemaRegistry::new(vec![schema("alpha"), schema("alpha")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(id) if id == "alpha"));
    }

    #[test]
    fn builtin_registry_loads() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert!(registry.contains("pan_card_application"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn yaml_catalogue_loads_in_file_order() {
        let yaml = r#"
forms:
  - id: trade_licence
    display_name: Trade Licence
    authority: Municipal Corporation
    fee: "₹500"
    keywords: [trade, shop]
    fields:
      - name: business_name
        prompt: What is the business called?
      - name: category
        prompt: Which category?
        type: choice
        options: [Retail, Wholesale]
  - id: ration_card
    display_name: Ration Card
    authority: Food & Civil Supplies Department
    keywords: [ration]
    fields:
      - name: head_of_family
        prompt: Who is the head of the family?
"#;
        let registry = SchemaRegistry::from_yaml_str(yaml).unwrap();
        let ids: Vec<_> = registry.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["trade_licence", "ration_card"]);

        let trade = registry.lookup("trade_licence").unwrap();
        assert_eq!(trade.metadata().fee.as_deref(), Some("₹500"));
        assert_eq!(trade.field(1).unwrap().options, vec!["Retail", "Wholesale"]);
    }

    #[test]
    fn yaml_catalogue_with_invalid_schema_fails() {
        let yaml = r#"
forms:
  - id: broken
    display_name: Broken
    authority: Nobody
    fields:
      - name: pick
        prompt: Pick one
        type: choice
"#;
        assert!(matches!(
            SchemaRegistry::from_yaml_str(yaml),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn missing_catalogue_file_is_an_io_error() {
        let err = SchemaRegistry::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
