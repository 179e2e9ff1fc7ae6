//! Form schemas and the schema shapes a session can be bound to.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::foundation::ValidationError;

use super::field::{FieldDefinition, FieldType};

/// Administrative metadata printed alongside a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMetadata {
    /// Issuing authority.
    pub authority: String,

    /// Application fee, as displayed to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,

    /// Typical processing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
}

impl FormMetadata {
    /// Creates metadata with only an authority.
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            fee: None,
            processing_time: None,
        }
    }

    /// Sets the fee.
    pub fn with_fee(mut self, fee: impl Into<String>) -> Self {
        self.fee = Some(fee.into());
        self
    }

    /// Sets the processing time.
    pub fn with_processing_time(mut self, processing_time: impl Into<String>) -> Self {
        self.processing_time = Some(processing_time.into());
        self
    }
}

/// Unchecked schema shape as it appears in a catalogue file.
///
/// Converted into a [`FormSchema`] through `TryFrom`, which enforces the
/// schema invariants.
#[derive(Debug, Clone, Deserialize)]
pub struct FormSchemaSpec {
    pub id: String,
    pub display_name: String,
    #[serde(flatten)]
    pub metadata: FormMetadata,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

/// Immutable description of a form.
///
/// # Invariants
///
/// - `id` and `display_name` are non-empty
/// - at least one field
/// - field names are unique
/// - every `Choice` field has a non-empty option set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FormSchemaSpec")]
pub struct FormSchema {
    id: String,
    display_name: String,
    #[serde(flatten)]
    metadata: FormMetadata,
    keywords: Vec<String>,
    fields: Vec<FieldDefinition>,
}

impl TryFrom<FormSchemaSpec> for FormSchema {
    type Error = ValidationError;

    fn try_from(raw: FormSchemaSpec) -> Result<Self, Self::Error> {
        FormSchema::new(raw.id, raw.display_name, raw.metadata, raw.keywords, raw.fields)
    }
}

impl FormSchema {
    /// Creates a schema, checking its structural invariants.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the id, display name or field list is empty
    /// - `Duplicate` if two fields share a name
    /// - `InvalidFormat` if a choice field has no options
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        metadata: FormMetadata,
        keywords: Vec<String>,
        fields: Vec<FieldDefinition>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let display_name = display_name.into();

        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }
        if fields.is_empty() {
            return Err(ValidationError::empty_field("fields"));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(ValidationError::empty_field("fields.name"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ValidationError::duplicate("fields.name", field.name.clone()));
            }
            if field.field_type == FieldType::Choice
                && field.options.iter().all(|o| o.trim().is_empty())
            {
                return Err(ValidationError::invalid_format(
                    format!("fields.{}.options", field.name),
                    "choice field needs at least one option",
                ));
            }
        }

        let keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            id,
            display_name,
            metadata,
            keywords,
            fields,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn metadata(&self) -> &FormMetadata {
        &self.metadata
    }

    /// Lowercased keywords used by deterministic matching.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field at `index`, if any.
    pub fn field(&self, index: usize) -> Option<&FieldDefinition> {
        self.fields.get(index)
    }

    /// Summary projection for listings.
    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            authority: self.metadata.authority.clone(),
            fee: self.metadata.fee.clone(),
            field_count: self.fields.len(),
        }
    }
}

/// Lightweight listing entry for a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: String,
    pub display_name: String,
    pub authority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub field_count: usize,
}

/// The schema a session is collecting against.
///
/// Closed over the two shapes the engine understands, so validation and
/// the state machine stay total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundSchema {
    /// A schema from the registry.
    Registered(Arc<FormSchema>),
    /// A schema inferred for this session only, never registered.
    AdHoc(Arc<FormSchema>),
}

impl BoundSchema {
    /// Returns the underlying schema regardless of provenance.
    pub fn schema(&self) -> &FormSchema {
        match self {
            BoundSchema::Registered(schema) | BoundSchema::AdHoc(schema) => schema,
        }
    }

    pub fn id(&self) -> &str {
        self.schema().id()
    }

    pub fn display_name(&self) -> &str {
        self.schema().display_name()
    }

    pub fn field_count(&self) -> usize {
        self.schema().field_count()
    }

    pub fn field(&self, index: usize) -> Option<&FieldDefinition> {
        self.schema().field(index)
    }

    /// True for registry-backed schemas.
    pub fn is_registered(&self) -> bool {
        matches!(self, BoundSchema::Registered(_))
    }
}
