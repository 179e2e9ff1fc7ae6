//! Field definitions - the unit of data a form asks for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a form field.
///
/// The type decides which validation rule applies to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Choice,
    Email,
    Phone,
    Date,
    LongText,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Choice => "choice",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::LongText => "long-text",
        };
        write!(f, "{}", s)
    }
}

/// A single question within a form schema.
///
/// # Invariants
///
/// - `name` is unique within its schema (checked by `FormSchema`)
/// - a `Choice` field carries at least one option (checked by `FormSchema`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Machine name, used as the key in the answer set.
    pub name: String,

    /// Question shown to the user.
    pub prompt: String,

    /// Declared type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Whether an empty answer is acceptable.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Permissible answers for `Choice` fields, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

fn default_required() -> bool {
    true
}

impl FieldDefinition {
    fn new(name: impl Into<String>, prompt: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            field_type,
            required: true,
            options: Vec::new(),
        }
    }

    /// Creates a required free-text field.
    pub fn text(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt, FieldType::Text)
    }

    /// Creates a required multi-line text field.
    pub fn long_text(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt, FieldType::LongText)
    }

    /// Creates a required email field.
    pub fn email(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt, FieldType::Email)
    }

    /// Creates a required mobile-number field.
    pub fn phone(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt, FieldType::Phone)
    }

    /// Creates a required DD/MM/YYYY date field.
    pub fn date(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt, FieldType::Date)
    }

    /// Creates a required choice field with the given options.
    pub fn choice<I, S>(name: impl Into<String>, prompt: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new(name, prompt, FieldType::Choice)
        }
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Prompt text as asked in conversation, including options for choice fields.
    pub fn question(&self) -> String {
        let mut question = self.prompt.clone();
        if self.field_type == FieldType::Choice && !self.options.is_empty() {
            question.push_str(&format!(" ({})", self.options.join(" / ")));
        }
        if !self.required {
            question.push_str(" [optional, reply with a blank message to skip]");
        }
        question
    }
}
