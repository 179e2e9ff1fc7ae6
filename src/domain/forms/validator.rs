//! Field validator - checks one raw answer against one field definition.
//!
//! Pure and idempotent: feeding an accepted value back in yields the same
//! acceptance with the same value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::field::{FieldDefinition, FieldType};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid date regex"));

pub const REASON_EMAIL: &str = "not a valid email address";
pub const REASON_PHONE: &str = "not a valid 10-digit mobile number";
pub const REASON_DATE: &str = "expected date in DD/MM/YYYY format";
pub const REASON_REQUIRED: &str = "this field is required";

/// Result of validating a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted { value: String },
    Rejected { reason: String },
}

impl ValidationOutcome {
    fn accepted(value: impl Into<String>) -> Self {
        Self::Accepted {
            value: value.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Validates `raw` against `field`.
pub fn validate(field: &FieldDefinition, raw: &str) -> ValidationOutcome {
    let trimmed = raw.trim();

    if !field.required && trimmed.is_empty() {
        return ValidationOutcome::accepted("");
    }

    match field.field_type {
        FieldType::Email => validate_email(trimmed),
        FieldType::Phone => validate_phone(raw),
        FieldType::Date => validate_date(trimmed),
        FieldType::Choice => validate_choice(field, raw),
        FieldType::Text | FieldType::LongText => validate_text(trimmed),
    }
}

fn validate_email(trimmed: &str) -> ValidationOutcome {
    if EMAIL_PATTERN.is_match(trimmed) {
        ValidationOutcome::accepted(trimmed)
    } else {
        ValidationOutcome::rejected(REASON_EMAIL)
    }
}

/// Mobile-number convention: ten digits, leading digit 6-9.
fn validate_phone(raw: &str) -> ValidationOutcome {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let valid_lead = matches!(digits.chars().next(), Some('6'..='9'));

    if digits.len() == 10 && valid_lead {
        ValidationOutcome::accepted(digits)
    } else {
        ValidationOutcome::rejected(REASON_PHONE)
    }
}

// Syntactic only; 31/02/2024 passes.
fn validate_date(trimmed: &str) -> ValidationOutcome {
    if DATE_PATTERN.is_match(trimmed) {
        ValidationOutcome::accepted(trimmed)
    } else {
        ValidationOutcome::rejected(REASON_DATE)
    }
}

/// Permissive match: equal, contained in, or containing an option.
/// The stored value is the raw input, not the matched option.
fn validate_choice(field: &FieldDefinition, raw: &str) -> ValidationOutcome {
    let answer = raw.trim().to_lowercase();

    let matched = !answer.is_empty()
        && field.options.iter().any(|option| {
            let option = option.trim().to_lowercase();
            !option.is_empty()
                && (option == answer || option.contains(&answer) || answer.contains(&option))
        });

    if matched {
        ValidationOutcome::accepted(raw)
    } else {
        ValidationOutcome::rejected(format!("must be one of: {}", field.options.join(", ")))
    }
}

fn validate_text(trimmed: &str) -> ValidationOutcome {
    if trimmed.is_empty() {
        ValidationOutcome::rejected(REASON_REQUIRED)
    } else {
        ValidationOutcome::accepted(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn accepted(value: &str) -> ValidationOutcome {
        ValidationOutcome::Accepted {
            value: value.to_string(),
        }
    }

    fn rejected(reason: &str) -> ValidationOutcome {
        ValidationOutcome::Rejected {
            reason: reason.to_string(),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Phone
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn phone_strips_separators() {
        let field = FieldDefinition::phone("mobile_number", "Mobile?");
        assert_eq!(validate(&field, "98765-43210"), accepted("9876543210"));
        assert_eq!(validate(&field, "(987) 654 3210"), accepted("9876543210"));
    }

    #[test]
    fn phone_rejects_wrong_length_or_leading_digit() {
        let field = FieldDefinition::phone("mobile_number", "Mobile?");
        assert_eq!(validate(&field, "987654321"), rejected(REASON_PHONE));
        assert_eq!(validate(&field, "5876543210"), rejected(REASON_PHONE));
        assert_eq!(validate(&field, "+91 98765 43210"), rejected(REASON_PHONE));
    }

    // ───────────────────────────────────────────────────────────────
    // Email
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn email_rejects_missing_at_sign() {
        let field = FieldDefinition::email("email_address", "Email?");
        assert_eq!(validate(&field, "not-an-email"), rejected(REASON_EMAIL));
    }

    #[test]
    fn email_accepts_trimmed_address() {
        let field = FieldDefinition::email("email_address", "Email?");
        assert_eq!(
            validate(&field, "  asha@example.in "),
            accepted("asha@example.in")
        );
        assert_eq!(validate(&field, "asha@example"), rejected(REASON_EMAIL));
    }

    // ───────────────────────────────────────────────────────────────
    // Date
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn date_check_is_syntactic_only() {
        let field = FieldDefinition::date("date_of_birth", "DOB?");
        assert_eq!(validate(&field, "31/02/1990"), accepted("31/02/1990"));
        assert_eq!(validate(&field, "1/2/1990"), rejected(REASON_DATE));
        assert_eq!(validate(&field, "1990-02-01"), rejected(REASON_DATE));
    }

    #[test]
    fn date_requires_ascii_digits() {
        let field = FieldDefinition::date("date_of_birth", "DOB?");
        assert_eq!(validate(&field, "١٢/٠٣/٢٠٢٠"), rejected(REASON_DATE));
        assert_eq!(validate(&field, "１２/０３/２０２０"), rejected(REASON_DATE));
    }

    // ───────────────────────────────────────────────────────────────
    // Choice
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn choice_accepts_case_insensitive_match_and_keeps_raw_input() {
        let field = FieldDefinition::choice("gender", "Gender?", ["Male", "Female"]);
        assert_eq!(validate(&field, "FEMALE"), accepted("FEMALE"));
        assert_eq!(validate(&field, "I am male"), accepted("I am male"));
    }

    #[test]
    fn choice_substring_rule_is_permissive() {
        let field = FieldDefinition::choice("vehicle", "Vehicle?", ["LMV (car)", "Transport"]);
        assert!(validate(&field, "car").is_accepted());
        assert!(validate(&field, "port").is_accepted());
    }

    #[test]
    fn choice_rejection_lists_options() {
        let field = FieldDefinition::choice("gender", "Gender?", ["Male", "Female"]);
        assert_eq!(
            validate(&field, "robot"),
            rejected("must be one of: Male, Female")
        );
    }

    #[test]
    fn empty_required_choice_is_rejected() {
        let field = FieldDefinition::choice("gender", "Gender?", ["Male", "Female"]);
        assert!(!validate(&field, "   ").is_accepted());
    }

    // ───────────────────────────────────────────────────────────────
    // Text and optionality
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn text_requires_non_blank_input() {
        let field = FieldDefinition::text("full_name", "Name?");
        assert_eq!(validate(&field, "   "), rejected(REASON_REQUIRED));
        assert_eq!(validate(&field, " Asha Rao "), accepted("Asha Rao"));
    }

    #[test]
    fn optional_field_accepts_blank_as_empty_value() {
        let field = FieldDefinition::email("alt_email", "Alt email?").optional();
        assert_eq!(validate(&field, "  "), accepted(""));
        assert_eq!(validate(&field, "junk"), rejected(REASON_EMAIL));
    }

    fn any_field() -> impl Strategy<Value = FieldDefinition> {
        prop_oneof![
            Just(FieldDefinition::text("t", "T?")),
            Just(FieldDefinition::long_text("l", "L?")),
            Just(FieldDefinition::email("e", "E?")),
            Just(FieldDefinition::phone("p", "P?")),
            Just(FieldDefinition::date("d", "D?")),
            Just(FieldDefinition::choice("c", "C?", ["Male", "Female", "Other"])),
            Just(FieldDefinition::text("o", "O?").optional()),
        ]
    }

    proptest! {
        #[test]
        fn accepted_values_revalidate_to_themselves(field in any_field(), raw in ".{0,24}") {
            if let ValidationOutcome::Accepted { value } = validate(&field, &raw) {
                prop_assert_eq!(validate(&field, &value), ValidationOutcome::Accepted { value });
            }
        }

        #[test]
        fn formatted_phone_numbers_are_accepted(lead in 6u8..=9, rest in "[0-9]{9}") {
            let field = FieldDefinition::phone("p", "P?");
            let raw = format!("{}{}-{}", lead, &rest[..4], &rest[4..]);
            prop_assert!(validate(&field, &raw).is_accepted());
        }
    }
}
