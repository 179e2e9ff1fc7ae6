//! Built-in form catalogue.
//!
//! Registration order here is the keyword tie-break order used by the
//! resolver: the first schema registered wins.

use super::field::FieldDefinition;
use super::schema::{FormMetadata, FormSchema};
use crate::domain::foundation::ValidationError;

const GENDERS: [&str; 3] = ["Male", "Female", "Transgender"];

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Builds the schemas shipped with the service, in registration order.
///
/// # Errors
///
/// Only if one of the definitions below breaks a schema invariant.
pub fn builtin_schemas() -> Result<Vec<FormSchema>, ValidationError> {
    Ok(vec![
        pan_card_application()?,
        passport_application()?,
        driving_licence_application()?,
        voter_id_registration()?,
        birth_certificate()?,
    ])
}

fn pan_card_application() -> Result<FormSchema, ValidationError> {
    FormSchema::new(
        "pan_card_application",
        "PAN Card Application (Form 49A)",
        FormMetadata::new("Income Tax Department (Protean / UTIITSL)")
            .with_fee("₹107")
            .with_processing_time("15-20 working days"),
        keywords(&["pan", "permanent account number", "49a"]),
        vec![
            FieldDefinition::text("full_name", "What is your full name as it should appear on the card?"),
            FieldDefinition::text("father_name", "What is your father's full name?"),
            FieldDefinition::date("date_of_birth", "What is your date of birth (DD/MM/YYYY)?"),
            FieldDefinition::choice("gender", "What is your gender?", GENDERS),
            FieldDefinition::phone("mobile_number", "What is your 10-digit mobile number?"),
            FieldDefinition::email("email_address", "What is your email address?"),
            FieldDefinition::long_text("residential_address", "What is your full residential address?"),
        ],
    )
}

fn passport_application() -> Result<FormSchema, ValidationError> {
    FormSchema::new(
        "passport_application",
        "Passport Application",
        FormMetadata::new("Ministry of External Affairs (Passport Seva)")
            .with_fee("₹1,500 (36 pages, normal scheme)")
            .with_processing_time("30-45 days"),
        keywords(&["passport", "passport seva"]),
        vec![
            FieldDefinition::choice("application_type", "Is this a fresh application or a re-issue?", ["Fresh", "Re-issue"]),
            FieldDefinition::choice("booklet_type", "Which booklet do you need?", ["36 pages", "60 pages"]),
            FieldDefinition::text("full_name", "What is your full name?"),
            FieldDefinition::date("date_of_birth", "What is your date of birth (DD/MM/YYYY)?"),
            FieldDefinition::text("place_of_birth", "Where were you born (city and state)?"),
            FieldDefinition::phone("mobile_number", "What is your 10-digit mobile number?"),
            FieldDefinition::email("email_address", "What is your email address?"),
            FieldDefinition::long_text("present_address", "What is your present address?"),
        ],
    )
}

fn driving_licence_application() -> Result<FormSchema, ValidationError> {
    FormSchema::new(
        "driving_licence_application",
        "Driving Licence Application",
        FormMetadata::new("Regional Transport Office (Parivahan)")
            .with_fee("₹200 + test fee")
            .with_processing_time("7-30 days"),
        keywords(&["driving licence", "driving license", "dl", "learner", "learners"]),
        vec![
            FieldDefinition::text("full_name", "What is your full name?"),
            FieldDefinition::date("date_of_birth", "What is your date of birth (DD/MM/YYYY)?"),
            FieldDefinition::choice(
                "blood_group",
                "What is your blood group?",
                ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"],
            ),
            FieldDefinition::choice(
                "vehicle_class",
                "Which vehicle class are you applying for?",
                ["MCWG (two-wheeler)", "LMV (car)", "Transport"],
            ),
            FieldDefinition::phone("mobile_number", "What is your 10-digit mobile number?"),
            FieldDefinition::email("email_address", "What is your email address?").optional(),
            FieldDefinition::long_text("permanent_address", "What is your permanent address?"),
        ],
    )
}

fn voter_id_registration() -> Result<FormSchema, ValidationError> {
    FormSchema::new(
        "voter_id_registration",
        "Voter ID Registration (Form 6)",
        FormMetadata::new("Election Commission of India")
            .with_fee("Free")
            .with_processing_time("About 30 days"),
        keywords(&["voter", "voter id", "epic", "election card", "electoral"]),
        vec![
            FieldDefinition::text("full_name", "What is your full name?"),
            FieldDefinition::text("relative_name", "What is the name of your father, mother or spouse?"),
            FieldDefinition::date("date_of_birth", "What is your date of birth (DD/MM/YYYY)?"),
            FieldDefinition::choice("gender", "What is your gender?", GENDERS),
            FieldDefinition::phone("mobile_number", "What is your 10-digit mobile number?"),
            FieldDefinition::email("email_address", "What is your email address?").optional(),
            FieldDefinition::text("assembly_constituency", "Which assembly constituency do you live in?"),
            FieldDefinition::long_text("ordinary_residence", "What is your address of ordinary residence?"),
        ],
    )
}

fn birth_certificate() -> Result<FormSchema, ValidationError> {
    FormSchema::new(
        "birth_certificate",
        "Birth Certificate Request",
        FormMetadata::new("Municipal Registrar of Births and Deaths")
            .with_fee("₹50")
            .with_processing_time("7 working days"),
        keywords(&["birth certificate", "birth"]),
        vec![
            FieldDefinition::text("child_name", "What is the child's full name?"),
            FieldDefinition::date("date_of_birth", "What is the date of birth (DD/MM/YYYY)?"),
            FieldDefinition::text("place_of_birth", "Where did the birth take place (hospital or address)?"),
            FieldDefinition::choice("gender", "What is the child's gender?", GENDERS),
            FieldDefinition::text("father_name", "What is the father's full name?"),
            FieldDefinition::text("mother_name", "What is the mother's full name?"),
            FieldDefinition::phone("informant_mobile", "What is the informant's 10-digit mobile number?"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogue_is_well_formed() {
        let schemas = builtin_schemas().unwrap();
        assert_eq!(schemas.len(), 5);
        assert_eq!(schemas[0].id(), "pan_card_application");
    }

    #[test]
    fn pan_schema_carries_pan_keyword() {
        let schemas = builtin_schemas().unwrap();
        assert!(schemas[0].keywords().iter().any(|k| k == "pan"));
    }

    #[test]
    fn every_builtin_schema_has_metadata() {
        for schema in builtin_schemas().unwrap() {
            assert!(!schema.metadata().authority.is_empty(), "{}", schema.id());
            assert!(schema.metadata().fee.is_some(), "{}", schema.id());
        }
    }
}
