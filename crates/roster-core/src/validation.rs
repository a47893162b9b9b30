//! Validation utilities.

use crate::{FieldError, RosterError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RosterError` on failure.
    fn validate_request(&self) -> Result<(), RosterError> {
        self.validate().map_err(validation_errors_to_roster_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    // HashMap iteration order is not stable
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Converts `validator::ValidationErrors` to `RosterError`.
#[must_use]
pub fn validation_errors_to_roster_error(errors: ValidationErrors) -> RosterError {
    let message = collect_field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    RosterError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::{ValidateEmail, ValidationError};

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a gender value.
    pub fn valid_gender(gender: &str) -> Result<(), ValidationError> {
        match gender {
            "male" | "female" => Ok(()),
            _ => Err(ValidationError::new("gender_invalid")),
        }
    }

    /// Validates a two-letter nationality code.
    pub fn valid_nationality(code: &str) -> Result<(), ValidationError> {
        if code.chars().count() != 2 {
            return Err(ValidationError::new("nationality_length"));
        }
        Ok(())
    }

    /// Validates that every contact address is an e-mail address.
    pub fn valid_contact_addresses(addresses: &[String]) -> Result<(), ValidationError> {
        if addresses.iter().all(|address| address.validate_email()) {
            Ok(())
        } else {
            Err(ValidationError::new("email"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "required"))]
        name: String,
        #[validate(email)]
        address: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_gender() {
        assert!(valid_gender("male").is_ok());
        assert!(valid_gender("female").is_ok());
        assert!(valid_gender("Male").is_err());
        assert!(valid_gender("other").is_err());
    }

    #[test]
    fn test_valid_nationality() {
        assert!(valid_nationality("GB").is_ok());
        assert!(valid_nationality("GBR").is_err());
        assert!(valid_nationality("").is_err());
    }

    #[test]
    fn test_valid_contact_addresses() {
        assert!(valid_contact_addresses(&[]).is_ok());
        assert!(valid_contact_addresses(&["ada@example.com".to_string()]).is_ok());
        assert!(valid_contact_addresses(&[
            "ada@example.com".to_string(),
            "not-an-email".to_string()
        ])
        .is_err());
    }

    #[test]
    fn test_validate_request_folds_field_errors() {
        let sample = Sample {
            name: String::new(),
            address: "nope".to_string(),
        };
        let err = sample.validate_request().unwrap_err();
        assert_eq!(err.status_code(), 400);
        let message = err.to_string();
        assert!(message.contains("address: email"));
        assert!(message.contains("name: required"));
    }

    #[test]
    fn test_collect_field_errors_is_sorted() {
        let sample = Sample {
            name: String::new(),
            address: "nope".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let fields: Vec<_> = collect_field_errors(&errors)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["address".to_string(), "name".to_string()]);
    }
}
