//! Input validation helpers
//!
//! Request types derive `validator::Validate`; this module turns the
//! resulting error map into a single field/message pair for API responses.

use validator::ValidationErrors;

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.field, self.message)
    }
}

/// Pick the first failing field, ordered by field name so responses are stable.
pub fn first_violation(errors: &ValidationErrors) -> Option<ValidationError> {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    let field = fields.into_iter().next()?;
    let message = field_errors
        .get(field)
        .and_then(|errs| errs.first())
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .unwrap_or_else(|| "invalid".to_string());

    Some(ValidationError::new(field, &message))
}

/// Reject empty or whitespace-only values
pub fn validate_not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegisterRequest;
    use proptest::prelude::*;
    use rstest::rstest;
    use validator::Validate;

    #[test]
    fn test_first_violation_reports_field_and_message() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "pw".to_string(),
            email: "nope".to_string(),
            birthday: None,
        };
        let errors = req.validate().unwrap_err();
        let violation = first_violation(&errors).unwrap();

        assert_eq!(violation.field, "email");
        assert_eq!(violation.message, "Email does not appear to be valid");
    }

    #[test]
    fn test_first_violation_is_ordered_by_field() {
        let req = RegisterRequest {
            username: String::new(),
            password: String::new(),
            email: "nope".to_string(),
            birthday: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(first_violation(&errors).unwrap().field, "email");
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("\t\n")]
    fn test_blank_values_rejected(#[case] value: &str) {
        assert!(validate_not_blank("username", value).is_err());
    }

    proptest! {
        #[test]
        fn prop_values_with_visible_chars_accepted(value in "[a-zA-Z0-9]{1,32}") {
            prop_assert!(validate_not_blank("username", &value).is_ok());
        }
    }
}
