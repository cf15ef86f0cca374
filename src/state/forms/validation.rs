//! Field validation rules
//!
//! Rules are pure: a field's kind and value map to valid or to a
//! [`FieldError`] carrying the message shown next to the field.

use super::field::{FieldKind, FormField};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum password length accepted by the login form
pub const MIN_PASSWORD_LEN: usize = 6;

pub const EMAIL_FORMAT_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_FORMAT_MESSAGE: &str = "Please enter a valid phone number";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern is valid"));

/// Kind of a validation failure, independent of its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Required,
    Format,
    TooShort,
}

/// A failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0}")]
    Required(String),
    #[error("{0}")]
    Format(String),
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::Required(_) => ErrorKind::Required,
            FieldError::Format(_) => ErrorKind::Format,
            FieldError::TooShort { .. } => ErrorKind::TooShort,
        }
    }

    /// The user-facing message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Outcome of applying a field's rule to its current value
pub type ValidationResult = Result<(), FieldError>;

/// Per-field results of validating a whole form
pub type FieldResults = BTreeMap<String, ValidationResult>;

/// The failing subset of a form validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, FieldError>);

impl ValidationErrors {
    pub fn from_results(results: &FieldResults) -> Self {
        Self(
            results
                .iter()
                .filter_map(|(name, result)| {
                    result.as_ref().err().map(|e| (name.clone(), e.clone()))
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no invalid fields");
        }
        let names: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Remove every whitespace character from a phone number
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(&strip_whitespace(value))
}

/// Apply the rule for the field's kind to its current value
///
/// Emptiness is checked first for every kind: an empty field fails with
/// `Required` only when it is marked required, so an optional email or
/// phone field may be left blank.
pub fn validate_field(field: &FormField) -> ValidationResult {
    if field.is_empty() {
        return if field.required {
            Err(FieldError::Required(field.required_message.clone()))
        } else {
            Ok(())
        };
    }

    let raw = field.raw_value();
    let value = raw.trim();
    match field.kind {
        FieldKind::Email if !is_valid_email(value) => {
            Err(FieldError::Format(format_message(field, EMAIL_FORMAT_MESSAGE)))
        }
        FieldKind::Phone if !is_valid_phone(value) => {
            Err(FieldError::Format(format_message(field, PHONE_FORMAT_MESSAGE)))
        }
        FieldKind::Password if value.chars().count() < MIN_PASSWORD_LEN => {
            Err(FieldError::TooShort {
                min: MIN_PASSWORD_LEN,
            })
        }
        _ => Ok(()),
    }
}

/// Validate every field; the form is valid only if every entry is `Ok`
pub fn validate_all(fields: &[FormField]) -> FieldResults {
    fields
        .iter()
        .map(|field| (field.name.clone(), validate_field(field)))
        .collect()
}

pub fn all_valid(results: &FieldResults) -> bool {
    results.values().all(Result::is_ok)
}

fn format_message(field: &FormField, fallback: &str) -> String {
    if field.format_message.is_empty() {
        fallback.to_string()
    } else {
        field.format_message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(kind: FieldKind, value: &str) -> FormField {
        let mut field = FormField::new("f", "F", kind).required();
        for c in value.chars() {
            field.push_char(c);
        }
        field
    }

    fn kind_of(kind: FieldKind, value: &str) -> Option<ErrorKind> {
        validate_field(&field_with(kind, value)).err().map(|e| e.kind())
    }

    mod email {
        use super::*;

        #[test]
        fn test_empty_is_required() {
            assert_eq!(kind_of(FieldKind::Email, ""), Some(ErrorKind::Required));
            assert_eq!(kind_of(FieldKind::Email, "   "), Some(ErrorKind::Required));
        }

        #[test]
        fn test_double_at_is_format_error() {
            assert_eq!(kind_of(FieldKind::Email, "user@@x"), Some(ErrorKind::Format));
        }

        #[test]
        fn test_missing_at_or_domain_suffix_is_format_error() {
            for value in [
                "user",
                "user.example.com",
                "user@example",
                "user@",
                "@example.com",
                "us er@example.com",
                "user@exa mple.com",
                "user@example.",
            ] {
                assert_eq!(
                    kind_of(FieldKind::Email, value),
                    Some(ErrorKind::Format),
                    "{value}"
                );
            }
        }

        #[test]
        fn test_conventional_address_is_valid() {
            assert_eq!(kind_of(FieldKind::Email, "marie@ecole.fr"), None);
            assert_eq!(kind_of(FieldKind::Email, "a.b@mail.co.uk"), None);
        }

        #[test]
        fn test_surrounding_whitespace_is_trimmed() {
            assert_eq!(kind_of(FieldKind::Email, "  marie@ecole.fr "), None);
        }

        #[test]
        fn test_custom_format_message() {
            let field = field_with(FieldKind::Email, "nope").with_format_message("Bad email");
            assert_eq!(
                validate_field(&field),
                Err(FieldError::Format("Bad email".into()))
            );
        }
    }

    mod password {
        use super::*;

        #[test]
        fn test_short_lengths() {
            assert_eq!(kind_of(FieldKind::Password, ""), Some(ErrorKind::Required));
            for len in 1..=5 {
                let value = "x".repeat(len);
                assert_eq!(
                    kind_of(FieldKind::Password, &value),
                    Some(ErrorKind::TooShort),
                    "length {len}"
                );
            }
        }

        #[test]
        fn test_six_or_more_is_valid() {
            for len in 6..=12 {
                assert_eq!(kind_of(FieldKind::Password, &"x".repeat(len)), None);
            }
        }

        #[test]
        fn test_abc_is_too_short_with_message() {
            let result = validate_field(&field_with(FieldKind::Password, "abc"));
            assert_eq!(result, Err(FieldError::TooShort { min: 6 }));
            assert_eq!(
                result.unwrap_err().message(),
                "Password must be at least 6 characters"
            );
        }

        #[test]
        fn test_length_counts_characters_not_bytes() {
            assert_eq!(kind_of(FieldKind::Password, "éééééé"), None);
        }
    }

    mod phone {
        use super::*;

        #[test]
        fn test_international_with_spaces_is_valid() {
            assert_eq!(kind_of(FieldKind::Phone, "+1 555 123 4567"), None);
        }

        #[test]
        fn test_invalid_shapes() {
            for value in [
                "0123456",
                "+0123",
                "12-34",
                "abc",
                "++1234",
                "12345678901234567",
                "1\u{0662}\u{0663}\u{0664}\u{0665}",
                "+4\u{FF11}\u{FF12}",
            ] {
                assert_eq!(
                    kind_of(FieldKind::Phone, value),
                    Some(ErrorKind::Format),
                    "{value}"
                );
            }
        }

        #[test]
        fn test_sixteen_digits_is_the_limit() {
            assert_eq!(kind_of(FieldKind::Phone, "1234567890123456"), None);
        }

        #[test]
        fn test_stripping_is_idempotent() {
            for value in ["+1 555 123 4567", " 0 1 ", "+33\t6 12 34 56 78", "12 ab"] {
                let once = strip_whitespace(value);
                let twice = strip_whitespace(&once);
                assert_eq!(once, twice);
                assert_eq!(is_valid_phone(&once), is_valid_phone(&twice));
                assert_eq!(is_valid_phone(value), is_valid_phone(&once));
            }
        }
    }

    mod generic {
        use super::*;

        #[test]
        fn test_blank_required_text() {
            let field = FormField::new("firstName", "First name", FieldKind::Text).required();
            assert_eq!(
                validate_field(&field),
                Err(FieldError::Required(
                    crate::state::forms::field::DEFAULT_REQUIRED_MESSAGE.into()
                ))
            );
        }

        #[test]
        fn test_unchecked_required_checkbox() {
            let mut field = FormField::new("terms", "Terms", FieldKind::Checkbox)
                .required()
                .with_required_message("You must agree to the terms and conditions");
            assert_eq!(
                validate_field(&field).unwrap_err().message(),
                "You must agree to the terms and conditions"
            );
            field.toggle();
            assert!(validate_field(&field).is_ok());
        }

        #[test]
        fn test_optional_empty_field_is_valid() {
            let field = FormField::new("message", "Message", FieldKind::Text);
            assert!(validate_field(&field).is_ok());
            let email = FormField::new("email", "Email", FieldKind::Email);
            assert!(validate_field(&email).is_ok());
            let phone = FormField::new("phone", "Phone", FieldKind::Phone);
            assert!(validate_field(&phone).is_ok());
        }

        #[test]
        fn test_unselected_required_select() {
            let field = FormField::new("age", "Age", FieldKind::Select).required();
            assert_eq!(
                validate_field(&field).unwrap_err().kind(),
                ErrorKind::Required
            );
        }
    }

    #[test]
    fn test_validate_all_reports_each_field() {
        let fields = vec![
            field_with(FieldKind::Email, "user@@x"),
            {
                let mut f = field_with(FieldKind::Password, "longenough");
                f.name = "password".into();
                f
            },
        ];
        let results = validate_all(&fields);
        assert_eq!(results.len(), 2);
        assert!(!all_valid(&results));
        let errors = ValidationErrors::from_results(&results);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["f"]);
        assert_eq!(errors.to_string(), "invalid fields: f");
        assert_eq!(ValidationErrors::default().to_string(), "no invalid fields");
    }
}
