//! Form domain layer
//!
//! Field value objects, the pure validation rules, per-form validation
//! state and the two concrete forms.

pub mod catalog;
mod field;
mod form_state;
pub mod validation;

pub use catalog::{course_options, FormKind};
pub use field::{FieldKind, FieldValue, FormField, SelectOption};
pub use form_state::{FormState, SubmissionState};
pub use validation::{
    validate_all, validate_field, FieldResults, ValidationErrors, ValidationResult,
};
