//! Per-form validation state and the submission state machine

use super::validation::{FieldError, FieldResults, ValidationResult};
use std::collections::BTreeMap;

/// Where a form is in its submit workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Submitting => "Submitting",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Last known validation status of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStatus {
    /// `None` until the field has been validated
    pub result: Option<ValidationResult>,
    /// Blurred with input, or part of a submit attempt
    pub touched: bool,
}

impl FieldStatus {
    pub fn error(&self) -> Option<&FieldError> {
        self.result.as_ref().and_then(|r| r.as_ref().err())
    }
}

/// Mapping from field name to its validation status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, FieldStatus>,
}

impl FormState {
    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.fields.get(field)
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|s| s.touched)
    }

    pub fn touch(&mut self, field: &str) {
        self.fields.entry(field.to_string()).or_default().touched = true;
    }

    pub fn record(&mut self, field: &str, result: ValidationResult) {
        self.fields.entry(field.to_string()).or_default().result = Some(result);
    }

    /// Record a full validation pass, marking every field touched
    pub fn record_all(&mut self, results: &FieldResults) {
        for (name, result) in results {
            let status = self.fields.entry(name.clone()).or_default();
            status.touched = true;
            status.result = Some(result.clone());
        }
    }

    /// True once the field has been validated and its last result passed
    pub fn is_valid(&self, field: &str) -> bool {
        self.status(field)
            .is_some_and(|s| s.result.is_some() && s.error().is_none())
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}
