//! The concrete forms: login and trial class booking

use super::field::{FieldKind, FormField, SelectOption};
use super::validation::{EMAIL_FORMAT_MESSAGE, PHONE_FORMAT_MESSAGE};
use serde::Serialize;

/// Which form a controller drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Login,
    Trial,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Trial => "Book a Free Trial Class",
        }
    }

    /// Label of the submit button while a submission is in flight
    pub fn busy_label(&self) -> &'static str {
        match self {
            Self::Login => "Signing In...",
            Self::Trial => "Booking Trial...",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Trial => "Book Trial",
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        match self {
            Self::Login => login_fields(),
            Self::Trial => trial_fields(),
        }
    }

    pub fn success_title(&self) -> &'static str {
        match self {
            Self::Login => "Welcome back!",
            Self::Trial => "Trial Class Booked!",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Login => "You are now signed in.",
            Self::Trial => {
                "Thank you for booking your free trial class. We'll contact you within 24 hours to confirm your schedule."
            }
        }
    }

    /// Whether field values are cleared after a successful submission
    pub fn clears_values_on_success(&self) -> bool {
        matches!(self, Self::Trial)
    }
}

pub const MESSAGE_MAX_CHARS: usize = 500;

pub fn login_fields() -> Vec<FormField> {
    vec![
        FormField::new("email", "Email", FieldKind::Email)
            .required()
            .with_required_message("Email is required")
            .with_format_message(EMAIL_FORMAT_MESSAGE),
        FormField::new("password", "Password", FieldKind::Password)
            .required()
            .with_required_message("Password is required"),
    ]
}

pub fn trial_fields() -> Vec<FormField> {
    vec![
        FormField::new("firstName", "First Name", FieldKind::Text).required(),
        FormField::new("lastName", "Last Name", FieldKind::Text).required(),
        FormField::new("email", "Email", FieldKind::Email)
            .required()
            .with_format_message(EMAIL_FORMAT_MESSAGE),
        FormField::new("phone", "Phone", FieldKind::Phone)
            .required()
            .with_format_message(PHONE_FORMAT_MESSAGE),
        FormField::new("age", "Age Group", FieldKind::Select)
            .required()
            .with_options(age_options()),
        FormField::new("level", "French Level", FieldKind::Select)
            .required()
            .with_options(level_options()),
        FormField::new("course", "Course", FieldKind::Select).required(),
        FormField::new("schedule", "Preferred Schedule", FieldKind::Select)
            .required()
            .with_options(schedule_options()),
        FormField::new("message", "Message (optional)", FieldKind::Text)
            .with_max_chars(MESSAGE_MAX_CHARS),
        FormField::new("terms", "I agree to the terms and conditions", FieldKind::Checkbox)
            .required()
            .with_required_message("You must agree to the terms and conditions"),
    ]
}

fn age_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("3-5", "3-5 years"),
        SelectOption::new("6-8", "6-8 years"),
        SelectOption::new("9-12", "9-12 years"),
        SelectOption::new("13-17", "13-17 years"),
        SelectOption::new("18+", "18+ years"),
    ]
}

fn level_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("beginner", "Beginner"),
        SelectOption::new("elementary", "Elementary"),
        SelectOption::new("intermediate", "Intermediate"),
        SelectOption::new("advanced", "Advanced"),
    ]
}

fn schedule_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("weekday-morning", "Weekday morning"),
        SelectOption::new("weekday-afternoon", "Weekday afternoon"),
        SelectOption::new("weekday-evening", "Weekday evening"),
        SelectOption::new("weekend", "Weekend"),
    ]
}

/// Courses offered for an age group at a given level
pub fn course_options(age: &str, level: &str) -> Vec<SelectOption> {
    let courses: &[(&str, &str)] = match (age, level) {
        ("3-5", "beginner") => &[("kids-basic", "Kids Basic French (Ages 3-5)")],
        ("6-8", "beginner") => &[("kids-basic", "Kids Basic French (Ages 6-8)")],
        ("6-8", "elementary") => &[("kids-intermediate", "Kids Intermediate French (Ages 6-8)")],
        ("9-12", "beginner") => &[("kids-basic", "Kids Basic French (Ages 9-12)")],
        ("9-12", "elementary") => &[("kids-intermediate", "Kids Intermediate French (Ages 9-12)")],
        ("9-12", "intermediate") => &[("kids-advanced", "Kids Advanced French (Ages 9-12)")],
        ("13-17", "beginner") => &[("teens-beginner", "Teens Beginner French")],
        ("13-17", "elementary") => &[("teens-intermediate", "Teens Intermediate French")],
        ("13-17", "intermediate") => &[("teens-advanced", "Teens Advanced French")],
        ("18+", "beginner") => &[("adults-beginner", "Adults Beginner French")],
        ("18+", "elementary") => &[("adults-intermediate", "Adults Intermediate French")],
        ("18+", "intermediate") => &[("adults-business", "Adults Business French")],
        ("18+", "advanced") => &[("adults-advanced", "Adults Advanced French")],
        _ => &[],
    };
    courses
        .iter()
        .map(|(value, label)| SelectOption::new(value, label))
        .collect()
}
