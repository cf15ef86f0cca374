//! Form field value objects

use serde::Serialize;

/// Semantic kind of a field, selects the validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Password,
    Checkbox,
    Select,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    Choice(Option<String>),
}

impl FieldValue {
    fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Checkbox => FieldValue::Checked(false),
            FieldKind::Select => FieldValue::Choice(None),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// One selectable entry of a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: FieldValue,
    /// Message shown when a required field is left empty
    pub required_message: String,
    /// Message shown when the value has the wrong shape
    pub format_message: String,
    /// Options offered by select fields
    pub options: Vec<SelectOption>,
    /// Password fields render as bullets while masked
    pub masked: bool,
    /// Soft character limit shown as a counter
    pub max_chars: Option<usize>,
}

pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";

impl FormField {
    /// Create a new field of the given kind with an empty value
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            value: FieldValue::empty_for(kind),
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            format_message: String::new(),
            options: Vec::new(),
            masked: kind == FieldKind::Password,
            max_chars: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_required_message(mut self, message: &str) -> Self {
        self.required_message = message.to_string();
        self
    }

    pub fn with_format_message(mut self, message: &str) -> Self {
        self.format_message = message.to_string();
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    /// Raw text of the field; checkboxes yield "true"/"" and selects their value
    pub fn raw_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checked(true) => "true".to_string(),
            FieldValue::Checked(false) => String::new(),
            FieldValue::Choice(choice) => choice.clone().unwrap_or_default(),
        }
    }

    /// Whether the field holds nothing once surrounding whitespace is ignored
    pub fn is_empty(&self) -> bool {
        match &self.value {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Checked(checked) => !checked,
            FieldValue::Choice(choice) => choice.as_deref().is_none_or(|c| c.trim().is_empty()),
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.value, FieldValue::Checked(true))
    }

    /// Push a character to a text-like field value
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.value {
            s.push(c);
        }
    }

    /// Remove the last character from a text-like field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Flip a checkbox
    pub fn toggle(&mut self) {
        if let FieldValue::Checked(checked) = &mut self.value {
            *checked = !*checked;
        }
    }

    /// Move a select field to the next (or previous) option, wrapping through "no selection"
    pub fn cycle_option(&mut self, forward: bool) {
        let FieldValue::Choice(choice) = &mut self.value else {
            return;
        };
        if self.options.is_empty() {
            *choice = None;
            return;
        }
        let current = choice
            .as_ref()
            .and_then(|c| self.options.iter().position(|o| &o.value == c));
        let len = self.options.len();
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
        *choice = next.map(|i| self.options[i].value.clone());
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        self.value = FieldValue::empty_for(self.kind);
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.masked => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Checked(true) => "[x]".to_string(),
            FieldValue::Checked(false) => "[ ]".to_string(),
            FieldValue::Choice(None) => String::new(),
            FieldValue::Choice(Some(value)) => self
                .options
                .iter()
                .find(|o| &o.value == value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| value.clone()),
        }
    }

    /// Character counter text, e.g. "12/500 characters"
    pub fn char_counter(&self) -> Option<String> {
        let max = self.max_chars?;
        let len = self.raw_value().chars().count();
        Some(format!("{len}/{max} characters"))
    }

    /// True once the counter passes 90% of the limit
    pub fn near_char_limit(&self) -> bool {
        self.max_chars
            .is_some_and(|max| self.raw_value().chars().count() * 10 > max * 9)
    }
}
