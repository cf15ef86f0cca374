//! Terminal-side implementations of the rendering and notification surfaces

use super::traits::{FieldRenderer, Notification, Notifier};
use std::collections::BTreeMap;

/// Keeps at most one error message per field for the form renderer to draw
#[derive(Debug, Clone, Default)]
pub struct InlineErrors {
    messages: BTreeMap<String, String>,
}

impl InlineErrors {
    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FieldRenderer for InlineErrors {
    fn show_error(&mut self, field: &str, message: &str) {
        self.messages.insert(field.to_string(), message.to_string());
    }

    fn clear_error(&mut self, field: &str) {
        self.messages.remove(field);
    }
}

/// Holds the latest notification until the user dismisses it
#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    current: Option<Notification>,
}

impl StatusNotifier {
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take()
    }
}

impl Notifier for StatusNotifier {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification raised");
        self.current = Some(notification);
    }
}
