//! Collaborator traits injected into the form controller, mockable in tests

use crate::state::FormKind;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identifies one submission attempt
pub type SubmissionId = Uuid;

/// Displays and clears the error message adjacent to a field
#[cfg_attr(test, mockall::automock)]
pub trait FieldRenderer {
    /// Show `message` next to `field`, replacing any previous message
    fn show_error(&mut self, field: &str, message: &str);

    /// Remove the message next to `field`, if any
    fn clear_error(&mut self, field: &str);
}

/// Severity of a transient user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A transient user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: &str, message: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn success(title: &str, message: &str) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn info(title: &str, message: &str) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }
}

/// Delivers notifications to the user
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Validated form data handed to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormPayload {
    pub submission_id: SubmissionId,
    pub form: FormKind,
    pub values: BTreeMap<String, String>,
}

/// Backend acknowledgement of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub accepted_at: DateTime<Utc>,
}

/// Sends validated form data somewhere
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    async fn submit(&self, payload: &FormPayload) -> Result<SubmissionReceipt>;
}
