//! Validation and submission workflow for a single form instance
//!
//! The controller owns its fields, their [`FormState`] and the
//! [`SubmissionState`]. A valid submit spawns one backend call raced against a
//! cancellation token; its completion comes back over a channel and is applied
//! by [`FormController::poll_completion`] or
//! [`FormController::wait_for_completion`].

use super::traits::{
    FieldRenderer, FormPayload, Notification, Notifier, SubmissionBackend, SubmissionId,
    SubmissionReceipt,
};
use crate::state::validation::all_valid;
use crate::state::{
    validate_all, validate_field, FieldResults, FieldValue, FormField, FormKind, FormState,
    SelectOption, SubmissionState, ValidationErrors, ValidationResult,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Why a submit request did not start a submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("form has invalid fields ({0})")]
    Rejected(ValidationErrors),
    #[error("a submission is already in progress")]
    AlreadyInProgress,
}

/// Final result of one submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded(SubmissionReceipt),
    Failed(String),
    Cancelled,
    Rejected(ValidationErrors),
    AlreadyInProgress,
}

enum TaskResult {
    Accepted(SubmissionReceipt),
    Failed(String),
    Cancelled,
}

struct Completion {
    id: SubmissionId,
    result: TaskResult,
}

struct InFlight {
    id: SubmissionId,
    cancel: CancellationToken,
}

/// Drives validation, error display and submission for one form
pub struct FormController<R, N>
where
    R: FieldRenderer,
    N: Notifier,
{
    kind: FormKind,
    fields: Vec<FormField>,
    form_state: FormState,
    submission: SubmissionState,
    /// States visited by the latest submit attempt
    trace: Vec<SubmissionState>,
    renderer: R,
    notifier: N,
    backend: Arc<dyn SubmissionBackend>,
    in_flight: Option<InFlight>,
    completion_tx: UnboundedSender<Completion>,
    completion_rx: UnboundedReceiver<Completion>,
}

impl<R, N> FormController<R, N>
where
    R: FieldRenderer,
    N: Notifier,
{
    pub fn new(
        kind: FormKind,
        fields: Vec<FormField>,
        renderer: R,
        notifier: N,
        backend: Arc<dyn SubmissionBackend>,
    ) -> Self {
        let (completion_tx, completion_rx) = unbounded_channel();
        Self {
            kind,
            fields,
            form_state: FormState::default(),
            submission: SubmissionState::Idle,
            trace: Vec::new(),
            renderer,
            notifier,
            backend,
            in_flight: None,
            completion_tx,
            completion_rx,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Trimmed raw value of a field
    pub fn value(&self, name: &str) -> Option<String> {
        self.field(name).map(|f| f.raw_value().trim().to_string())
    }

    pub fn form_state(&self) -> &FormState {
        &self.form_state
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    /// States visited by the latest submit attempt
    #[allow(dead_code)]
    pub fn attempt_trace(&self) -> &[SubmissionState] {
        &self.trace
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Replace a field's value
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> bool {
        self.update_field(name, |field| field.value = value)
    }

    /// Edit a field's value in place, then revalidate it if it is touched
    pub fn update_field(&mut self, name: &str, edit: impl FnOnce(&mut FormField)) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.name == name) else {
            return false;
        };
        let before = field.value.clone();
        edit(field);
        if field.value != before && self.form_state.is_touched(name) {
            self.revalidate(name);
        }
        true
    }

    /// Replace the options of a select field; its selection is cleared
    pub fn set_options(&mut self, name: &str, options: Vec<SelectOption>) -> bool {
        self.update_field(name, |field| {
            field.options = options;
            field.clear();
        })
    }

    /// Flip between masked and plain display of a password field
    pub fn toggle_masked(&mut self, name: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.masked = !field.masked;
                true
            }
            None => false,
        }
    }

    /// Handle focus leaving a field
    ///
    /// An empty field that was never touched stays silent; anything else is
    /// marked touched and revalidated.
    pub fn blur(&mut self, name: &str) -> Option<ValidationResult> {
        let field = self.field(name)?;
        if field.is_empty() && !self.form_state.is_touched(name) {
            return None;
        }
        self.form_state.touch(name);
        Some(self.revalidate(name))
    }

    /// Validate every field, touching all of them and rendering each result
    pub fn validate_all(&mut self) -> FieldResults {
        let results = validate_all(&self.fields);
        self.form_state.record_all(&results);
        for (name, result) in &results {
            self.render(name, result);
        }
        results
    }

    /// Validate and submit, waiting for the backend to finish
    #[allow(dead_code)] // The event loop uses start_submit and poll_completion
    pub async fn submit(&mut self) -> SubmissionOutcome {
        match self.start_submit() {
            Err(SubmitError::Rejected(errors)) => SubmissionOutcome::Rejected(errors),
            Err(SubmitError::AlreadyInProgress) => SubmissionOutcome::AlreadyInProgress,
            Ok(_) => self
                .wait_for_completion()
                .await
                .unwrap_or(SubmissionOutcome::Cancelled),
        }
    }

    /// Validate and, if valid, start a submission without waiting for it
    pub fn start_submit(&mut self) -> Result<SubmissionId, SubmitError> {
        if self.submission.is_submitting() {
            tracing::warn!(form = ?self.kind, "submit ignored: already in progress");
            return Err(SubmitError::AlreadyInProgress);
        }

        self.trace.clear();
        self.trace.push(self.submission);

        let results = self.validate_all();
        if !all_valid(&results) {
            let errors = ValidationErrors::from_results(&results);
            tracing::info!(form = ?self.kind, %errors, "submit rejected");
            return Err(SubmitError::Rejected(errors));
        }

        let id = Uuid::new_v4();
        let payload = FormPayload {
            submission_id: id,
            form: self.kind,
            values: self.values(),
        };
        self.transition(SubmissionState::Submitting);

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            // Inner task so a panicking backend still yields a completion
            let call = tokio::spawn(async move { backend.submit(&payload).await });
            let abort = call.abort_handle();
            let result = tokio::select! {
                _ = task_cancel.cancelled() => {
                    abort.abort();
                    TaskResult::Cancelled
                }
                joined = call => match joined {
                    Ok(Ok(receipt)) => TaskResult::Accepted(receipt),
                    Ok(Err(e)) => TaskResult::Failed(e.to_string()),
                    Err(e) => TaskResult::Failed(format!("submission task failed: {e}")),
                },
            };
            let _ = tx.send(Completion { id, result });
        });

        tracing::info!(form = ?self.kind, submission = %id, "submission started");
        self.in_flight = Some(InFlight { id, cancel });
        Ok(id)
    }

    /// Apply a finished submission, if one is waiting
    pub fn poll_completion(&mut self) -> Option<SubmissionOutcome> {
        while let Ok(completion) = self.completion_rx.try_recv() {
            if let Some(outcome) = self.apply_completion(completion) {
                return Some(outcome);
            }
        }
        None
    }

    /// Wait for the in-flight submission to finish and apply it
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn wait_for_completion(&mut self) -> Option<SubmissionOutcome> {
        while self.in_flight.is_some() {
            let completion = self.completion_rx.recv().await?;
            if let Some(outcome) = self.apply_completion(completion) {
                return Some(outcome);
            }
        }
        None
    }

    /// Cancel any outstanding submission and clear values, errors and state
    pub fn reset(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.cancel.cancel();
            tracing::info!(form = ?self.kind, submission = %flight.id, "submission cancelled");
        }
        for field in &mut self.fields {
            field.clear();
        }
        self.clear_errors();
        if self.submission != SubmissionState::Idle {
            self.transition(SubmissionState::Idle);
        }
    }

    /// Trimmed values of every field, keyed by name
    pub fn values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.raw_value().trim().to_string()))
            .collect()
    }

    fn apply_completion(&mut self, completion: Completion) -> Option<SubmissionOutcome> {
        if self.in_flight.as_ref().map(|f| f.id) != Some(completion.id) {
            tracing::debug!(submission = %completion.id, "discarding stale completion");
            return None;
        }
        self.in_flight = None;

        let outcome = match completion.result {
            TaskResult::Accepted(receipt) => {
                self.transition(SubmissionState::Succeeded);
                self.clear_errors();
                if self.kind.clears_values_on_success() {
                    for field in &mut self.fields {
                        field.clear();
                    }
                }
                self.notifier.notify(Notification::success(
                    self.kind.success_title(),
                    self.kind.success_message(),
                ));
                SubmissionOutcome::Succeeded(receipt)
            }
            TaskResult::Failed(message) => {
                tracing::warn!(form = ?self.kind, error = %message, "submission failed");
                self.transition(SubmissionState::Failed);
                self.notifier
                    .notify(Notification::error("Submission failed", &message));
                SubmissionOutcome::Failed(message)
            }
            TaskResult::Cancelled => SubmissionOutcome::Cancelled,
        };
        self.transition(SubmissionState::Idle);
        Some(outcome)
    }

    fn revalidate(&mut self, name: &str) -> ValidationResult {
        let result = match self.field(name) {
            Some(field) => validate_field(field),
            None => Ok(()),
        };
        self.form_state.record(name, result.clone());
        self.render(name, &result);
        result
    }

    fn render(&mut self, name: &str, result: &ValidationResult) {
        match result {
            Ok(()) => self.renderer.clear_error(name),
            Err(error) => {
                tracing::debug!(field = name, kind = ?error.kind(), "field invalid");
                self.renderer.show_error(name, &error.message());
            }
        }
    }

    fn clear_errors(&mut self) {
        for field in &self.fields {
            self.renderer.clear_error(&field.name);
        }
        self.form_state.clear();
    }

    fn transition(&mut self, to: SubmissionState) {
        tracing::debug!(form = ?self.kind, from = ?self.submission, to = ?to, "submission state");
        self.submission = to;
        self.trace.push(to);
    }
}

impl<R, N> Drop for FormController<R, N>
where
    R: FieldRenderer,
    N: Notifier,
{
    fn drop(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.cancel.cancel();
        }
    }
}
