//! Form submission controller and its collaborators

mod form_controller;
mod simulated;
mod surfaces;
mod traits;

pub use form_controller::{FormController, SubmissionOutcome, SubmitError};
pub use simulated::SimulatedBackend;
pub use surfaces::{InlineErrors, StatusNotifier};
pub use traits::{Notification, NotificationLevel, Notifier, SubmissionBackend};

/// Controller wired to the terminal surfaces
pub type TuiFormController = FormController<InlineErrors, StatusNotifier>;
