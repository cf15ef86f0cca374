//! Application state definitions

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Trial,
    Dashboard,
}

impl View {
    /// Parse the configured start view, falling back to the login form
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("trial") => Self::Trial,
            _ => Self::Login,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Trial => "Free Trial",
            Self::Dashboard => "Dashboard",
        }
    }

    /// The other form view, used by the view switch shortcut
    pub fn toggle_form(&self) -> Self {
        match self {
            Self::Login => Self::Trial,
            Self::Trial | Self::Dashboard => Self::Login,
        }
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_view: View,
    /// Focused row of the login form (fields, then the remember-me checkbox)
    pub login_focus: usize,
    /// Focused field of the trial form
    pub trial_focus: usize,
    /// "Remember me" checkbox, kept outside the form's own state
    pub remember_me: bool,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
    /// Email of the signed-in learner
    pub signed_in_as: Option<String>,
}

impl AppState {
    pub fn new(start_view: View, remember_me: bool) -> Self {
        Self {
            current_view: start_view,
            remember_me,
            ..Default::default()
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

/// Move a focus index forward with wrap-around
pub fn next_index(current: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (current + 1) % count
    }
}

/// Move a focus index backward with wrap-around
pub fn prev_index(current: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else if current == 0 {
        count - 1
    } else {
        current - 1
    }
}
