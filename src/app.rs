//! Application state and core logic

use crate::config::{load_remember_me, save_remember_me, AppConfig, PreferenceStore};
use crate::controller::{
    InlineErrors, Notification, Notifier, SimulatedBackend, StatusNotifier, SubmissionBackend,
    SubmissionOutcome, SubmitError, TuiFormController,
};
use crate::state::validation::is_valid_email;
use crate::state::{
    course_options, next_index, prev_index, AppState, FieldKind, FieldValue, FormField, FormKind,
    View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

/// Login row holding the remember-me checkbox, after the form fields
const LOGIN_REMEMBER_ROW: usize = 2;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Login form controller
    pub login: TuiFormController,
    /// Trial booking form controller
    pub trial: TuiFormController,
    /// Persisted user preferences
    preferences: Box<dyn PreferenceStore>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App from configuration
    pub fn new(config: &AppConfig, preferences: Box<dyn PreferenceStore>) -> Self {
        let backend: Arc<dyn SubmissionBackend> =
            Arc::new(SimulatedBackend::new(config.submit_delay()));
        let start_view = View::from_config(config.start_view.as_deref());
        Self::with_backend(backend, preferences, start_view)
    }

    /// Create a new App with an explicit submission backend
    pub fn with_backend(
        backend: Arc<dyn SubmissionBackend>,
        preferences: Box<dyn PreferenceStore>,
        start_view: View,
    ) -> Self {
        let remember_me = load_remember_me(preferences.as_ref());
        let controller = |kind: FormKind| {
            TuiFormController::new(
                kind,
                kind.fields(),
                InlineErrors::default(),
                StatusNotifier::default(),
                Arc::clone(&backend),
            )
        };

        Self {
            state: AppState::new(start_view, remember_me),
            login: controller(FormKind::Login),
            trial: controller(FormKind::Trial),
            preferences,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Controller of the form on screen, if any
    pub fn active_form(&self) -> Option<&TuiFormController> {
        match self.state.current_view {
            View::Login => Some(&self.login),
            View::Trial => Some(&self.trial),
            View::Dashboard => None,
        }
    }

    fn active_form_mut(&mut self) -> Option<&mut TuiFormController> {
        match self.state.current_view {
            View::Login => Some(&mut self.login),
            View::Trial => Some(&mut self.trial),
            View::Dashboard => None,
        }
    }

    /// Number of focusable rows in the current form
    pub fn focus_count(&self) -> usize {
        match self.state.current_view {
            View::Login => self.login.fields().len() + 1,
            View::Trial => self.trial.fields().len(),
            View::Dashboard => 0,
        }
    }

    pub fn focus_index(&self) -> usize {
        match self.state.current_view {
            View::Login => self.state.login_focus,
            View::Trial => self.state.trial_focus,
            View::Dashboard => 0,
        }
    }

    fn set_focus_index(&mut self, index: usize) {
        match self.state.current_view {
            View::Login => self.state.login_focus = index,
            View::Trial => self.state.trial_focus = index,
            View::Dashboard => {}
        }
    }

    /// Name of the focused form field (`None` on the remember-me row)
    pub fn focused_field(&self) -> Option<String> {
        let index = self.focus_index();
        self.active_form()
            .and_then(|form| form.fields().get(index))
            .map(|field| field.name.clone())
    }

    /// The notification waiting for dismissal, if any
    pub fn current_notification(&self) -> Option<&Notification> {
        self.login
            .notifier()
            .current()
            .or_else(|| self.trial.notifier().current())
    }

    fn dismiss_notification(&mut self) {
        if self.login.notifier_mut().dismiss().is_none() {
            self.trial.notifier_mut().dismiss();
        }
    }

    /// Apply finished submissions
    pub fn tick(&mut self) {
        if let Some(outcome) = self.login.poll_completion() {
            if let SubmissionOutcome::Succeeded(receipt) = outcome {
                tracing::info!(
                    submission = %receipt.submission_id,
                    accepted_at = %receipt.accepted_at,
                    "signed in"
                );
                self.state.signed_in_as = self.login.value("email");
                self.state.current_view = View::Dashboard;
            }
            self.state.status_message = None;
        }
        if self.trial.poll_completion().is_some() {
            self.state.status_message = None;
        }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.current_notification().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_notification();
            }
            return Ok(());
        }

        if key.code == KeyCode::F(2) {
            self.switch_view(self.state.current_view.toggle_form());
            return Ok(());
        }

        match self.state.current_view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Login | View::Trial => self.handle_form_key(key),
        }
    }

    fn switch_view(&mut self, view: View) {
        self.blur_focused();
        self.state.current_view = view;
        self.state.status_message = None;
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('l') => {
                self.state.signed_in_as = None;
                self.login
                    .set_value("password", FieldValue::Text(String::new()));
                self.state.current_view = View::Login;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let is_login = self.state.current_view == View::Login;

        match key.code {
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Down => self.move_focus(true),
            KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => self.submit_active(),
            KeyCode::Char('s') if ctrl => self.submit_active(),
            KeyCode::Esc => self.reset_active(),
            KeyCode::Char('t') if ctrl && is_login => {
                self.login.toggle_masked("password");
            }
            KeyCode::Char('f') if ctrl && is_login => self.forgot_password(),
            KeyCode::Char(' ') if is_login && self.state.login_focus == LOGIN_REMEMBER_ROW => {
                self.toggle_remember_me();
            }
            KeyCode::Left => self.edit_focused(|field| field.cycle_option(false)),
            KeyCode::Right => self.edit_focused(|field| field.cycle_option(true)),
            KeyCode::Char(c) if !ctrl => self.input_char(c),
            KeyCode::Backspace => self.edit_focused(|field| field.pop_char()),
            _ => {}
        }
        Ok(())
    }

    fn move_focus(&mut self, forward: bool) {
        self.blur_focused();
        let count = self.focus_count();
        let current = self.focus_index();
        let next = if forward {
            next_index(current, count)
        } else {
            prev_index(current, count)
        };
        self.set_focus_index(next);
    }

    fn blur_focused(&mut self) {
        if let Some(name) = self.focused_field() {
            if let Some(form) = self.active_form_mut() {
                form.blur(&name);
            }
        }
    }

    fn input_char(&mut self, c: char) {
        let Some(kind) = self.focused_kind() else {
            return;
        };
        match kind {
            FieldKind::Checkbox if c == ' ' => self.edit_focused(|field| field.toggle()),
            FieldKind::Select if c == ' ' => self.edit_focused(|field| field.cycle_option(true)),
            FieldKind::Checkbox | FieldKind::Select => {}
            _ => self.edit_focused(|field| {
                if field.max_chars.is_none_or(|max| field.raw_value().chars().count() < max) {
                    field.push_char(c);
                }
            }),
        }
    }

    fn focused_kind(&self) -> Option<FieldKind> {
        let name = self.focused_field()?;
        self.active_form()?.field(&name).map(|f| f.kind)
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut FormField)) {
        let Some(name) = self.focused_field() else {
            return;
        };
        if let Some(form) = self.active_form_mut() {
            form.update_field(&name, edit);
        }
        if self.state.current_view == View::Trial && (name == "age" || name == "level") {
            self.sync_course_options();
        }
    }

    /// Refresh the course choices after the age group or level changed
    fn sync_course_options(&mut self) {
        let age = self.trial.value("age").unwrap_or_default();
        let level = self.trial.value("level").unwrap_or_default();
        self.trial.set_options("course", course_options(&age, &level));
    }

    fn submit_active(&mut self) {
        let Some(form) = self.active_form_mut() else {
            return;
        };
        let status = match form.start_submit() {
            Ok(_) => form.kind().busy_label().to_string(),
            Err(SubmitError::Rejected(errors)) => {
                // Jump to the first invalid field in form order
                let first_invalid = form
                    .fields()
                    .iter()
                    .position(|f| errors.get(&f.name).is_some());
                if let Some(index) = first_invalid {
                    self.set_focus_index(index);
                }
                format!("Please fix {} highlighted field(s)", errors.len())
            }
            Err(SubmitError::AlreadyInProgress) => "Submission already in progress".to_string(),
        };
        self.state.set_status(status);
    }

    fn reset_active(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.reset();
        }
        if self.state.current_view == View::Trial {
            self.sync_course_options();
        }
        self.set_focus_index(0);
        self.state.status_message = None;
    }

    fn toggle_remember_me(&mut self) {
        self.state.remember_me = !self.state.remember_me;
        if let Err(e) = save_remember_me(self.preferences.as_mut(), self.state.remember_me) {
            tracing::warn!("Failed to save remember-me preference: {e}");
            self.state.set_status("Could not save preference");
        }
    }

    fn forgot_password(&mut self) {
        let email = self.login.value("email").unwrap_or_default();
        let notification = if email.is_empty() {
            Notification::info(
                "Reset password",
                "Please enter your email address to reset your password.",
            )
        } else if is_valid_email(&email) {
            Notification::success(
                "Reset password",
                "Password reset link has been sent to your email address.",
            )
        } else {
            Notification::error("Reset password", "Please enter a valid email address.")
        };
        self.login.notifier_mut().notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryPreferenceStore, REMEMBER_ME_KEY};
    use crate::controller::NotificationLevel;
    use crate::state::SubmissionState;
    use std::time::Duration;

    fn app(view: View) -> App {
        App::with_backend(
            Arc::new(SimulatedBackend::new(Duration::from_millis(2000))),
            Box::new(MemoryPreferenceStore::default()),
            view,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            .unwrap();
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Move focus to a trial field without blurring through the others
    fn focus_trial(app: &mut App, name: &str) {
        let index = app
            .trial
            .fields()
            .iter()
            .position(|f| f.name == name)
            .unwrap();
        app.state.trial_focus = index;
    }

    mod login {
        use super::*;

        #[test]
        fn test_typing_fills_focused_field() {
            let mut app = app(View::Login);
            type_str(&mut app, "marie@ecole.fr");
            assert_eq!(app.login.value("email").as_deref(), Some("marie@ecole.fr"));
        }

        #[test]
        fn test_tab_blurs_and_shows_error() {
            let mut app = app(View::Login);
            type_str(&mut app, "marie");
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.focused_field().as_deref(), Some("password"));
            assert_eq!(
                app.login.renderer().message("email"),
                Some("Please enter a valid email address")
            );
        }

        #[test]
        fn test_tab_through_empty_fields_is_silent() {
            let mut app = app(View::Login);
            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Tab);
            assert!(app.login.renderer().is_empty());
            assert_eq!(app.focused_field(), None);
        }

        #[tokio::test]
        async fn test_enter_on_empty_form_shows_both_errors() {
            let mut app = app(View::Login);
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.login.renderer().message("email"), Some("Email is required"));
            assert_eq!(
                app.login.renderer().message("password"),
                Some("Password is required")
            );
            assert_eq!(app.login.submission_state(), SubmissionState::Idle);
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Please fix 2 highlighted field(s)")
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_successful_login_opens_dashboard() {
            let mut app = app(View::Login);
            type_str(&mut app, "marie@ecole.fr");
            press(&mut app, KeyCode::Tab);
            type_str(&mut app, "bonjour123");
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.login.submission_state(), SubmissionState::Submitting);
            assert_eq!(app.state.status_message.as_deref(), Some("Signing In..."));

            press(&mut app, KeyCode::Enter);
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("Submission already in progress")
            );

            tokio::time::sleep(Duration::from_millis(2500)).await;
            app.tick();

            assert_eq!(app.state.current_view, View::Dashboard);
            assert_eq!(app.state.signed_in_as.as_deref(), Some("marie@ecole.fr"));
            assert_eq!(
                app.current_notification().map(|n| n.level),
                Some(NotificationLevel::Success)
            );
            press(&mut app, KeyCode::Enter);
            assert!(app.current_notification().is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn test_escape_cancels_submission() {
            let mut app = app(View::Login);
            type_str(&mut app, "marie@ecole.fr");
            press(&mut app, KeyCode::Tab);
            type_str(&mut app, "bonjour123");
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Esc);

            tokio::time::sleep(Duration::from_millis(2500)).await;
            app.tick();

            assert_eq!(app.state.current_view, View::Login);
            assert_eq!(app.login.submission_state(), SubmissionState::Idle);
            assert!(app.current_notification().is_none());
            assert_eq!(app.login.value("email").as_deref(), Some(""));
            assert_eq!(app.state.login_focus, 0);
        }

        #[test]
        fn test_remember_me_is_persisted() {
            let mut app = app(View::Login);
            app.state.login_focus = LOGIN_REMEMBER_ROW;
            press(&mut app, KeyCode::Char(' '));
            assert!(app.state.remember_me);
            assert_eq!(app.preferences.get(REMEMBER_ME_KEY).as_deref(), Some("true"));
            press(&mut app, KeyCode::Char(' '));
            assert!(!app.state.remember_me);
            assert_eq!(app.preferences.get(REMEMBER_ME_KEY), None);
        }

        #[test]
        fn test_remember_me_is_loaded_at_startup() {
            let mut store = MemoryPreferenceStore::default();
            store.set(REMEMBER_ME_KEY, "true").unwrap();
            let app = App::with_backend(
                Arc::new(SimulatedBackend::default()),
                Box::new(store),
                View::Login,
            );
            assert!(app.state.remember_me);
        }

        #[test]
        fn test_toggle_password_visibility() {
            let mut app = app(View::Login);
            ctrl(&mut app, 't');
            assert!(!app.login.field("password").unwrap().masked);
        }

        #[test]
        fn test_forgot_password_checks_email() {
            let mut app = app(View::Login);
            type_str(&mut app, "not-an-email");
            ctrl(&mut app, 'f');
            assert_eq!(
                app.current_notification().map(|n| n.message.as_str()),
                Some("Please enter a valid email address.")
            );
            press(&mut app, KeyCode::Esc);

            app.login
                .set_value("email", FieldValue::Text("a@b.co".into()));
            ctrl(&mut app, 'f');
            assert_eq!(
                app.current_notification().map(|n| n.level),
                Some(NotificationLevel::Success)
            );
        }

        #[test]
        fn test_notification_swallows_other_keys() {
            let mut app = app(View::Login);
            ctrl(&mut app, 'f');
            type_str(&mut app, "abc");
            assert_eq!(app.login.value("email").as_deref(), Some(""));
        }
    }

    mod trial {
        use super::*;

        #[test]
        fn test_age_and_level_drive_course_options() {
            let mut app = app(View::Trial);
            focus_trial(&mut app, "age");
            press(&mut app, KeyCode::Right);
            assert_eq!(app.trial.value("age").as_deref(), Some("3-5"));
            assert!(app.trial.field("course").unwrap().options.is_empty());

            focus_trial(&mut app, "level");
            press(&mut app, KeyCode::Right);
            assert_eq!(app.trial.value("level").as_deref(), Some("beginner"));
            let course = app.trial.field("course").unwrap();
            assert_eq!(course.options.len(), 1);
            assert_eq!(course.options[0].value, "kids-basic");
        }

        #[test]
        fn test_changing_level_resets_course() {
            let mut app = app(View::Trial);
            focus_trial(&mut app, "age");
            press(&mut app, KeyCode::Left);
            focus_trial(&mut app, "level");
            press(&mut app, KeyCode::Right);
            focus_trial(&mut app, "course");
            press(&mut app, KeyCode::Right);
            assert_eq!(app.trial.value("course").as_deref(), Some("adults-beginner"));

            focus_trial(&mut app, "level");
            press(&mut app, KeyCode::Right);
            assert_eq!(app.trial.value("course").as_deref(), Some(""));
        }

        #[tokio::test]
        async fn test_rejected_submit_focuses_first_invalid_field() {
            let mut app = app(View::Trial);
            type_str(&mut app, "Marie");
            focus_trial(&mut app, "terms");
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.focused_field().as_deref(), Some("lastName"));
            assert_eq!(app.trial.renderer().message("firstName"), None);
        }

        #[test]
        fn test_space_toggles_terms() {
            let mut app = app(View::Trial);
            focus_trial(&mut app, "terms");
            press(&mut app, KeyCode::Char(' '));
            assert!(app.trial.field("terms").unwrap().is_checked());
        }

        #[test]
        fn test_message_stops_at_limit() {
            let mut app = app(View::Trial);
            focus_trial(&mut app, "message");
            type_str(&mut app, &"a".repeat(510));
            assert_eq!(app.trial.value("message").map(|m| m.len()), Some(500));
        }
    }

    #[test]
    fn test_f2_switches_forms() {
        let mut app = app(View::Login);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.state.current_view, View::Trial);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.state.current_view, View::Login);
    }

    #[test]
    fn test_dashboard_logout_and_quit() {
        let mut app = app(View::Login);
        app.state.current_view = View::Dashboard;
        app.state.signed_in_as = Some("marie@ecole.fr".into());
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state.current_view, View::Login);
        assert!(app.state.signed_in_as.is_none());

        app.state.current_view = View::Dashboard;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
