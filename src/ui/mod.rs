//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use components::render_notification_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (header_area, main_area) = layout::create_layout(area);
    layout::draw_header(frame, header_area, app);

    match &app.state.current_view {
        View::Login => forms::draw_login(frame, main_area, app),
        View::Trial => forms::draw_trial(frame, main_area, app),
        View::Dashboard => dashboard::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    if let Some(notification) = app.current_notification() {
        render_notification_dialog(frame, notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryPreferenceStore;
    use crate::controller::SimulatedBackend;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app(view: View) -> App {
        App::with_backend(
            Arc::new(SimulatedBackend::default()),
            Box::new(MemoryPreferenceStore::default()),
            view,
        )
    }

    #[tokio::test]
    async fn test_login_shows_inline_errors() {
        let mut app = app(View::Login);
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        let screen = render(&app);
        assert!(screen.contains("Email is required"));
        assert!(screen.contains("Password is required"));
    }

    #[test]
    fn test_trial_renders_all_fields() {
        let app = app(View::Trial);
        let screen = render(&app);
        assert!(screen.contains("First Name"));
        assert!(screen.contains("Preferred Schedule"));
        assert!(screen.contains("0/500 characters"));
    }

    #[test]
    fn test_notification_overlay() {
        let mut app = app(View::Login);
        app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL))
            .unwrap();
        let screen = render(&app);
        assert!(screen.contains("Reset password"));
    }
}
