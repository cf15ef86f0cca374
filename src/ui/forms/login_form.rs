//! Sign-in form rendering

use super::field_renderer::{draw_checkbox_row, draw_field, draw_help_text, FIELD_HEIGHT};
use crate::app::App;
use crate::ui::components::{render_submit_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

const FORM_WIDTH: u16 = 60;

/// Draw the login form centered in `area`
pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.login;
    let [form_area] = Layout::horizontal([Constraint::Length(FORM_WIDTH)])
        .flex(Flex::Center)
        .areas(area);

    let block = Block::default()
        .title(format!(" {} ", form.kind().title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut constraints: Vec<Constraint> = form
        .fields()
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.extend([
        Constraint::Length(3),             // Remember me
        Constraint::Length(1),             // Forgot password
        Constraint::Length(1),             // Spacer
        Constraint::Length(BUTTON_HEIGHT), // Submit
        Constraint::Min(0),
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (idx, field) in form.fields().iter().enumerate() {
        draw_field(
            frame,
            chunks[idx],
            field,
            form.renderer().message(&field.name),
            form.form_state().is_valid(&field.name),
            app.state.login_focus == idx,
        );
    }

    let row = form.fields().len();
    draw_checkbox_row(
        frame,
        chunks[row],
        "Remember me",
        app.state.remember_me,
        app.state.login_focus == row,
    );
    draw_help_text(frame, chunks[row + 1], " Forgot password? Press ^F");

    let submitting = form.submission_state().is_submitting();
    render_submit_button(
        frame,
        chunks[row + 3],
        form.kind().submit_label(),
        form.kind().busy_label(),
        submitting,
    );
}
