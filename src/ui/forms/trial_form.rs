//! Free trial booking form rendering
//!
//! Fields are laid out in two columns so the whole form fits a standard
//! terminal; the submit button spans the bottom.

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::ui::components::{render_submit_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the trial booking form
pub fn draw_trial(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.trial;
    let block = Block::default()
        .title(format!(" {} ", form.kind().title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = form.fields();
    let rows = fields.len().div_ceil(2);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT * rows as u16),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .spacing(1)
        .split(outer[0]);
    let row_constraints = vec![Constraint::Length(FIELD_HEIGHT); rows];
    let left = Layout::vertical(row_constraints.clone()).split(columns[0]);
    let right = Layout::vertical(row_constraints).split(columns[1]);

    for (idx, field) in fields.iter().enumerate() {
        let cell = if idx % 2 == 0 {
            left[idx / 2]
        } else {
            right[idx / 2]
        };
        draw_field(
            frame,
            cell,
            field,
            form.renderer().message(&field.name),
            form.form_state().is_valid(&field.name),
            app.state.trial_focus == idx,
        );
    }

    let [button_area] = Layout::horizontal([Constraint::Percentage(50)])
        .flex(ratatui::layout::Flex::Center)
        .areas(outer[1]);
    render_submit_button(
        frame,
        button_area,
        form.kind().submit_label(),
        form.kind().busy_label(),
        form.submission_state().is_submitting(),
    );
}
