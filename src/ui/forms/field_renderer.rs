//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field: bordered input plus the error line below it
pub const FIELD_HEIGHT: u16 = 4;

fn border_style(is_active: bool, has_error: bool) -> Style {
    if has_error {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw a form field with its inline error message underneath
///
/// `is_valid` marks a field whose last validation passed with a check mark.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    error: Option<&str>,
    is_valid: bool,
    is_active: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if is_active { "▌" } else { "" };

    let value_spans = match field.kind {
        FieldKind::Checkbox => {
            let mark_style = if field.is_checked() {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                style
            };
            vec![
                Span::styled(field.display_value(), mark_style),
                Span::styled(format!(" {}", field.label), style),
            ]
        }
        FieldKind::Select => {
            let display = field.display_value();
            if field.options.is_empty() {
                vec![Span::styled(
                    "(no options yet)",
                    Style::default().fg(Color::DarkGray),
                )]
            } else if is_active {
                vec![
                    Span::styled("◂ ", Style::default().fg(Color::Cyan)),
                    Span::styled(
                        if display.is_empty() { "Select...".to_string() } else { display },
                        style,
                    ),
                    Span::styled(" ▸", Style::default().fg(Color::Cyan)),
                ]
            } else if display.is_empty() {
                vec![Span::styled("Select...", Style::default().fg(Color::DarkGray))]
            } else {
                vec![Span::styled(display, style)]
            }
        }
        _ => vec![
            Span::styled(field.display_value(), style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ],
    };

    let required = if field.required && field.kind != FieldKind::Checkbox {
        " *"
    } else {
        ""
    };
    let check = if is_valid && error.is_none() { " ✓" } else { "" };
    let title = if field.kind == FieldKind::Checkbox {
        String::new()
    } else {
        format!(" {}{required}{check} ", field.label)
    };

    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, error.is_some()));

    if let Some(counter) = field.char_counter() {
        let color = if field.near_char_limit() {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        block = block.title_bottom(
            Line::from(Span::styled(format!(" {counter} "), Style::default().fg(color)))
                .right_aligned(),
        );
    }
    if field.kind == FieldKind::Password && is_active {
        let hint = if field.masked { " ^T:show " } else { " ^T:hide " };
        block = block.title_bottom(
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))).right_aligned(),
        );
    }

    frame.render_widget(Paragraph::new(Line::from(value_spans)).block(block), chunks[0]);

    if let Some(message) = error {
        draw_error_line(frame, chunks[1], message);
    }
}

/// Draw a standalone checkbox row that is not part of the validated fields
pub fn draw_checkbox_row(frame: &mut Frame, area: Rect, label: &str, checked: bool, is_active: bool) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_active, false));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("{mark} {label}"), style))).block(block),
        area,
    );
}

fn draw_error_line(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![
        Span::styled(" ✗ ", Style::default().fg(Color::Red)),
        Span::styled(message, Style::default().fg(Color::Red)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
