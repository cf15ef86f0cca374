//! Notification dialog shown after a submission or a password reset request

use super::base::{render_dialog, DialogConfig};
use crate::controller::{Notification, NotificationLevel};
use ratatui::{
    style::{Color, Style},
    text::Span,
    Frame,
};

fn level_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Info => Color::Cyan,
        NotificationLevel::Error => Color::Red,
    }
}

/// Render a notification as a centered overlay
pub fn render_notification_dialog(frame: &mut Frame, notification: &Notification) {
    let color = level_color(notification.level);
    let timestamp = notification.created_at.format("%H:%M:%S").to_string();

    render_dialog(
        frame,
        DialogConfig {
            title: &notification.title,
            title_color: color,
            border_color: color,
            message: &notification.message,
            hint: Some(vec![
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::styled(" dismiss  ", Style::default().fg(Color::DarkGray)),
                Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
            ]),
            ..Default::default()
        },
    );
}
