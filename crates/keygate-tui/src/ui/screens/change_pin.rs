//! Change PIN screen

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{App, ChangePinField};
use crate::ui::components::text_field::{TextField, FIELD_HEIGHT};
use crate::ui::layout::{centered_rect_fixed, dialog_block};

/// Draw the change PIN form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let form = &app.state.change_pin;

    let dialog = centered_rect_fixed(54, 26, area);
    let block = dialog_block("Change PIN", theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),            // Instructions
            Constraint::Length(FIELD_HEIGHT), // Username
            Constraint::Length(FIELD_HEIGHT), // Current PIN
            Constraint::Length(FIELD_HEIGHT), // New PIN
            Constraint::Length(1),            // Status
            Constraint::Length(3),            // Button
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Confirm your current PIN, then pick a new one")
            .style(theme.text_secondary())
            .alignment(Alignment::Center),
        chunks[0],
    );

    for (field, area) in ChangePinField::ALL.into_iter().zip(&chunks[1..4]) {
        TextField {
            label: field.label(),
            icon: if field.is_pin() { "#" } else { "@" },
            value: form.value(field),
            placeholder: if field.is_pin() { "5-digit PIN" } else { "Enter username" },
            masked: field.is_pin(),
            focused: form.focus == field,
            error: form.visible_error(field),
            trailing: None,
        }
        .render(frame, *area, theme);
    }

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .style(theme.danger())
                .alignment(Alignment::Center),
            chunks[4],
        );
    }

    let label = if form.pending { "Saving…" } else { "UPDATE PIN" };
    frame.render_widget(
        Paragraph::new(format!("\n{}", label))
            .style(theme.button())
            .alignment(Alignment::Center),
        centered_rect_fixed(20, 3, chunks[5]),
    );
}
