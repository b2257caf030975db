//! Signed-in landing screen

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, dialog_block};

/// Draw the home screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let dialog = centered_rect_fixed(48, 9, area);
    let block = dialog_block("Welcome", theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let Some(session) = &app.state.session else {
        frame.render_widget(
            Paragraph::new("Not signed in")
                .style(theme.text_muted())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let expiry_style = if session.is_warning_period() {
        theme.warning()
    } else {
        theme.text_muted()
    };

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("Signed in as ", theme.text_secondary()),
            Span::styled(session.username(), theme.text_highlight()),
        ]),
        Line::raw(""),
        Line::styled(
            format!("Session ends in {}", session.remaining_formatted()),
            expiry_style,
        ),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
