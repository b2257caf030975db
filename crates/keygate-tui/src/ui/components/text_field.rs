//! Labeled single-line input with icon badge and inline error

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::Theme;

/// Character drawn for each hidden PIN digit
pub const MASK_CHAR: char = '●';

/// Rows a field occupies: label, bordered input, error line
pub const FIELD_HEIGHT: u16 = 5;

/// Input field description for one render pass
pub struct TextField<'a> {
    pub label: &'a str,
    pub icon: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub masked: bool,
    pub focused: bool,
    pub error: Option<String>,
    /// Right-aligned hint inside the box (e.g. visibility toggle)
    pub trailing: Option<&'a str>,
}

/// Text shown inside the box for a value
pub fn display_text(value: &str, masked: bool) -> String {
    if masked {
        MASK_CHAR.to_string().repeat(value.chars().count())
    } else {
        value.to_string()
    }
}

impl TextField<'_> {
    /// Draw into an area at least [`FIELD_HEIGHT`] rows tall
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Label
                Constraint::Length(3), // Input
                Constraint::Length(1), // Error
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.label)).style(theme.label()),
            chunks[0],
        );

        let border_style = if self.error.is_some() {
            theme.border_error()
        } else if self.focused {
            theme.border_focused()
        } else {
            theme.border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(theme.input(self.focused));
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let icon = format!(" {} ", self.icon);
        let icon_width = icon.chars().count() as u16;
        let text = display_text(self.value, self.masked);

        let mut spans = vec![Span::styled(icon, theme.icon()), Span::raw(" ")];
        if self.value.is_empty() {
            spans.push(Span::styled(self.placeholder, theme.pin_placeholder()));
        } else {
            spans.push(Span::styled(text.clone(), theme.input(self.focused)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);

        if let Some(trailing) = self.trailing {
            frame.render_widget(
                Paragraph::new(trailing)
                    .style(theme.text_muted())
                    .alignment(Alignment::Right),
                inner,
            );
        }

        if self.focused {
            let offset = icon_width + 1 + text.chars().count() as u16;
            let x = inner.x + offset.min(inner.width.saturating_sub(1));
            frame.set_cursor_position((x, inner.y));
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(format!(" {}", error)).style(theme.danger()),
                chunks[2],
            );
        }
    }
}
