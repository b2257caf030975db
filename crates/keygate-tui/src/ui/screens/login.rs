//! Login screen

use keygate_core::Field;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::components::text_field::{TextField, FIELD_HEIGHT};
use crate::ui::layout::{centered_rect_fixed, dialog_block};

/// Draw the login form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let form = app.login.form();

    let dialog = centered_rect_fixed(54, 22, area);
    let block = dialog_block("Sign In", theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),            // Banner
            Constraint::Length(FIELD_HEIGHT), // Username
            Constraint::Length(FIELD_HEIGHT), // PIN
            Constraint::Length(1),            // General error
            Constraint::Length(3),            // Button
            Constraint::Length(1),            // Change PIN link
            Constraint::Min(0),
        ])
        .split(inner);

    let banner = Paragraph::new(vec![
        Line::styled(" ◆ KEYGATE ", theme.banner()),
        Line::styled("Sign in with your username and PIN", theme.text_secondary()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let focus = app.state.login_focus;
    let error_text = |field| app.login.visible_error(field).map(ToString::to_string);

    TextField {
        label: Field::Username.label(),
        icon: "@",
        value: form.value(Field::Username),
        placeholder: "Enter username",
        masked: false,
        focused: focus == Field::Username,
        error: error_text(Field::Username),
        trailing: None,
    }
    .render(frame, chunks[1], theme);

    TextField {
        label: Field::Pin.label(),
        icon: "#",
        value: form.value(Field::Pin),
        placeholder: "5-digit PIN",
        masked: !form.pin_visible(),
        focused: focus == Field::Pin,
        error: error_text(Field::Pin),
        trailing: Some(if form.pin_visible() { "hide [F2] " } else { "show [F2] " }),
    }
    .render(frame, chunks[2], theme);

    if let Some(general) = form.general_error() {
        frame.render_widget(
            Paragraph::new(general.to_string())
                .style(theme.danger())
                .alignment(Alignment::Center),
            chunks[3],
        );
    }

    let label = if app.state.login_pending {
        "Signing in…"
    } else {
        "LOGIN"
    };
    let button_area = centered_rect_fixed(20, 3, chunks[4]);
    frame.render_widget(
        Paragraph::new(format!("\n{}", label))
            .style(theme.button())
            .alignment(Alignment::Center),
        button_area,
    );

    frame.render_widget(
        Paragraph::new("Change Your PIN [F3]")
            .style(theme.link())
            .alignment(Alignment::Center),
        chunks[5],
    );
}
