//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use keygate_core::ScreenId;
use ratatui::prelude::*;
use ratatui::widgets::Block;

use crate::app::App;
use layout::{render_footer, render_header, ScreenLayout};

/// Main render function - delegates to the active screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.text()), area);

    let layout = ScreenLayout::new(area);
    let breadcrumb = app.router.breadcrumb().join(" › ");
    render_header(frame, layout.header, &breadcrumb, &app.theme);

    let screen = app.router.current();
    match screen {
        ScreenId::Login => screens::login::draw(frame, layout.content, app),
        ScreenId::ChangePin => screens::change_pin::draw(frame, layout.content, app),
        ScreenId::Home => screens::home::draw(frame, layout.content, app),
    }

    render_footer(frame, layout.footer, footer_hints(screen), &app.theme);
    app.notifications.render(frame, area, &app.theme);
}

fn footer_hints(screen: ScreenId) -> &'static [(&'static str, &'static str)] {
    match screen {
        ScreenId::Login => &[
            ("Tab", "Next"),
            ("Enter", "Login"),
            ("F2", "Show PIN"),
            ("F3", "Change PIN"),
            ("Esc", "Quit"),
        ],
        ScreenId::ChangePin => &[("Tab", "Next"), ("Enter", "Update"), ("Esc", "Back")],
        ScreenId::Home => &[("L", "Logout"), ("Q", "Quit")],
    }
}
