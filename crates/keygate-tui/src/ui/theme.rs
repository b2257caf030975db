//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Keygate color palette
pub struct Theme {
    // Brand gradient stops
    pub brand_teal: Color,
    pub brand_blue: Color,
    pub brand_indigo: Color,
    pub surface: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub input_bg: Color,
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand_teal: Color::Rgb(28, 174, 151),  // #1CAE97
            brand_blue: Color::Rgb(1, 117, 178),   // #0175B2
            brand_indigo: Color::Rgb(75, 61, 145), // #4B3D91
            surface: Color::Rgb(33, 33, 33),       // #212121

            success: Color::Rgb(76, 175, 80), // #4CAF50
            warning: Color::Rgb(255, 152, 0), // #FF9800
            danger: Color::Rgb(244, 67, 54),  // #F44336
            info: Color::Rgb(33, 150, 243),   // #2196F3

            border: Color::Rgb(66, 66, 66),
            border_focused: Color::Rgb(28, 174, 151),
            text_primary: Color::Rgb(250, 250, 250),
            text_secondary: Color::Rgb(189, 189, 189),
            text_muted: Color::Rgb(118, 123, 127), // #767B7F
            input_bg: Color::Rgb(48, 48, 48),
            link: Color::Rgb(98, 121, 214),
        }
    }
}

impl Theme {
    /// Get default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get secondary text style
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get muted text style
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Get highlighted text style
    pub fn text_highlight(&self) -> Style {
        Style::default()
            .fg(self.brand_teal)
            .add_modifier(Modifier::BOLD)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Banner behind the logo
    pub fn banner(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.brand_blue)
            .add_modifier(Modifier::BOLD)
    }

    /// Field label above an input
    pub fn label(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Icon badge in front of an input
    pub fn icon(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.brand_indigo)
    }

    /// Get border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get focused border style
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Border of an input that currently shows an error
    pub fn border_error(&self) -> Style {
        Style::default().fg(self.danger)
    }

    /// Get success style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Get warning style
    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Get danger style
    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Get info style
    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Get input field style
    pub fn input(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.text_primary).bg(self.input_bg)
        } else {
            Style::default().fg(self.text_secondary).bg(self.input_bg)
        }
    }

    /// Primary action button
    pub fn button(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.brand_indigo)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary navigation link
    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.link)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Get PIN placeholder style
    pub fn pin_placeholder(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Create a high-contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            border: Color::White,
            border_focused: Color::Yellow,
            input_bg: Color::Black,
            link: Color::Cyan,
            ..Self::default()
        }
    }
}
