//! Toast notifications

use std::collections::VecDeque;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::Theme;

/// Notification severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Lifetime in app ticks (100ms each by default)
    fn ttl(self) -> u64 {
        match self {
            NotificationLevel::Info | NotificationLevel::Success => 30,
            NotificationLevel::Warning => 50,
            NotificationLevel::Error => 60,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// Toast notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Remaining ticks until dismissal
    pub ttl: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            ttl: level.ttl(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.ttl == 0
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let style = match self.level {
            NotificationLevel::Info => theme.info(),
            NotificationLevel::Success => theme.success(),
            NotificationLevel::Warning => theme.warning(),
            NotificationLevel::Error => theme.danger(),
        };

        // Top-right corner
        let width = ((self.message.chars().count() + 6).min(60) as u16).min(area.width);
        let height = 3.min(area.height);
        let x = area.x + area.width.saturating_sub(width + 2);
        let toast_area = Rect::new(x, area.y + 1, width, height);

        frame.render_widget(Clear, toast_area);
        let content = Paragraph::new(format!("{} {}", self.level.icon(), self.message))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(content, toast_area);
    }
}

/// Stack of active toasts, newest last
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    max_visible: usize,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible: 3,
        }
    }

    /// Add a notification, dropping the oldest beyond the visible limit
    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "Notification");
        self.notifications.push_back(notification);
        while self.notifications.len() > self.max_visible {
            self.notifications.pop_front();
        }
    }

    /// Age every toast by one tick and drop the expired ones
    pub fn tick(&mut self) {
        for notification in &mut self.notifications {
            notification.ttl = notification.ttl.saturating_sub(1);
        }
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Most recent toast
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    /// Render all active notifications
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        for (i, notification) in self.notifications.iter().enumerate() {
            let offset_y = (i * 4) as u16;
            if offset_y >= area.height {
                break;
            }
            let adjusted = Rect::new(
                area.x,
                area.y + offset_y,
                area.width,
                area.height - offset_y,
            );
            notification.render(frame, adjusted, theme);
        }
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
