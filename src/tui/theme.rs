//! Console palette.

use crate::types::{Notification, NotificationKind};
use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub ok: Color,
    pub registration: Color,
    /// Breakdowns older than a day.
    pub breakdown: Color,
    /// Breakdowns reported within the last day.
    pub urgent: Color,
    pub faded: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            ok: Color::Green,
            registration: Color::Blue,
            breakdown: Color::Yellow,
            urgent: Color::Red,
            faded: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.ok)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.breakdown)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.urgent)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.registration)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.faded)
    }

    /// Kind marker colour; fresh breakdowns are flagged urgent.
    pub fn marker(&self, notification: &Notification, now: DateTime<Utc>) -> Style {
        let color = match notification.kind {
            NotificationKind::Registration => self.registration,
            NotificationKind::Breakdown if notification.is_recent(now) => self.urgent,
            NotificationKind::Breakdown => self.breakdown,
        };
        Style::default().fg(color)
    }

    /// Row text: bold until acknowledged, faded after.
    pub fn row(&self, read: bool) -> Style {
        if read {
            self.muted()
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    /// Unread counter on the bell.
    pub fn badge(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.urgent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().fg(Color::Black).bg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn tab_active(&self) -> Style {
        self.selected().add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        self.muted()
    }
}
