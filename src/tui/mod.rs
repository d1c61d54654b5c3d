//! Terminal console for the notification center.

mod app;
mod events;
mod logs;
mod notifications;
mod state;
mod theme;

pub use app::{run_tui, App};
pub use state::{LogBuffer, LogMakeWriter};
pub use theme::Theme;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Notifications,
    Logs,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![Self::Notifications, Self::Logs]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Notifications => "Notifications",
            Self::Logs => "Logs",
        }
    }

    /// Get the route shortcut key.
    pub fn key(&self) -> char {
        match self {
            Self::Notifications => '1',
            Self::Logs => '2',
        }
    }
}
