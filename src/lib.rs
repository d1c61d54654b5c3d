//! lantern-watch - notification center for smart street lighting
//!
//! Polls the lighting backend for pending operator registrations and
//! lantern breakdowns, folds them into one read-tracked notification feed,
//! and serves that feed over a local HTTP API and a terminal console.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;

use config::Config;
use services::NotificationCenter;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub center: Arc<NotificationCenter>,
}

// Re-export commonly used types
pub use services::{CenterError, Poller};
pub use types::*;
