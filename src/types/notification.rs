//! Notification types for the notification center.

use super::{AdminAccount, Breakdown};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Breakdowns younger than this are highlighted as recent.
const RECENT_HOURS: i64 = 24;

/// Notification categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Registration,
    Breakdown,
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Registration => "registration",
            NotificationKind::Breakdown => "breakdown",
        }
    }

    /// Synthetic notification id for a source record of this kind.
    pub fn notification_id(&self, source_id: i64) -> String {
        format!("{}-{}", self.as_str(), source_id)
    }
}

/// The source record a notification was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationPayload {
    Registration(AdminAccount),
    Breakdown(Breakdown),
}

/// A derived notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// `registration-<admin id>` or `breakdown-<breakdown id>`
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// None when the source carried a timestamp that could not be parsed
    pub timestamp: Option<DateTime<Utc>>,
    pub read: bool,
    pub payload: NotificationPayload,
}

impl Notification {
    /// The pending admin behind a registration notification.
    pub fn admin(&self) -> Option<&AdminAccount> {
        match &self.payload {
            NotificationPayload::Registration(admin) => Some(admin),
            NotificationPayload::Breakdown(_) => None,
        }
    }

    pub fn breakdown(&self) -> Option<&Breakdown> {
        match &self.payload {
            NotificationPayload::Breakdown(b) => Some(b),
            NotificationPayload::Registration(_) => None,
        }
    }

    /// Whether this is a breakdown reported within the last day.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        self.kind == NotificationKind::Breakdown
            && self
                .timestamp
                .map(|ts| now - ts < Duration::hours(RECENT_HOURS))
                .unwrap_or(false)
    }
}

/// Count of notifications not yet read.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Text shown on the bell icon; `None` hides the badge.
pub fn badge_text(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        1..=9 => Some(unread.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// Feed returned by the notifications API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub badge: Option<String>,
}

impl NotificationFeed {
    pub fn new(notifications: Vec<Notification>) -> Self {
        let unread_count = unread_count(&notifications);
        Self {
            notifications,
            unread_count,
            badge: badge_text(unread_count),
        }
    }
}

/// Request to mark specific notifications as read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    /// Notification IDs to mark as read.
    pub ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(1).as_deref(), Some("1"));
        assert_eq!(badge_text(9).as_deref(), Some("9"));
        assert_eq!(badge_text(10).as_deref(), Some("9+"));
        assert_eq!(badge_text(250).as_deref(), Some("9+"));
    }

    #[test]
    fn test_notification_id() {
        assert_eq!(NotificationKind::Registration.notification_id(7), "registration-7");
        assert_eq!(NotificationKind::Breakdown.notification_id(12), "breakdown-12");
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&NotificationKind::Breakdown).unwrap();
        assert_eq!(json, "\"breakdown\"");
    }
}
