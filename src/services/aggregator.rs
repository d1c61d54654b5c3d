//! Notification derivation.
//!
//! Turns the latest snapshot of the registration and breakdown feeds plus
//! the read-id set into the ordered notification list. Pure: the same
//! inputs always produce the same list, so the center simply re-runs it
//! whenever anything changes.

use crate::types::{
    AdminAccount, Breakdown, Lantern, Locale, Notification, NotificationKind, NotificationPayload,
    OperatorRights, SourceTime,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

/// Maximum number of breakdown notifications shown at once.
pub const BREAKDOWN_LIMIT: usize = 5;

/// Latest value of each feed; `None` until the first successful fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedSnapshot<'a> {
    pub admins: Option<&'a [AdminAccount]>,
    pub breakdowns: Option<&'a [Breakdown]>,
    pub lanterns: Option<&'a [Lantern]>,
}

/// Everything besides the feeds that shapes the output.
#[derive(Debug, Clone, Copy)]
pub struct DerivationContext {
    pub rights: OperatorRights,
    pub now: DateTime<Utc>,
    pub locale: Locale,
}

/// Build the notification list for one snapshot.
pub fn derive_notifications(
    snapshot: &FeedSnapshot<'_>,
    read_ids: &BTreeSet<String>,
    ctx: &DerivationContext,
) -> Vec<Notification> {
    let mut seen = HashSet::new();
    let mut notifications = Vec::new();

    if ctx.rights.is_elevated() {
        if let Some(admins) = snapshot.admins {
            notifications.extend(
                admins
                    .iter()
                    .filter(|admin| admin.is_pending())
                    .map(|admin| registration_notification(admin, ctx))
                    .filter(|n| seen.insert(n.id.clone())),
            );
        }
    }

    if let (Some(breakdowns), Some(lanterns)) = (snapshot.breakdowns, snapshot.lanterns) {
        // The cap applies in feed order, before sorting by time.
        notifications.extend(
            breakdowns
                .iter()
                .filter(|b| is_breakdown_visible(b, lanterns, ctx.now))
                .map(|b| breakdown_notification(b, ctx))
                .filter(|n| seen.insert(n.id.clone()))
                .take(BREAKDOWN_LIMIT),
        );
    }

    // Stable: ties keep registrations first, then feed order.
    notifications.sort_by(newest_first);

    for notification in &mut notifications {
        notification.read = read_ids.contains(&notification.id);
    }

    notifications
}

/// Whether a breakdown still deserves a notification.
///
/// A working lantern hides the breakdown unless the lantern was last seen
/// at or before the report, in which case the "working" reading is stale.
/// Any other lantern state (or no lantern at all) hides only fixed
/// breakdowns.
pub fn is_breakdown_visible(breakdown: &Breakdown, lanterns: &[Lantern], now: DateTime<Utc>) -> bool {
    match lanterns.iter().find(|l| l.id == breakdown.lantern_id) {
        Some(lantern) if lantern.is_working() => {
            let last_seen = lantern.last_seen.instant().unwrap_or(now);
            match breakdown.reported_at.instant() {
                Some(reported_at) => last_seen <= reported_at,
                None => false,
            }
        }
        _ => !breakdown.is_fixed(),
    }
}

fn notification_time(source: &SourceTime, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match source {
        SourceTime::Missing => Some(now),
        SourceTime::At(dt) => Some(*dt),
        SourceTime::Unparsable(_) => None,
    }
}

fn registration_notification(admin: &AdminAccount, ctx: &DerivationContext) -> Notification {
    Notification {
        id: NotificationKind::Registration.notification_id(admin.id),
        kind: NotificationKind::Registration,
        title: ctx.locale.new_registration().to_string(),
        message: ctx
            .locale
            .registration_message(&admin.full_name(), &admin.email),
        timestamp: notification_time(&admin.created_at, ctx.now),
        read: false,
        payload: NotificationPayload::Registration(admin.clone()),
    }
}

fn breakdown_notification(breakdown: &Breakdown, ctx: &DerivationContext) -> Notification {
    let park = breakdown
        .park_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| ctx.locale.unknown_park().to_string());

    Notification {
        id: NotificationKind::Breakdown.notification_id(breakdown.id),
        kind: NotificationKind::Breakdown,
        title: ctx.locale.lantern_breakdown().to_string(),
        message: ctx.locale.breakdown_message(
            breakdown.lantern_id,
            &park,
            breakdown.description.as_deref().unwrap_or_default(),
        ),
        timestamp: notification_time(&breakdown.reported_at, ctx.now),
        read: false,
        payload: NotificationPayload::Breakdown(breakdown.clone()),
    }
}

/// Descending by time; unparsable timestamps sink to the bottom.
fn newest_first(a: &Notification, b: &Notification) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
