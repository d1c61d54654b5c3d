//! Notification center
//!
//! Owns the latest snapshot of every feed, the derived notification list
//! and the read ledger. Feed updates replace one slice atomically and then
//! re-derive the whole list, so readers only ever see a list built from a
//! single consistent snapshot.
//!
//! State:
//! - feed slices: admins, breakdowns, lanterns (None until first fetch)
//! - ReadLedger: durable set of dismissed ids
//! - notifications: derived, rebuilt from scratch on every change

use super::aggregator::{derive_notifications, DerivationContext, FeedSnapshot};
use super::clock::{Clock, SystemClock};
use super::poller::Poller;
use super::read_ledger::{LedgerWrite, ReadLedger};
use super::store::{KeyValueStore, StoreError};
use crate::sources::{LightingBackend, SourceError};
use crate::types::{
    badge_text, unread_count, AdminAccount, AdminStatus, AdminStatusUpdate, Breakdown, Lantern,
    Locale, Notification, NotificationFeed, NotificationKind, OperatorRights,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Errors from notification actions.
#[derive(Error, Debug)]
pub enum CenterError {
    #[error("Notification not found: {0}")]
    UnknownNotification(String),

    #[error("Operator is not allowed to approve registrations")]
    Forbidden,

    #[error("{detail}")]
    ApprovalFailed {
        detail: String,
        #[source]
        source: SourceError,
    },
}

/// Which feeds have produced at least one successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub admins: bool,
    pub breakdowns: bool,
    pub lanterns: bool,
}

impl FeedStatus {
    /// Breakdown notifications need both incident feeds.
    pub fn incidents_ready(&self) -> bool {
        self.breakdowns && self.lanterns
    }
}

struct CenterState {
    admins: Option<Vec<AdminAccount>>,
    breakdowns: Option<Vec<Breakdown>>,
    lanterns: Option<Vec<Lantern>>,
    ledger: ReadLedger,
    notifications: Vec<Notification>,
}

impl CenterState {
    fn snapshot(&self) -> FeedSnapshot<'_> {
        FeedSnapshot {
            admins: self.admins.as_deref(),
            breakdowns: self.breakdowns.as_deref(),
            lanterns: self.lanterns.as_deref(),
        }
    }
}

/// State container behind the bell icon.
pub struct NotificationCenter {
    backend: Arc<dyn LightingBackend>,
    clock: Arc<dyn Clock>,
    rights: OperatorRights,
    locale: Locale,
    state: RwLock<CenterState>,
    /// Generation of the last read-state write that reached the store.
    persisted: Mutex<u64>,
    closed: AtomicBool,
}

impl NotificationCenter {
    /// Create a center; read state is loaded from `store` immediately.
    pub fn new(
        backend: Arc<dyn LightingBackend>,
        store: Arc<dyn KeyValueStore>,
        rights: OperatorRights,
        locale: Locale,
    ) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            rights,
            locale,
            state: RwLock::new(CenterState {
                admins: None,
                breakdowns: None,
                lanterns: None,
                ledger: ReadLedger::load(store),
                notifications: Vec::new(),
            }),
            persisted: Mutex::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Replace the clock used for "now".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn rights(&self) -> OperatorRights {
        self.rights
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    fn rederive(&self, state: &mut CenterState) {
        let ctx = DerivationContext {
            rights: self.rights,
            now: self.clock.now(),
            locale: self.locale,
        };
        let notifications = derive_notifications(&state.snapshot(), state.ledger.ids(), &ctx);
        debug!(
            "Derived {} notifications ({} unread)",
            notifications.len(),
            unread_count(&notifications)
        );
        state.notifications = notifications;
    }

    // =========================================================================
    // Feed updates
    // =========================================================================

    pub async fn apply_admins(&self, admins: Vec<AdminAccount>) {
        let mut state = self.state.write().await;
        state.admins = Some(admins);
        self.rederive(&mut state);
    }

    pub async fn apply_breakdowns(&self, breakdowns: Vec<Breakdown>) {
        let mut state = self.state.write().await;
        state.breakdowns = Some(breakdowns);
        self.rederive(&mut state);
    }

    pub async fn apply_lanterns(&self, lanterns: Vec<Lantern>) {
        let mut state = self.state.write().await;
        state.lanterns = Some(lanterns);
        self.rederive(&mut state);
    }

    /// Fetch the admin feed. Only operators with elevated rights poll it.
    /// On failure the previous admins stay in place.
    pub async fn refresh_admins(&self) {
        if !self.rights.is_elevated() {
            return;
        }

        match self.backend.list_admins().await {
            Ok(admins) => self.apply_admins(admins).await,
            Err(e) => warn!("Admin feed refresh failed, keeping previous data: {}", e),
        }
    }

    /// Fetch breakdowns and lanterns concurrently; each slice is replaced
    /// only if its own fetch succeeded.
    pub async fn refresh_incidents(&self) {
        let (breakdowns, lanterns) =
            tokio::join!(self.backend.list_breakdowns(), self.backend.list_lanterns());

        match breakdowns {
            Ok(breakdowns) => self.apply_breakdowns(breakdowns).await,
            Err(e) => warn!("Breakdown feed refresh failed, keeping previous data: {}", e),
        }

        match lanterns {
            Ok(lanterns) => self.apply_lanterns(lanterns).await,
            Err(e) => warn!("Lantern feed refresh failed, keeping previous data: {}", e),
        }
    }

    /// Start one poller per feed. Dropping the returned pollers stops them.
    pub fn start_polling(self: &Arc<Self>, interval: Duration) -> Vec<Poller> {
        let mut pollers = Vec::new();

        if self.rights.is_elevated() {
            let center = self.clone();
            pollers.push(Poller::spawn("admins", interval, move || {
                let center = center.clone();
                async move { center.refresh_admins().await }
            }));
        }

        let center = self.clone();
        pollers.push(Poller::spawn("incidents", interval, move || {
            let center = center.clone();
            async move { center.refresh_incidents().await }
        }));

        info!(
            "Polling {} feed(s) every {}s",
            pollers.len(),
            interval.as_secs()
        );
        pollers
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn feed(&self) -> NotificationFeed {
        NotificationFeed::new(self.notifications().await)
    }

    pub async fn unread_count(&self) -> usize {
        unread_count(&self.state.read().await.notifications)
    }

    /// Bell badge text; `None` when everything is read.
    pub async fn badge(&self) -> Option<String> {
        badge_text(self.unread_count().await)
    }

    pub async fn feed_status(&self) -> FeedStatus {
        let state = self.state.read().await;
        FeedStatus {
            admins: state.admins.is_some(),
            breakdowns: state.breakdowns.is_some(),
            lanterns: state.lanterns.is_some(),
        }
    }

    pub async fn read_ids(&self) -> Vec<String> {
        self.state.read().await.ledger.ids().iter().cloned().collect()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Acknowledge one notification. Returns whether the id was new to the
    /// ledger.
    pub async fn mark_as_read(&self, id: &str) -> bool {
        let (added, write) = {
            let mut state = self.state.write().await;

            if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                n.read = true;
            }

            let added = state.ledger.mark(id);
            (added, state.ledger.pending_write())
        };

        if added {
            debug!("Marked {} as read", id);
        }
        self.persist_read_state(write).await;
        added
    }

    /// Acknowledge every notification currently visible. Returns how many
    /// ids were new to the ledger.
    pub async fn mark_all_as_read(&self) -> usize {
        let (added, write) = {
            let mut state = self.state.write().await;
            let state = &mut *state;

            let added = state
                .ledger
                .mark_all(state.notifications.iter().map(|n| n.id.as_str()));

            for n in &mut state.notifications {
                n.read = true;
            }
            (added, state.ledger.pending_write())
        };

        info!("Marked all notifications as read ({} new)", added);
        self.persist_read_state(write).await;
        added
    }

    /// Write a read-state snapshot on the blocking pool, outside the state
    /// lock. A snapshot older than one already written is dropped.
    async fn persist_read_state(&self, write: Result<LedgerWrite, StoreError>) {
        let write = match write {
            Ok(write) => write,
            Err(e) => {
                warn!("Failed to encode read-notification state: {}", e);
                return;
            }
        };

        let mut persisted = self.persisted.lock().await;
        let generation = write.generation();
        if generation <= *persisted {
            return;
        }

        match tokio::task::spawn_blocking(move || write.write()).await {
            Ok(Ok(())) => *persisted = generation,
            Ok(Err(e)) => warn!("Failed to persist read-notification state: {}", e),
            Err(e) => warn!("Read-notification write task failed: {}", e),
        }
    }

    /// Approve a pending registration: activate the account with restricted
    /// rights, drop its notification and refetch the admin feed.
    pub async fn approve_registration(&self, admin: &AdminAccount) -> Result<(), CenterError> {
        if !self.rights.is_elevated() {
            return Err(CenterError::Forbidden);
        }

        if let Err(e) = self
            .backend
            .update_admin_status(&admin.email, &AdminStatusUpdate::approval())
            .await
        {
            warn!("Failed to activate {}: {}", admin.email, e);
            let detail = e
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| self.locale.admin_activation_error().to_string());
            return Err(CenterError::ApprovalFailed { detail, source: e });
        }

        info!("Activated administrator {}", admin.email);

        if self.is_closed() {
            debug!("Center closed before approval completed, skipping local update");
            return Ok(());
        }

        {
            let mut state = self.state.write().await;
            state.notifications.retain(|n| {
                !(n.kind == NotificationKind::Registration
                    && n.admin().map_or(false, |a| a.email == admin.email))
            });
            // Keep a re-derivation before the refetch from resurrecting it.
            if let Some(admins) = state.admins.as_mut() {
                for a in admins.iter_mut().filter(|a| a.email == admin.email) {
                    a.status = AdminStatus::Active;
                }
            }
        }

        self.refresh_admins().await;
        Ok(())
    }

    /// Approve the registration behind a notification id.
    pub async fn approve_notification(&self, id: &str) -> Result<(), CenterError> {
        let admin = {
            let state = self.state.read().await;
            state
                .notifications
                .iter()
                .find(|n| n.id == id)
                .and_then(|n| n.admin().cloned())
        };

        match admin {
            Some(admin) => self.approve_registration(&admin).await,
            None => Err(CenterError::UnknownNotification(id.to_string())),
        }
    }

    /// Mark the center as torn down; late completions skip local updates.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
