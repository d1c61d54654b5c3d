//! Integration tests for the notification center state container.

mod common;

use common::*;
use lantern_watch::services::{
    CenterError, FileStore, KeyValueStore, MemoryStore, StoreError, READ_NOTIFICATIONS_KEY,
};
use lantern_watch::types::*;
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

fn scenario() -> Arc<FakeBackend> {
    Arc::new(FakeBackend::new(
        vec![
            admin(7, "a@x.com", AdminStatus::Inactive),
            admin(8, "b@x.com", AdminStatus::Active),
        ],
        vec![
            breakdown(12, 3, BreakdownStatus::Reported, hours_ago(2)),
            breakdown(13, 4, BreakdownStatus::Reported, hours_ago(5)),
        ],
        vec![
            lantern(3, LanternStatus::Broken, SourceTime::Missing),
            // Seen after breakdown 13 was reported: the report is stale.
            lantern(4, LanternStatus::Working, hours_ago(1)),
        ],
    ))
}

async fn loaded_center(backend: Arc<FakeBackend>, rights: OperatorRights) -> lantern_watch::services::NotificationCenter {
    let center = center_with(backend, memory_store(), rights);
    center.refresh_admins().await;
    center.refresh_incidents().await;
    center
}

#[tokio::test]
async fn test_feeds_merge_into_one_list() {
    let center = loaded_center(scenario(), OperatorRights::FullAccess).await;
    let ids: Vec<String> = center.notifications().await.into_iter().map(|n| n.id).collect();

    // registration-7 is 7h old, breakdown-12 2h old.
    assert_eq!(ids, vec!["breakdown-12", "registration-7"]);
    assert_eq!(center.unread_count().await, 2);
    assert_eq!(center.badge().await.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_restricted_operator_never_fetches_admins() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::RestrictedAccess).await;

    assert_eq!(backend.admin_fetches.load(Ordering::SeqCst), 0);
    let ids: Vec<String> = center.notifications().await.into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["breakdown-12"]);
}

#[tokio::test]
async fn test_registration_example() {
    let backend = Arc::new(FakeBackend::new(
        vec![admin(7, "a@x.com", AdminStatus::Inactive)],
        vec![],
        vec![],
    ));
    let center = loaded_center(backend, OperatorRights::FullAccess).await;
    let notifications = center.notifications().await;

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].id, "registration-7");
    assert_eq!(notifications[0].kind, NotificationKind::Registration);
    assert!(!notifications[0].read);
    assert_eq!(
        notifications[0].message,
        "Anna K (a@x.com) is waiting for account approval"
    );
}

#[tokio::test]
async fn test_mark_as_read_survives_rederivation() {
    let backend = scenario();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let center = center_with(backend.clone(), store.clone(), OperatorRights::FullAccess);
    center.refresh_incidents().await;

    assert!(center.mark_as_read("breakdown-12").await);
    assert!(!center.mark_as_read("breakdown-12").await);

    // A fresh center over the same store is a reload.
    let reloaded = center_with(backend, store, OperatorRights::FullAccess);
    reloaded.refresh_incidents().await;
    let n = reloaded
        .notifications()
        .await
        .into_iter()
        .find(|n| n.id == "breakdown-12")
        .unwrap();
    assert!(n.read);
}

#[tokio::test]
async fn test_read_flags_match_ledger_after_every_refresh() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;
    center.mark_as_read("registration-7").await;

    backend.set_breakdowns(vec![
        breakdown(12, 3, BreakdownStatus::Reported, hours_ago(2)),
        breakdown(20, 3, BreakdownStatus::Reported, hours_ago(1)),
    ]);
    center.refresh_incidents().await;

    let read: HashSet<String> = center.read_ids().await.into_iter().collect();
    for n in center.notifications().await {
        assert_eq!(n.read, read.contains(&n.id), "{}", n.id);
    }
}

#[tokio::test]
async fn test_mark_all_as_read_is_idempotent_and_spares_new_arrivals() {
    let backend = scenario();
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let center = center_with(backend.clone(), store.clone(), OperatorRights::FullAccess);
    center.refresh_admins().await;
    center.refresh_incidents().await;

    assert_eq!(center.mark_all_as_read().await, 2);
    let once = center.read_ids().await;
    assert_eq!(center.mark_all_as_read().await, 0);
    assert_eq!(center.read_ids().await, once);
    assert_eq!(center.unread_count().await, 0);
    assert_eq!(center.badge().await, None);

    backend.set_breakdowns(vec![
        breakdown(12, 3, BreakdownStatus::Reported, hours_ago(2)),
        breakdown(30, 3, BreakdownStatus::Reported, hours_ago(1)),
    ]);
    center.refresh_incidents().await;

    let unread: Vec<String> = center
        .notifications()
        .await
        .into_iter()
        .filter(|n| !n.read)
        .map(|n| n.id)
        .collect();
    assert_eq!(unread, vec!["breakdown-30"]);

    let stored: Vec<String> =
        serde_json::from_str(&store.get(READ_NOTIFICATIONS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, once);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_feed() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;
    let before = center.notifications().await;

    backend.fail_breakdowns();
    center.refresh_incidents().await;

    assert_eq!(center.notifications().await, before);
}

#[tokio::test]
async fn test_approve_registration_removes_notification_and_refetches() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;
    let fetches_before = backend.admin_fetches.load(Ordering::SeqCst);

    center.approve_notification("registration-7").await.unwrap();

    let updates = backend.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "a@x.com");
    assert_eq!(updates[0].1, AdminStatusUpdate::approval());

    assert_eq!(backend.admin_fetches.load(Ordering::SeqCst), fetches_before + 1);
    assert!(center
        .notifications()
        .await
        .iter()
        .all(|n| n.kind != NotificationKind::Registration));
}

#[tokio::test]
async fn test_approved_registration_stays_gone_when_refetch_fails() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;

    backend.set_admins(None);
    center.approve_notification("registration-7").await.unwrap();
    // An unrelated feed update re-derives from the cached admins.
    center.refresh_incidents().await;

    assert!(center
        .notifications()
        .await
        .iter()
        .all(|n| n.id != "registration-7"));
}

#[tokio::test]
async fn test_approve_failure_leaves_state_untouched() {
    let backend = scenario();
    *backend.reject_updates.lock().unwrap() = Some("Administrator not found".to_string());
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;
    let before = center.notifications().await;

    let err = center.approve_notification("registration-7").await.unwrap_err();
    assert!(matches!(err, CenterError::ApprovalFailed { .. }));
    assert_eq!(err.to_string(), "Administrator not found");
    assert_eq!(center.notifications().await, before);
}

#[tokio::test]
async fn test_approve_requires_registration_notification() {
    let center = loaded_center(scenario(), OperatorRights::FullAccess).await;

    let err = center.approve_notification("breakdown-12").await.unwrap_err();
    assert!(matches!(err, CenterError::UnknownNotification(_)));
}

#[tokio::test]
async fn test_approve_requires_elevated_rights() {
    let center = loaded_center(scenario(), OperatorRights::RestrictedAccess).await;
    let pending = admin(7, "a@x.com", AdminStatus::Inactive);

    let err = center.approve_registration(&pending).await.unwrap_err();
    assert!(matches!(err, CenterError::Forbidden));
}

#[tokio::test]
async fn test_closed_center_skips_local_update() {
    let backend = scenario();
    let center = loaded_center(backend.clone(), OperatorRights::FullAccess).await;
    let pending = admin(7, "a@x.com", AdminStatus::Inactive);
    let fetches_before = backend.admin_fetches.load(Ordering::SeqCst);

    center.close();
    center.approve_registration(&pending).await.unwrap();

    assert_eq!(backend.updates.lock().unwrap().len(), 1);
    assert_eq!(backend.admin_fetches.load(Ordering::SeqCst), fetches_before);
    assert!(center
        .notifications()
        .await
        .iter()
        .any(|n| n.id == "registration-7"));
}

#[tokio::test]
async fn test_read_state_persists_to_disk() {
    let dir = std::env::temp_dir().join(format!("lantern_watch_center_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.clone()).unwrap());
        let center = center_with(scenario(), store, OperatorRights::FullAccess);
        center.refresh_incidents().await;
        center.mark_as_read("breakdown-12").await;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.clone()).unwrap());
    let center = center_with(scenario(), store, OperatorRights::FullAccess);
    center.refresh_incidents().await;
    assert_eq!(center.unread_count().await, 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test(start_paused = true)]
async fn test_polling_refreshes_both_feeds_until_stopped() {
    let backend = scenario();
    let center = Arc::new(center_with(backend.clone(), memory_store(), OperatorRights::FullAccess));

    let pollers = center.start_polling(Duration::from_secs(30));
    assert_eq!(pollers.len(), 2);

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(backend.admin_fetches.load(Ordering::SeqCst), 3);
    assert_eq!(backend.incident_fetches.load(Ordering::SeqCst), 3);
    assert_eq!(center.notifications().await.len(), 2);

    for poller in pollers {
        poller.shutdown().await;
    }
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(backend.incident_fetches.load(Ordering::SeqCst), 3);
}

/// Store whose writes park until the test lets them through.
struct GatedStore {
    inner: MemoryStore,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl KeyValueStore for GatedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        self.inner.set(key, value)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_read_state_write_does_not_block_readers() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let store = Arc::new(GatedStore {
        inner: MemoryStore::new(),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });

    let center = Arc::new(center_with(scenario(), store.clone(), OperatorRights::FullAccess));
    center.refresh_incidents().await;

    let marking = {
        let center = center.clone();
        tokio::spawn(async move { center.mark_as_read("breakdown-12").await })
    };

    tokio::task::spawn_blocking(move || entered_rx.recv())
        .await
        .unwrap()
        .unwrap();

    // The write is parked; the feed must still be readable.
    let notifications = tokio::time::timeout(Duration::from_secs(2), center.notifications())
        .await
        .expect("state lock held during write");
    assert!(notifications.iter().any(|n| n.id == "breakdown-12" && n.read));

    release_tx.send(()).unwrap();
    assert!(marking.await.unwrap());

    let stored: Vec<String> =
        serde_json::from_str(&store.get(READ_NOTIFICATIONS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, vec!["breakdown-12"]);
}
