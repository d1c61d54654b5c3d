//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use lantern_watch::services::{FixedClock, KeyValueStore, MemoryStore, NotificationCenter};
use lantern_watch::sources::{LightingBackend, SourceError};
use lantern_watch::types::*;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn hours_ago(h: i64) -> SourceTime {
    SourceTime::At(now() - Duration::hours(h))
}

pub fn admin(id: i64, email: &str, status: AdminStatus) -> AdminAccount {
    AdminAccount {
        id,
        first_name: "Anna".to_string(),
        surname: "K".to_string(),
        email: email.to_string(),
        status,
        created_at: hours_ago(id),
    }
}

pub fn breakdown(id: i64, lantern_id: i64, status: BreakdownStatus, reported_at: SourceTime) -> Breakdown {
    Breakdown {
        id,
        lantern_id,
        park_id: Some(1),
        description: Some("lamp out".to_string()),
        status,
        priority: Some("medium".to_string()),
        reported_at,
    }
}

pub fn lantern(id: i64, status: LanternStatus, last_seen: SourceTime) -> Lantern {
    Lantern {
        id,
        status,
        last_seen,
        park_id: Some(1),
    }
}

fn unavailable() -> SourceError {
    SourceError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: "backend down".to_string(),
    }
}

/// In-memory lighting backend. A feed set to `None` fails its fetch.
#[derive(Default)]
pub struct FakeBackend {
    pub admins: Mutex<Option<Vec<AdminAccount>>>,
    pub breakdowns: Mutex<Option<Vec<Breakdown>>>,
    pub lanterns: Mutex<Option<Vec<Lantern>>>,
    /// When set, status updates fail with this detail.
    pub reject_updates: Mutex<Option<String>>,
    pub updates: Mutex<Vec<(String, AdminStatusUpdate)>>,
    pub admin_fetches: AtomicUsize,
    pub incident_fetches: AtomicUsize,
}

impl FakeBackend {
    pub fn new(admins: Vec<AdminAccount>, breakdowns: Vec<Breakdown>, lanterns: Vec<Lantern>) -> Self {
        Self {
            admins: Mutex::new(Some(admins)),
            breakdowns: Mutex::new(Some(breakdowns)),
            lanterns: Mutex::new(Some(lanterns)),
            ..Default::default()
        }
    }

    pub fn fail_breakdowns(&self) {
        *self.breakdowns.lock().unwrap() = None;
    }

    pub fn set_breakdowns(&self, breakdowns: Vec<Breakdown>) {
        *self.breakdowns.lock().unwrap() = Some(breakdowns);
    }

    pub fn set_admins(&self, admins: Option<Vec<AdminAccount>>) {
        *self.admins.lock().unwrap() = admins;
    }
}

#[async_trait]
impl LightingBackend for FakeBackend {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, SourceError> {
        self.admin_fetches.fetch_add(1, Ordering::SeqCst);
        self.admins.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn list_breakdowns(&self) -> Result<Vec<Breakdown>, SourceError> {
        self.incident_fetches.fetch_add(1, Ordering::SeqCst);
        self.breakdowns.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn list_lanterns(&self) -> Result<Vec<Lantern>, SourceError> {
        self.lanterns.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn update_admin_status(
        &self,
        email: &str,
        update: &AdminStatusUpdate,
    ) -> Result<(), SourceError> {
        if let Some(detail) = self.reject_updates.lock().unwrap().clone() {
            return Err(SourceError::Status {
                status: StatusCode::BAD_REQUEST,
                detail,
            });
        }

        self.updates
            .lock()
            .unwrap()
            .push((email.to_string(), update.clone()));

        if let Some(admins) = self.admins.lock().unwrap().as_mut() {
            for a in admins.iter_mut().filter(|a| a.email == email) {
                a.status = AdminStatus::from(update.status.clone());
            }
        }
        Ok(())
    }
}

pub fn center_with(
    backend: Arc<FakeBackend>,
    store: Arc<dyn KeyValueStore>,
    rights: OperatorRights,
) -> NotificationCenter {
    NotificationCenter::new(backend, store, rights, Locale::En)
        .with_clock(Arc::new(FixedClock::new(now())))
}

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}
