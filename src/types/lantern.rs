//! Lanterns as reported by `/lantern/list`.

use super::SourceTime;
use serde::{Deserialize, Serialize};

/// Operational status of a lantern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanternStatus {
    Working,
    Broken,
    Maintenance,
    Other(String),
}

impl LanternStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LanternStatus::Working => "working",
            LanternStatus::Broken => "broken",
            LanternStatus::Maintenance => "maintenance",
            LanternStatus::Other(s) => s,
        }
    }
}

impl From<String> for LanternStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "working" => LanternStatus::Working,
            "broken" => LanternStatus::Broken,
            "maintenance" => LanternStatus::Maintenance,
            _ => LanternStatus::Other(s),
        }
    }
}

impl From<LanternStatus> for String {
    fn from(status: LanternStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLantern {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "lastSeen")]
    pub last_seen: Option<String>,
    #[serde(default, alias = "parkId")]
    pub park_id: Option<i64>,
}

/// Normalized lantern.
#[derive(Debug, Clone, PartialEq)]
pub struct Lantern {
    pub id: i64,
    pub status: LanternStatus,
    pub last_seen: SourceTime,
    pub park_id: Option<i64>,
}

impl Lantern {
    pub fn is_working(&self) -> bool {
        self.status == LanternStatus::Working
    }
}

impl From<RawLantern> for Lantern {
    fn from(raw: RawLantern) -> Self {
        Self {
            id: raw.id,
            status: LanternStatus::from(raw.status.unwrap_or_else(|| "working".to_string())),
            last_seen: SourceTime::parse(raw.last_seen.as_deref()),
            park_id: raw.park_id,
        }
    }
}

/// Normalize a full `/lantern/list` payload.
pub fn normalize_lanterns(raw: Vec<RawLantern>) -> Vec<Lantern> {
    raw.into_iter().map(Lantern::from).collect()
}
