//! Breakdown reports as returned by `/breakdown/list`.

use super::SourceTime;
use serde::{Deserialize, Serialize};

/// Repair status of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BreakdownStatus {
    Reported,
    InProgress,
    Fixed,
    Other(String),
}

impl BreakdownStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BreakdownStatus::Reported => "reported",
            BreakdownStatus::InProgress => "in_progress",
            BreakdownStatus::Fixed => "fixed",
            BreakdownStatus::Other(s) => s,
        }
    }
}

impl From<String> for BreakdownStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "reported" => BreakdownStatus::Reported,
            "in_progress" | "inprogress" => BreakdownStatus::InProgress,
            "fixed" => BreakdownStatus::Fixed,
            _ => BreakdownStatus::Other(s),
        }
    }
}

impl From<BreakdownStatus> for String {
    fn from(status: BreakdownStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBreakdown {
    pub id: i64,
    #[serde(alias = "lanternId")]
    pub lantern_id: i64,
    #[serde(default, alias = "parkId")]
    pub park_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "reportedAt")]
    pub reported_at: Option<String>,
}

impl RawBreakdown {
    /// First non-empty report time among the field variants in use.
    fn report_time(&self) -> Option<&str> {
        [&self.created_at, &self.date, &self.reported_at]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
    }
}

/// Normalized breakdown report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub id: i64,
    pub lantern_id: i64,
    pub park_id: Option<i64>,
    pub description: Option<String>,
    pub status: BreakdownStatus,
    pub priority: Option<String>,
    #[serde(skip)]
    pub reported_at: SourceTime,
}

impl Breakdown {
    pub fn is_fixed(&self) -> bool {
        self.status == BreakdownStatus::Fixed
    }
}

impl From<RawBreakdown> for Breakdown {
    fn from(raw: RawBreakdown) -> Self {
        let reported_at = SourceTime::parse(raw.report_time());
        Self {
            id: raw.id,
            lantern_id: raw.lantern_id,
            park_id: raw.park_id,
            description: raw.description,
            status: BreakdownStatus::from(raw.status.unwrap_or_else(|| "reported".to_string())),
            priority: raw.priority,
            reported_at,
        }
    }
}

/// Normalize a full `/breakdown/list` payload.
pub fn normalize_breakdowns(raw: Vec<RawBreakdown>) -> Vec<Breakdown> {
    raw.into_iter().map(Breakdown::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_report_time_precedence() {
        let raw: RawBreakdown = serde_json::from_str(
            r#"{"id":1,"lantern_id":3,"date":"2024-02-01T00:00:00Z","reported_at":"2024-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        let b = Breakdown::from(raw);
        assert_eq!(
            b.reported_at.instant(),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_backend_shape_uses_reported_at() {
        let raw: RawBreakdown = serde_json::from_str(
            r#"{"id":12,"lantern_id":3,"reported_at":"2024-03-01T12:30:00","description":"flicker","status":"reported","priority":"high","fixed_at":null}"#,
        )
        .unwrap();
        let b = Breakdown::from(raw);
        assert_eq!(b.status, BreakdownStatus::Reported);
        assert_eq!(b.priority.as_deref(), Some("high"));
        assert!(b.reported_at.instant().is_some());
    }

    #[test]
    fn test_camel_case_variant() {
        let raw: RawBreakdown = serde_json::from_str(
            r#"{"id":5,"lanternId":9,"parkId":2,"status":"in-progress","createdAt":""}"#,
        )
        .unwrap();
        let b = Breakdown::from(raw);
        assert_eq!(b.lantern_id, 9);
        assert_eq!(b.park_id, Some(2));
        assert_eq!(b.status, BreakdownStatus::InProgress);
        assert!(b.reported_at.is_missing());
    }

    #[test]
    fn test_fixed() {
        let status = BreakdownStatus::from("Fixed".to_string());
        assert_eq!(status, BreakdownStatus::Fixed);
    }
}
