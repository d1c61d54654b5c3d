//! Timestamps as they arrive from the lighting backend.

use chrono::{DateTime, NaiveDateTime, Utc};

/// A source timestamp after normalization.
///
/// The backend emits RFC 3339 strings from some endpoints and naive
/// ISO-8601 datetimes (implicitly UTC) from others. Fields may also be
/// missing or hold garbage, and those cases behave differently downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTime {
    Missing,
    Unparsable(String),
    At(DateTime<Utc>),
}

impl SourceTime {
    /// Parse an optional raw timestamp string.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return SourceTime::Missing;
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return SourceTime::At(dt.with_timezone(&Utc));
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return SourceTime::At(naive.and_utc());
            }
        }

        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return SourceTime::At(naive.and_utc());
            }
        }

        SourceTime::Unparsable(raw.to_string())
    }

    /// The parsed instant, if any.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            SourceTime::At(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SourceTime::Missing)
    }
}

impl From<DateTime<Utc>> for SourceTime {
    fn from(dt: DateTime<Utc>) -> Self {
        SourceTime::At(dt)
    }
}
