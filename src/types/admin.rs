//! Administrator accounts and operator rights.

use super::SourceTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status as reported by `/admin/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminStatus {
    Active,
    /// Self-registered and waiting for approval.
    Inactive,
    Other(String),
}

impl AdminStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AdminStatus::Active => "active",
            AdminStatus::Inactive => "inactive",
            AdminStatus::Other(s) => s,
        }
    }
}

impl From<String> for AdminStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "active" => AdminStatus::Active,
            "inactive" => AdminStatus::Inactive,
            _ => AdminStatus::Other(s),
        }
    }
}

impl From<AdminStatus> for String {
    fn from(status: AdminStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Permission tier of an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperatorRights {
    FullAccess,
    #[default]
    RestrictedAccess,
}

impl OperatorRights {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRights::FullAccess => "full_access",
            OperatorRights::RestrictedAccess => "restricted_access",
        }
    }

    /// Parse a rights string; anything unrecognized is restricted.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "full_access" | "full" => OperatorRights::FullAccess,
            _ => OperatorRights::RestrictedAccess,
        }
    }

    /// Whether this tier sees and approves registrations.
    pub fn is_elevated(&self) -> bool {
        matches!(self, OperatorRights::FullAccess)
    }
}

impl fmt::Display for OperatorRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin record exactly as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAdminAccount {
    pub id: i64,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", alias = "last_name")]
    pub surname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Normalized administrator account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: i64,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub status: AdminStatus,
    #[serde(skip)]
    pub created_at: SourceTime,
}

impl AdminAccount {
    /// "First Last", as shown in registration messages.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }

    pub fn is_pending(&self) -> bool {
        self.status == AdminStatus::Inactive
    }
}

impl From<RawAdminAccount> for AdminAccount {
    fn from(raw: RawAdminAccount) -> Self {
        Self {
            id: raw.id,
            first_name: raw.first_name.unwrap_or_default(),
            surname: raw.surname.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            status: AdminStatus::from(raw.status.unwrap_or_else(|| "inactive".to_string())),
            created_at: SourceTime::parse(raw.created_at.as_deref()),
        }
    }
}

/// Normalize a full `/admin/list` payload.
pub fn normalize_admins(raw: Vec<RawAdminAccount>) -> Vec<AdminAccount> {
    raw.into_iter().map(AdminAccount::from).collect()
}

/// Body of `PUT /admin/update_status/{email}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminStatusUpdate {
    pub status: String,
    pub rights: String,
}

impl AdminStatusUpdate {
    /// Approval of a pending registration.
    pub fn approval() -> Self {
        Self {
            status: AdminStatus::Active.as_str().to_string(),
            rights: OperatorRights::RestrictedAccess.as_str().to_string(),
        }
    }
}
