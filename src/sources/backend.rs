//! REST client for the street-lighting backend.
//!
//! Fetches the three feeds the notification center is built from and
//! performs the registration-approval mutation. Every request carries the
//! operator's bearer token.

use crate::types::{
    normalize_admins, normalize_breakdowns, normalize_lanterns, AdminAccount, AdminStatusUpdate,
    Breakdown, Lantern, RawAdminAccount, RawBreakdown, RawLantern,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors talking to the lighting backend.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("Access token rejected")]
    Unauthorized,

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl SourceError {
    /// Backend-supplied explanation, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            SourceError::Status { detail, .. } if !detail.is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}

/// The lighting backend as the notification center sees it.
#[async_trait]
pub trait LightingBackend: Send + Sync {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, SourceError>;

    async fn list_breakdowns(&self) -> Result<Vec<Breakdown>, SourceError>;

    async fn list_lanterns(&self) -> Result<Vec<Lantern>, SourceError>;

    /// `PUT /admin/update_status/{email}`
    async fn update_admin_status(
        &self,
        email: &str,
        update: &AdminStatusUpdate,
    ) -> Result<(), SourceError>;
}

/// reqwest-backed implementation of [`LightingBackend`].
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(
        base_url: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Status endpoint for `email`, with the address as one encoded segment.
    fn status_url(&self, email: &str) -> Result<Url, SourceError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["admin", "update_status", email]);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, SourceError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Lighting backend rejected the access token");
            return Err(SourceError::Unauthorized);
        }

        if !status.is_success() {
            let detail = extract_detail(&text);
            warn!("Lighting backend error: {} - {}", status, detail);
            return Err(SourceError::Status { status, detail });
        }

        Ok(text)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, SourceError> {
        let url = self.url(path);
        debug!("Fetching {}", url);

        let text = self.send(self.client.get(&url)).await?;
        let items: Vec<T> = serde_json::from_str(&text)?;

        debug!("{} returned {} records", path, items.len());
        Ok(items)
    }
}

#[async_trait]
impl LightingBackend for BackendClient {
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, SourceError> {
        let raw: Vec<RawAdminAccount> = self.get_list("/admin/list").await?;
        Ok(normalize_admins(raw))
    }

    async fn list_breakdowns(&self) -> Result<Vec<Breakdown>, SourceError> {
        let raw: Vec<RawBreakdown> = self.get_list("/breakdown/list").await?;
        Ok(normalize_breakdowns(raw))
    }

    async fn list_lanterns(&self) -> Result<Vec<Lantern>, SourceError> {
        let raw: Vec<RawLantern> = self.get_list("/lantern/list").await?;
        Ok(normalize_lanterns(raw))
    }

    async fn update_admin_status(
        &self,
        email: &str,
        update: &AdminStatusUpdate,
    ) -> Result<(), SourceError> {
        let url = self.status_url(email)?;
        debug!("Updating admin status for {}", email);

        self.send(self.client.put(url).json(update)).await?;
        Ok(())
    }
}
