//! reqwest-backed [`ChecklistApi`] implementation.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Request, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ChecklistApi, Endpoint};
use crate::config::Config;
use crate::display::truncate;
use crate::errors::{ChecklistError, ChecklistResult};
use crate::models::{
    CategoryMap, Document, Envelope, ImportantLink, Metadata, PermitType, ProfileMap, ProgressSummary, UserSettings,
};
use crate::selection::ProfileSelection;

/// Characters of an error response body kept in [`ChecklistError::HttpStatus`]
const ERROR_BODY_CHARS: usize = 200;

/// HTTP client for the checklist backend.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpApi {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    /// Client rooted at `base_url` (which should end in `/`).
    pub fn new(base_url: Url) -> ChecklistResult<Self> {
        Ok(HttpApi {
            http: build_client()?,
            base_url,
        })
    }

    /// Client for the configured API base
    pub fn from_config(cfg: &Config) -> ChecklistResult<Self> {
        Self::new(cfg.api_base()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint, with ids percent-encoded as path segments.
    pub fn url_for(&self, endpoint: &Endpoint) -> ChecklistResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ChecklistError::config(format!("API base '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        if let Some((key, value)) = endpoint.query() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        Ok(url)
    }

    /// Build the request for an endpoint without sending it.
    pub fn build_request(&self, endpoint: &Endpoint) -> ChecklistResult<Request> {
        let url = self.url_for(endpoint)?;
        let mut builder = self.http.request(endpoint.method(), url);
        if let Some(body) = endpoint.body() {
            builder = builder.json(&body);
        }
        builder
            .build()
            .map_err(|e| ChecklistError::invalid_input("request", endpoint.to_string(), e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> ChecklistResult<Envelope<T>> {
        let request = self.build_request(endpoint)?;
        debug!(method = %request.method(), url = %request.url(), "api request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ChecklistError::network(endpoint.to_string(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChecklistError::http_status(
                endpoint.to_string(),
                status.as_u16(),
                truncate(body.trim(), ERROR_BODY_CHARS),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ChecklistError::network(endpoint.to_string(), e.to_string()))?;
        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| ChecklistError::decode(endpoint.to_string(), e.to_string()))?;

        if !envelope.success {
            return Err(ChecklistError::rejected(endpoint.to_string(), envelope.error));
        }
        Ok(envelope)
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> ChecklistResult<Envelope<T>> {
        let result = self.send(endpoint).await;
        if let Err(e) = &result {
            warn!(endpoint = %endpoint, code = e.error_code(), error = %e, "api call failed");
        }
        result
    }

    /// GET that must carry `data`
    async fn query<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ChecklistResult<T> {
        let envelope = self.call::<T>(&endpoint).await?;
        envelope.data.ok_or_else(|| {
            let err = ChecklistError::missing_data(endpoint.to_string());
            warn!(endpoint = %endpoint, code = err.error_code(), "api call failed");
            err
        })
    }

    /// POST whose reply only needs `success: true`
    async fn command(&self, endpoint: Endpoint) -> ChecklistResult<()> {
        self.call::<Value>(&endpoint).await.map(|_| ())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> ChecklistResult<Client> {
    Client::builder()
        .user_agent(format!("permit-checklist/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ChecklistError::config(format!("Failed to create HTTP client: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> ChecklistResult<Client> {
    Ok(Client::new())
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChecklistApi for HttpApi {
    async fn categories(&self) -> ChecklistResult<CategoryMap> {
        self.query(Endpoint::Categories).await
    }

    async fn profiles(&self) -> ChecklistResult<ProfileMap> {
        self.query(Endpoint::Profiles).await
    }

    async fn permit_types(&self) -> ChecklistResult<Vec<PermitType>> {
        self.query(Endpoint::PermitTypes).await
    }

    async fn important_links(&self) -> ChecklistResult<Vec<ImportantLink>> {
        self.query(Endpoint::ImportantLinks).await
    }

    async fn metadata(&self) -> ChecklistResult<Metadata> {
        self.query(Endpoint::Metadata).await
    }

    async fn user_settings(&self) -> ChecklistResult<UserSettings> {
        self.query(Endpoint::UserSettings).await
    }

    async fn documents(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<Vec<Document>> {
        self.query(Endpoint::Documents {
            permit_id: permit_id.to_string(),
            profiles: profiles.clone(),
        })
        .await
    }

    async fn progress(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<ProgressSummary> {
        self.query(Endpoint::Progress {
            permit_id: permit_id.to_string(),
            profiles: profiles.clone(),
        })
        .await
    }

    async fn mark_complete(&self, document_id: &str) -> ChecklistResult<()> {
        self.command(Endpoint::Complete {
            document_id: document_id.to_string(),
        })
        .await
    }

    async fn mark_incomplete(&self, document_id: &str) -> ChecklistResult<()> {
        self.command(Endpoint::Incomplete {
            document_id: document_id.to_string(),
        })
        .await
    }

    async fn update_notes(&self, document_id: &str, notes: &str) -> ChecklistResult<()> {
        self.command(Endpoint::Notes {
            document_id: document_id.to_string(),
            notes: notes.to_string(),
        })
        .await
    }

    async fn update_due_date(&self, document_id: &str, due_date: Option<NaiveDate>) -> ChecklistResult<()> {
        self.command(Endpoint::DueDate {
            document_id: document_id.to_string(),
            due_date,
        })
        .await
    }

    async fn save_profiles(&self, profiles: &ProfileSelection) -> ChecklistResult<()> {
        self.command(Endpoint::SaveProfiles {
            profiles: profiles.clone(),
        })
        .await
    }

    async fn reset(&self, permit_id: &str) -> ChecklistResult<()> {
        self.command(Endpoint::Reset {
            permit_id: permit_id.to_string(),
        })
        .await
    }
}
