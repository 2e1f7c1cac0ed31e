//! Stagecraft admin API client.
//!
//! Thin reqwest wrapper over the dashboard endpoints. Response handling is
//! split into pure functions (`parse_body`, `error_message`) for testability.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::AdminApi;
use super::types::{ApiError, Dashboard, DashboardPayload, DashboardSummary, ModuleType, Organisation};
use crate::config::ApiTimeouts;

// =============================================================================
// CLIENT
// =============================================================================

pub struct StagecraftClient {
    http: reqwest::Client,
    base_url: String,
}

impl StagecraftClient {
    /// Build a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeouts: ApiTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http
            .request(method, endpoint(&self.base_url, path))
            .bearer_auth(token)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backing API rejected request");
            return Err(ApiError::Status { status: status.as_u16(), message: error_message(status.as_u16(), &text) });
        }

        parse_body(&text)
    }
}

#[async_trait::async_trait]
impl AdminApi for StagecraftClient {
    async fn list_dashboards(&self, token: &str) -> Result<Vec<DashboardSummary>, ApiError> {
        self.send(self.request(Method::GET, "/dashboards", token))
            .await
    }

    async fn get_dashboard(&self, token: &str, id: Uuid) -> Result<Dashboard, ApiError> {
        self.send(self.request(Method::GET, &format!("/dashboard/{id}"), token))
            .await
    }

    async fn create_dashboard(&self, token: &str, payload: &DashboardPayload) -> Result<Dashboard, ApiError> {
        self.send(self.request(Method::POST, "/dashboard", token).json(payload))
            .await
    }

    async fn update_dashboard(
        &self,
        token: &str,
        id: Uuid,
        payload: &DashboardPayload,
    ) -> Result<Dashboard, ApiError> {
        self.send(
            self.request(Method::PUT, &format!("/dashboard/{id}"), token)
                .json(payload),
        )
        .await
    }

    async fn list_organisations(&self, token: &str) -> Result<Vec<Organisation>, ApiError> {
        self.send(self.request(Method::GET, "/organisation/node", token))
            .await
    }

    async fn list_module_types(&self, token: &str) -> Result<Vec<ModuleType>, ApiError> {
        self.send(self.request(Method::GET, "/module-type", token))
            .await
    }
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull the human-readable message out of an error response.
///
/// The API reports failures as `{"status": "error", "message": "..."}`. Bodies
/// without a message fall back to the raw text, then to the status code.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        });

    match from_json {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_owned(),
        _ => format!("status {status}"),
    }
}

#[cfg(test)]
#[path = "stagecraft_test.rs"]
mod tests;
