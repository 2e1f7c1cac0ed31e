//! Wire types for the backing dashboard API.
//!
//! Records (`Dashboard`, `ModuleRecord`, ...) mirror what the API returns.
//! Payloads (`DashboardPayload`, `ModulePayload`) mirror what it accepts on
//! create and update. The two shapes differ on purpose: the API nests module
//! types and organisations on the way out but takes flat ids on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Link type that marks a dashboard's single outbound transaction link.
pub const TRANSACTION_LINK_TYPE: &str = "transaction";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backing API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Message suitable for showing to an administrator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A dashboard as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: Uuid,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dashboard_type: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub strapline: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub business_model: Option<String>,
    #[serde(default)]
    pub costs: Option<String>,
    #[serde(default)]
    pub other_notes: Option<String>,
    #[serde(default)]
    pub organisation: Option<OrganisationRef>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: String,
}

impl Link {
    #[must_use]
    pub fn is_transaction(&self) -> bool {
        self.link_type == TRANSACTION_LINK_TYPE
    }
}

/// Treat an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A module as returned inside a dashboard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub module_type: ModuleTypeRef,
    #[serde(default)]
    pub data_group: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: Vec<String>,
    #[serde(default)]
    pub query_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTypeRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

/// Row of the dashboard listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: Uuid,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleType {
    pub id: Uuid,
    pub name: String,
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Body sent on dashboard create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub published: bool,
    #[serde(rename = "page-type")]
    pub page_type: &'static str,
    #[serde(rename = "dashboard-type")]
    pub dashboard_type: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub organisation: Option<Uuid>,
    pub customer_type: String,
    pub business_model: String,
    pub strapline: String,
    pub costs: String,
    pub other_notes: String,
    pub links: Vec<Link>,
    pub modules: Vec<ModulePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub type_id: String,
    pub data_group: Option<String>,
    pub data_type: Option<String>,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub info: Vec<String>,
    pub options: Map<String, Value>,
    pub query_parameters: Map<String, Value>,
    pub order: u32,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
