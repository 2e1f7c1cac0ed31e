//! Backing API client.
//!
//! DESIGN
//! ======
//! Handlers and the workflow only see the `AdminApi` trait so tests can swap
//! in a recording mock. `StagecraftClient` is the reqwest implementation used
//! in production. Every call carries the signed-in user's bearer token.

pub mod stagecraft;
pub mod types;

use uuid::Uuid;

pub use stagecraft::StagecraftClient;
use types::{ApiError, Dashboard, DashboardPayload, DashboardSummary, ModuleType, Organisation};

#[async_trait::async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_dashboards(&self, token: &str) -> Result<Vec<DashboardSummary>, ApiError>;

    async fn get_dashboard(&self, token: &str, id: Uuid) -> Result<Dashboard, ApiError>;

    async fn create_dashboard(&self, token: &str, payload: &DashboardPayload) -> Result<Dashboard, ApiError>;

    async fn update_dashboard(
        &self,
        token: &str,
        id: Uuid,
        payload: &DashboardPayload,
    ) -> Result<Dashboard, ApiError>;

    async fn list_organisations(&self, token: &str) -> Result<Vec<Organisation>, ApiError>;

    async fn list_module_types(&self, token: &str) -> Result<Vec<ModuleType>, ApiError>;
}
