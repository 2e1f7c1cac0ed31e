//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the dashboard administration pages, the session endpoints and a
//! liveness probe under a single Axum router with request tracing.

pub mod auth;
pub mod dashboards;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use dashboards::DASHBOARD_ROUTE;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(DASHBOARD_ROUTE, get(dashboards::index).post(dashboards::create))
        .route(&format!("{DASHBOARD_ROUTE}/new"), get(dashboards::new_form))
        .route(
            &format!("{DASHBOARD_ROUTE}/{{id}}"),
            get(dashboards::edit_form).post(dashboards::update),
        )
        .route("/dev/session", post(auth::dev_sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
