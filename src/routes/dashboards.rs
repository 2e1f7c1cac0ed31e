//! Dashboard listing, create and edit routes.
//!
//! Pages are JSON view models: the form, its choices and pending flash
//! messages. POSTs always answer with a redirect (see `services::workflow`).

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::types::DashboardSummary;
use crate::dashboard::{DashboardForm, FormChoices};
use crate::routes::auth::AuthSession;
use crate::services::session::{DraftTarget, Flash, FlashLevel};
use crate::services::workflow::{self, PostOutcome, SignedIn};
use crate::state::AppState;

pub const DASHBOARD_ROUTE: &str = "/administer-dashboards";

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    /// Total module rows to show; extra rows are blank.
    pub modules: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub dashboards: Vec<DashboardSummary>,
    pub messages: Vec<Flash>,
}

#[derive(Debug, Serialize)]
pub struct FormPage {
    /// Where the form posts to.
    pub action: String,
    pub dashboard_id: Option<Uuid>,
    pub form: DashboardForm,
    pub choices: FormChoices,
    pub messages: Vec<Flash>,
}

fn form_path(target: DraftTarget) -> String {
    match target {
        DraftTarget::New => format!("{DASHBOARD_ROUTE}/new"),
        DraftTarget::Existing(id) => format!("{DASHBOARD_ROUTE}/{id}"),
    }
}

fn post_path(target: DraftTarget) -> String {
    match target {
        DraftTarget::New => DASHBOARD_ROUTE.to_owned(),
        DraftTarget::Existing(id) => format!("{DASHBOARD_ROUTE}/{id}"),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /administer-dashboards`: list dashboards.
pub async fn index(State(state): State<AppState>, AuthSession(who): AuthSession) -> Json<IndexPage> {
    let dashboards = match state.api.list_dashboards(&who.access_token).await {
        Ok(dashboards) => dashboards,
        Err(e) => {
            tracing::warn!(error = %e, "dashboard listing failed");
            state
                .sessions
                .flash(&who.session, FlashLevel::Danger, format!("Could not list dashboards: {}", e.user_message()))
                .await;
            Vec::new()
        }
    };
    let messages = state.sessions.take_flashes(&who.session).await;
    Json(IndexPage { dashboards, messages })
}

/// `GET /administer-dashboards/new`: blank or resumed create form.
pub async fn new_form(
    State(state): State<AppState>,
    AuthSession(who): AuthSession,
    Query(query): Query<FormQuery>,
) -> Response {
    render_form(&state, &who, DraftTarget::New, query.modules).await
}

/// `GET /administer-dashboards/:id`: edit form for an existing dashboard.
pub async fn edit_form(
    State(state): State<AppState>,
    AuthSession(who): AuthSession,
    Path(id): Path<Uuid>,
    Query(query): Query<FormQuery>,
) -> Response {
    render_form(&state, &who, DraftTarget::Existing(id), query.modules).await
}

/// `POST /administer-dashboards`: create workflow.
pub async fn create(
    State(state): State<AppState>,
    AuthSession(who): AuthSession,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    handle_post(&state, &who, DraftTarget::New, &fields).await
}

/// `POST /administer-dashboards/:id`: update workflow.
pub async fn update(
    State(state): State<AppState>,
    AuthSession(who): AuthSession,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    handle_post(&state, &who, DraftTarget::Existing(id), &fields).await
}

// =============================================================================
// SHARED
// =============================================================================

async fn render_form(state: &AppState, who: &SignedIn, target: DraftTarget, modules: Option<usize>) -> Response {
    let form = match workflow::load_form(state, who, target, modules).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "dashboard form load failed");
            state
                .sessions
                .flash(&who.session, FlashLevel::Danger, e.to_string())
                .await;
            return Redirect::to(DASHBOARD_ROUTE).into_response();
        }
    };

    let (choices, warnings) = workflow::load_choices(state, who).await;
    let mut messages = state.sessions.take_flashes(&who.session).await;
    messages.extend(
        warnings
            .into_iter()
            .map(|message| Flash { level: FlashLevel::Warning, message }),
    );

    let dashboard_id = match target {
        DraftTarget::New => None,
        DraftTarget::Existing(id) => Some(id),
    };
    Json(FormPage { action: post_path(target), dashboard_id, form, choices, messages }).into_response()
}

async fn handle_post(state: &AppState, who: &SignedIn, target: DraftTarget, fields: &[(String, String)]) -> Redirect {
    match workflow::handle_post(state, who, target, fields).await {
        PostOutcome::Edited { modules: Some(total) } => {
            Redirect::to(&format!("{}?modules={total}", form_path(target)))
        }
        PostOutcome::Edited { modules: None } | PostOutcome::Rejected => Redirect::to(&form_path(target)),
        PostOutcome::Saved { .. } => Redirect::to(DASHBOARD_ROUTE),
    }
}

#[cfg(test)]
#[path = "dashboards_test.rs"]
mod tests;
