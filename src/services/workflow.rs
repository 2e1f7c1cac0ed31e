//! Dashboard editing workflow.
//!
//! DESIGN
//! ======
//! A draft moves through: none → new or edit → committed. Loading a form
//! resumes the session draft when it targets the same dashboard, otherwise
//! starts blank (create) or from the API record (edit). A POST is either a
//! structural action, which only rewrites the draft, or a submit, which
//! validates, converts and calls the API.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Validation, conversion and upstream failures are
//! flashed against the session and the submitted form is kept as the draft
//! so the user lands back on their own input.

use uuid::Uuid;

use crate::api::types::ApiError;
use crate::dashboard::convert::{self, ConvertError};
use crate::dashboard::{DashboardForm, FormAction, FormChoices};
use crate::services::session::{DraftTarget, FlashLevel};
use crate::state::AppState;

/// A signed-in session: cookie token plus the user's API bearer token.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: String,
    pub access_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Could not load dashboard: {}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("Could not edit dashboard: {0}")]
    Convert(#[from] ConvertError),
}

/// Result of handling a POST against the dashboard form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The draft was restructured; show the form again, padded to `modules` rows if set.
    Edited { modules: Option<usize> },
    /// The dashboard was created or updated upstream.
    Saved { slug: String },
    /// Submission failed; errors were flashed and the draft kept.
    Rejected,
}

// =============================================================================
// LOAD
// =============================================================================

/// Build the form shown for `target`, padded to `modules` rows when requested.
///
/// # Errors
///
/// Returns an error when an existing dashboard cannot be fetched or converted.
pub async fn load_form(
    state: &AppState,
    who: &SignedIn,
    target: DraftTarget,
    modules: Option<usize>,
) -> Result<DashboardForm, LoadError> {
    let mut form = match state.sessions.resume_draft(&who.session, target).await {
        Some(form) => form,
        None => match target {
            DraftTarget::New => DashboardForm::default(),
            DraftTarget::Existing(id) => {
                let form = fetch_for_edit(state, who, id).await?;
                state
                    .sessions
                    .save_draft(&who.session, target, form.clone())
                    .await;
                form
            }
        },
    };

    if let Some(total) = modules {
        form.ensure_module_count(total);
    }
    Ok(form)
}

async fn fetch_for_edit(state: &AppState, who: &SignedIn, id: Uuid) -> Result<DashboardForm, LoadError> {
    let record = state.api.get_dashboard(&who.access_token, id).await?;
    let form = convert::dashboard_to_form(record)?;
    tracing::info!(dashboard_id = %id, slug = %form.slug, "dashboard loaded for edit");
    Ok(form)
}

/// Fetch organisation and module-type choices.
///
/// Lists that fail to load are left empty and reported as warnings.
pub async fn load_choices(state: &AppState, who: &SignedIn) -> (FormChoices, Vec<String>) {
    let (organisations, module_types) = tokio::join!(
        state.api.list_organisations(&who.access_token),
        state.api.list_module_types(&who.access_token),
    );

    let mut warnings = Vec::new();
    let organisations = organisations
        .map_err(|e| {
            tracing::warn!(error = %e, "organisation choices unavailable");
            warnings.push(format!("Could not load organisations: {}", e.user_message()));
        })
        .ok();
    let module_types = module_types
        .map_err(|e| {
            tracing::warn!(error = %e, "module type choices unavailable");
            warnings.push(format!("Could not load module types: {}", e.user_message()));
        })
        .ok();

    (FormChoices::new(organisations, module_types), warnings)
}

// =============================================================================
// POST
// =============================================================================

/// Handle a submitted dashboard form for `target`.
pub async fn handle_post(
    state: &AppState,
    who: &SignedIn,
    target: DraftTarget,
    fields: &[(String, String)],
) -> PostOutcome {
    let action = FormAction::from_fields(fields);
    let mut form = DashboardForm::from_fields(fields);

    match action {
        FormAction::Submit => submit(state, who, target, form).await,
        FormAction::AddModule => {
            let modules = form.modules.len() + 1;
            state.sessions.save_draft(&who.session, target, form).await;
            PostOutcome::Edited { modules: Some(modules) }
        }
        structural => {
            structural.apply(&mut form);
            tracing::debug!(action = ?structural, modules = form.modules.len(), "draft restructured");
            state.sessions.save_draft(&who.session, target, form).await;
            PostOutcome::Edited { modules: None }
        }
    }
}

async fn submit(state: &AppState, who: &SignedIn, target: DraftTarget, form: DashboardForm) -> PostOutcome {
    let (choices, warnings) = load_choices(state, who).await;
    for warning in warnings {
        let text = format!("{warning}. Those choices were not checked for this save.");
        state
            .sessions
            .flash(&who.session, FlashLevel::Warning, text)
            .await;
    }

    let field_errors = form.validate(&choices);
    if !field_errors.is_empty() {
        let messages = field_errors.iter().map(ToString::to_string).collect();
        return reject(state, who, target, form, messages).await;
    }

    let payload = match convert::form_to_payload(&form) {
        Ok(payload) => payload,
        Err(errors) => {
            let messages = errors.iter().map(ToString::to_string).collect();
            return reject(state, who, target, form, messages).await;
        }
    };

    let result = match target {
        DraftTarget::New => state.api.create_dashboard(&who.access_token, &payload).await,
        DraftTarget::Existing(id) => {
            state
                .api
                .update_dashboard(&who.access_token, id, &payload)
                .await
        }
    };

    match result {
        Ok(saved) => {
            tracing::info!(dashboard_id = %saved.id, slug = %form.slug, "dashboard saved");
            state.sessions.clear_draft(&who.session).await;
            let message = format!("{} the {} dashboard", past_tense(target), form.slug);
            state
                .sessions
                .flash(&who.session, FlashLevel::Success, message)
                .await;
            PostOutcome::Saved { slug: form.slug }
        }
        Err(e) => {
            tracing::warn!(error = %e, slug = %form.slug, "dashboard save rejected");
            reject(state, who, target, form, vec![e.user_message()]).await
        }
    }
}

async fn reject(
    state: &AppState,
    who: &SignedIn,
    target: DraftTarget,
    form: DashboardForm,
    messages: Vec<String>,
) -> PostOutcome {
    let verb = progressive(target);
    for message in messages {
        let text = format!("Error {verb} the {} dashboard: {message}", form.slug);
        state
            .sessions
            .flash(&who.session, FlashLevel::Danger, text)
            .await;
    }
    state.sessions.save_draft(&who.session, target, form).await;
    PostOutcome::Rejected
}

fn past_tense(target: DraftTarget) -> &'static str {
    match target {
        DraftTarget::New => "Created",
        DraftTarget::Existing(_) => "Updated",
    }
}

fn progressive(target: DraftTarget) -> &'static str {
    match target {
        DraftTarget::New => "creating",
        DraftTarget::Existing(_) => "updating",
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
