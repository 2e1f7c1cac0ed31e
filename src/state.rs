//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the backing API client behind the `AdminApi` trait and the
//! in-memory session store that carries each user's dashboard draft.

use std::sync::Arc;

use crate::api::AdminApi;
use crate::config::DevAuth;
use crate::services::session::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn AdminApi>,
    pub sessions: SessionStore,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Development sign-in; `None` disables `POST /dev/session`.
    pub dev_auth: Option<DevAuth>,
}

impl AppState {
    #[must_use]
    pub fn new(api: Arc<dyn AdminApi>, sessions: SessionStore, cookie_secure: bool, dev_auth: Option<DevAuth>) -> Self {
        Self { api, sessions, cookie_secure, dev_auth }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
