//! Session store: access tokens, the pending dashboard draft, flash messages.
//!
//! ARCHITECTURE
//! ============
//! Sessions live in memory behind a single `RwLock`, keyed by a random hex
//! token carried in the session cookie. Each session owns at most one draft,
//! tagged with the dashboard it edits (or `New`), so a draft for one
//! dashboard is never resumed while editing another.
//!
//! TRADE-OFFS
//! ==========
//! Nothing survives a restart. Idle sessions expire after the configured TTL
//! and are pruned whenever a new session is created.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dashboard::DashboardForm;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Which dashboard a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    New,
    Existing(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub target: DraftTarget,
    pub form: DashboardForm,
}

struct SessionData {
    access_token: String,
    draft: Option<Draft>,
    flashes: Vec<Flash>,
    last_seen: Instant,
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    /// Open a session for a signed-in user, returning its token.
    pub async fn create(&self, access_token: impl Into<String>) -> String {
        let token = generate_token();
        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "expired sessions pruned");
        }
        sessions.insert(
            token.clone(),
            SessionData { access_token: access_token.into(), draft: None, flashes: Vec::new(), last_seen: Instant::now() },
        );
        tracing::debug!(active = sessions.len(), "session created");
        token
    }

    /// Look up a live session's access token and refresh its idle timer.
    pub async fn access_token(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token)?;
        if session.last_seen.elapsed() > self.ttl {
            sessions.remove(token);
            return None;
        }
        session.last_seen = Instant::now();
        Some(session.access_token.clone())
    }

    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Return the session's draft if it belongs to `target`.
    pub async fn resume_draft(&self, token: &str, target: DraftTarget) -> Option<DashboardForm> {
        let sessions = self.sessions.read().await;
        let draft = sessions.get(token)?.draft.as_ref()?;
        (draft.target == target).then(|| draft.form.clone())
    }

    /// Store `form` as the session's draft, replacing any previous one.
    pub async fn save_draft(&self, token: &str, target: DraftTarget, form: DashboardForm) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.draft = Some(Draft { target, form });
        }
    }

    pub async fn clear_draft(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.draft = None;
        }
    }

    pub async fn flash(&self, token: &str, level: FlashLevel, message: impl Into<String>) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.flashes.push(Flash { level, message: message.into() });
        }
    }

    /// Drain pending flash messages.
    pub async fn take_flashes(&self, token: &str) -> Vec<Flash> {
        self.sessions
            .write()
            .await
            .get_mut(token)
            .map(|s| std::mem::take(&mut s.flashes))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
