//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the draft workflow and session state so route
//! handlers can stay focused on request parsing, redirects and cookies.

pub mod session;
pub mod workflow;
