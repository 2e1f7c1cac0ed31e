//! Dashboard form model and its conversions to and from the backing API.

pub mod action;
pub mod choices;
pub mod convert;
pub mod form;

pub use action::FormAction;
pub use choices::FormChoices;
pub use form::DashboardForm;
