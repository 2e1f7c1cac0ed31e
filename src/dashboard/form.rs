//! Typed dashboard form.
//!
//! DESIGN
//! ======
//! The form holds exactly what the browser submits: every field is text
//! except `published`. Parsing JSON-bearing fields and ids happens in
//! `convert`, so a half-edited draft with malformed JSON can still be stored
//! in the session and shown back to the user.
//!
//! Module rows arrive as `modules-<i>-<field>`. The `<i>` prefix is only the
//! row's position on the page; the persisted module id travels separately in
//! `modules-<i>-uuid`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::choices::{Choice, FormChoices};
use crate::config::parse_bool;

/// Upper bound on module rows a dashboard may be saved with.
pub const MAX_MODULES: usize = 200;

const MODULE_FIELD_PREFIX: &str = "modules-";
const EMPTY_JSON_OBJECT: &str = "{}";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardForm {
    pub dashboard_type: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub owning_organisation: String,
    pub customer_type: String,
    pub business_model: String,
    pub strapline: String,
    pub costs: String,
    pub other_notes: String,
    pub transaction_title: String,
    pub transaction_link: String,
    pub published: bool,
    pub modules: Vec<ModuleForm>,
}

/// One module row of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleForm {
    /// Persisted module id; empty for modules not yet saved.
    pub uuid: String,
    pub module_type: String,
    pub data_group: String,
    pub data_type: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    /// JSON list of strings, or empty.
    pub info: String,
    /// JSON object.
    pub query_parameters: String,
    /// JSON object.
    pub options: String,
}

impl Default for ModuleForm {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            module_type: String::new(),
            data_group: String::new(),
            data_type: String::new(),
            slug: String::new(),
            title: String::new(),
            description: String::new(),
            info: String::new(),
            query_parameters: EMPTY_JSON_OBJECT.into(),
            options: EMPTY_JSON_OBJECT.into(),
        }
    }
}

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// PARSING
// =============================================================================

impl DashboardForm {
    /// Build a form from submitted url-encoded pairs.
    ///
    /// Unknown names (including action buttons) are ignored. Module rows are
    /// ordered by their submitted index; gaps left by removed rows collapse.
    /// Every submitted row is kept; `validate` rejects lists over
    /// `MAX_MODULES`.
    #[must_use]
    pub fn from_fields(fields: &[(String, String)]) -> Self {
        let mut form = Self::default();
        let mut modules: BTreeMap<usize, ModuleForm> = BTreeMap::new();

        for (name, value) in fields {
            if let Some((index, field)) = module_field(name) {
                let module = modules.entry(index).or_default();
                set_module_field(module, field, value);
                continue;
            }
            form.set_field(name, value);
        }

        form.modules = modules.into_values().collect();
        form
    }

    fn set_field(&mut self, name: &str, value: &str) {
        let slot = match name {
            "dashboard_type" => &mut self.dashboard_type,
            "slug" => &mut self.slug,
            "title" => &mut self.title,
            "description" => &mut self.description,
            "owning_organisation" => &mut self.owning_organisation,
            "customer_type" => &mut self.customer_type,
            "business_model" => &mut self.business_model,
            "strapline" => &mut self.strapline,
            "costs" => &mut self.costs,
            "other_notes" => &mut self.other_notes,
            "transaction_title" => &mut self.transaction_title,
            "transaction_link" => &mut self.transaction_link,
            "published" => {
                self.published = parse_bool(value).unwrap_or(false);
                return;
            }
            _ => return,
        };
        value.clone_into(slot);
    }

    /// Pad the module list with empty rows until it holds `total` entries.
    pub fn ensure_module_count(&mut self, total: usize) {
        let total = total.min(MAX_MODULES);
        if self.modules.len() < total {
            self.modules.resize_with(total, ModuleForm::default);
        }
    }

    /// Check required fields and select choices.
    #[must_use]
    pub fn validate(&self, choices: &FormChoices) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_choice(&mut errors, "Dashboard type", &self.dashboard_type, &choices.dashboard_types);
        check_choice(&mut errors, "Strapline", &self.strapline, &choices.straplines);
        check_choice(&mut errors, "Customer type", &self.customer_type, &choices.customer_types);
        check_choice(&mut errors, "Business model", &self.business_model, &choices.business_models);

        if self.owning_organisation.trim().is_empty() {
            errors.push(FieldError {
                field: "Owning organisation".into(),
                message: "This field cannot be blank.".into(),
            });
        } else if choices.organisations_loaded {
            check_choice(&mut errors, "Owning organisation", &self.owning_organisation, &choices.organisations);
        }

        if self.modules.len() > MAX_MODULES {
            errors.push(FieldError {
                field: "Modules".into(),
                message: format!("too many modules, at most {MAX_MODULES} allowed"),
            });
        } else if choices.module_types_loaded {
            for (index, module) in self.modules.iter().enumerate() {
                let field = format!("Module {} type", index + 1);
                check_choice(&mut errors, &field, &module.module_type, &choices.module_types);
            }
        }

        errors
    }
}

/// Split `modules-<i>-<field>` into its index and field name.
fn module_field(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix(MODULE_FIELD_PREFIX)?;
    let (index, field) = rest.split_once('-')?;
    let index = index.parse::<usize>().ok()?;
    Some((index, field))
}

fn set_module_field(module: &mut ModuleForm, field: &str, value: &str) {
    let slot = match field {
        "uuid" => &mut module.uuid,
        "module_type" => &mut module.module_type,
        "data_group" => &mut module.data_group,
        "data_type" => &mut module.data_type,
        "slug" => &mut module.slug,
        "title" => &mut module.title,
        "description" => &mut module.description,
        "info" => &mut module.info,
        "query_parameters" => &mut module.query_parameters,
        "options" => &mut module.options,
        _ => return,
    };
    value.clone_into(slot);
}

fn check_choice(errors: &mut Vec<FieldError>, field: &str, value: &str, choices: &[Choice]) {
    if !choices.iter().any(|c| c.value == value) {
        errors.push(FieldError { field: field.to_owned(), message: "Not a valid choice".into() });
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
