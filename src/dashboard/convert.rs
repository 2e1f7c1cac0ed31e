//! Conversion between API dashboard records and the dashboard form.
//!
//! DESIGN
//! ======
//! `dashboard_to_form` flattens a record for editing: nested module types and
//! organisations become plain ids, JSON sub-objects become text. The reverse,
//! `form_to_payload`, parses that text back and numbers modules by position.
//!
//! ERROR HANDLING
//! ==============
//! Payload conversion reports every bad module field at once so the user can
//! fix them in one pass. Record conversion fails only on ambiguous links.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::form::{DashboardForm, ModuleForm};
use crate::api::types::{Dashboard, DashboardPayload, Link, ModulePayload, ModuleRecord, TRANSACTION_LINK_TYPE};

const PAGE_TYPE: &str = "dashboard";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("Dashboards cannot have more than 1 transaction link")]
    MultipleTransactionLinks,
    #[error("Module {module}: Info must be a list")]
    InfoNotList { module: usize },
    #[error("Module {module}: Info must all be strings")]
    InfoNotStrings { module: usize },
    #[error("Module {module}: {field} must be a JSON object")]
    NotAnObject { module: usize, field: &'static str },
    #[error("Module {module}: {field} is not valid JSON ({detail})")]
    InvalidJson { module: usize, field: &'static str, detail: String },
    #[error("Module {module}: invalid module id")]
    InvalidModuleId { module: usize },
    #[error("Owning organisation is not a valid id")]
    InvalidOrganisation,
}

// =============================================================================
// API -> FORM
// =============================================================================

/// Flatten an API dashboard record into an editable form.
///
/// # Errors
///
/// Returns [`ConvertError::MultipleTransactionLinks`] if the record carries
/// more than one link of type `transaction`.
pub fn dashboard_to_form(record: Dashboard) -> Result<DashboardForm, ConvertError> {
    let mut transaction_links = record.links.iter().filter(|l| l.is_transaction());
    let transaction = transaction_links.next();
    if transaction_links.next().is_some() {
        return Err(ConvertError::MultipleTransactionLinks);
    }
    let (transaction_title, transaction_link) = transaction
        .map(|l| (l.title.clone(), l.url.clone()))
        .unwrap_or_default();

    Ok(DashboardForm {
        dashboard_type: record.dashboard_type.unwrap_or_default(),
        slug: record.slug,
        title: record.title,
        description: record.description.unwrap_or_default(),
        owning_organisation: record
            .organisation
            .map(|org| org.id.to_string())
            .unwrap_or_default(),
        customer_type: record.customer_type.unwrap_or_default(),
        business_model: record.business_model.unwrap_or_default(),
        strapline: record.strapline.unwrap_or_default(),
        costs: record.costs.unwrap_or_default(),
        other_notes: record.other_notes.unwrap_or_default(),
        transaction_title,
        transaction_link,
        published: record.published,
        modules: record
            .modules
            .into_iter()
            .map(module_to_form)
            .collect(),
    })
}

fn module_to_form(module: ModuleRecord) -> ModuleForm {
    ModuleForm {
        uuid: module.id.to_string(),
        module_type: module.module_type.id.to_string(),
        data_group: module.data_group.unwrap_or_default(),
        data_type: module.data_type.unwrap_or_default(),
        slug: module.slug,
        title: module.title,
        description: module.description.unwrap_or_default(),
        info: Value::from(module.info).to_string(),
        query_parameters: object_text(module.query_parameters),
        options: object_text(module.options),
    }
}

fn object_text(object: Option<Map<String, Value>>) -> String {
    Value::Object(object.unwrap_or_default()).to_string()
}

// =============================================================================
// FORM -> API
// =============================================================================

/// Build the create/update payload from a form.
///
/// # Errors
///
/// Returns every conversion failure found across the dashboard and its modules.
pub fn form_to_payload(form: &DashboardForm) -> Result<DashboardPayload, Vec<ConvertError>> {
    let mut errors = Vec::new();

    let organisation = match form.owning_organisation.trim() {
        "" => None,
        raw => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(ConvertError::InvalidOrganisation);
                None
            }
        },
    };

    let mut modules = Vec::with_capacity(form.modules.len());
    for (index, module) in form.modules.iter().enumerate() {
        match module_to_payload(module, index + 1) {
            Ok(payload) => modules.push(payload),
            Err(mut module_errors) => errors.append(&mut module_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(DashboardPayload {
        published: form.published,
        page_type: PAGE_TYPE,
        dashboard_type: form.dashboard_type.clone(),
        slug: form.slug.clone(),
        title: form.title.clone(),
        description: form.description.clone(),
        organisation,
        customer_type: form.customer_type.clone(),
        business_model: form.business_model.clone(),
        strapline: form.strapline.clone(),
        costs: form.costs.clone(),
        other_notes: form.other_notes.clone(),
        links: transaction_links(form),
        modules,
    })
}

/// Convert one module row; `order` is its 1-based position.
fn module_to_payload(module: &ModuleForm, order: usize) -> Result<ModulePayload, Vec<ConvertError>> {
    let id = match module.uuid.trim() {
        "" => Ok(None),
        raw => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| ConvertError::InvalidModuleId { module: order }),
    };
    let info = parse_info(&module.info, order);
    let options = parse_object(&module.options, "Options", order);
    let query_parameters = parse_object(&module.query_parameters, "Query parameters", order);

    match (id, info, options, query_parameters) {
        (Ok(id), Ok(info), Ok(options), Ok(query_parameters)) => Ok(ModulePayload {
            id,
            type_id: module.module_type.clone(),
            data_group: non_empty(&module.data_group),
            data_type: non_empty(&module.data_type),
            slug: module.slug.clone(),
            title: module.title.clone(),
            description: module.description.clone(),
            info,
            options,
            query_parameters,
            order: u32::try_from(order).unwrap_or(u32::MAX),
        }),
        (id, info, options, query_parameters) => Err([id.err(), info.err(), options.err(), query_parameters.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

/// Parse the `info` text of module number `module`.
///
/// Empty text is an empty list; anything else must be a JSON list of strings.
///
/// # Errors
///
/// Returns `InfoNotList` or `InfoNotStrings` when the text has the wrong shape.
pub fn parse_info(raw: &str, module: usize) -> Result<Vec<String>, ConvertError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
        return Err(ConvertError::InfoNotList { module });
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(ConvertError::InfoNotStrings { module }),
        })
        .collect()
}

/// Parse a JSON object field; empty text is an empty object.
///
/// # Errors
///
/// Returns `InvalidJson` for unparseable text and `NotAnObject` for other JSON values.
pub fn parse_object(raw: &str, field: &'static str, module: usize) -> Result<Map<String, Value>, ConvertError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConvertError::NotAnObject { module, field }),
        Err(e) => Err(ConvertError::InvalidJson { module, field, detail: e.to_string() }),
    }
}

fn transaction_links(form: &DashboardForm) -> Vec<Link> {
    if form.transaction_title.trim().is_empty() && form.transaction_link.trim().is_empty() {
        return Vec::new();
    }
    vec![Link {
        title: form.transaction_title.clone(),
        url: form.transaction_link.clone(),
        link_type: TRANSACTION_LINK_TYPE.to_owned(),
    }]
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_owned()) }
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
