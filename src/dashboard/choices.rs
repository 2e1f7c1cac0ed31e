//! Select-field choices for the dashboard form.
//!
//! Static lists are fixed here. Organisations and module types come from the
//! backing API at request time; when that fetch fails the list holds only the
//! empty choice and is not enforced during validation.

use serde::Serialize;

use crate::api::types::{ModuleType, Organisation};

pub const DASHBOARD_TYPES: &[(&str, &str)] = &[
    ("transaction", "Transaction"),
    ("high-volume-transaction", "High volume transaction"),
    ("service-group", "Service group"),
    ("agency", "Agency"),
    ("department", "Department"),
    ("content", "Content"),
    ("other", "Other"),
];

pub const STRAPLINES: &[(&str, &str)] = &[
    ("Dashboard", "Dashboard"),
    ("Service dashboard", "Service dashboard"),
    ("Content dashboard", "Content dashboard"),
    ("Performance", "Performance"),
    ("Policy dashboard", "Policy dashboard"),
    ("Public sector purchasing dashboard", "Public sector purchasing dashboard"),
];

pub const CUSTOMER_TYPES: &[(&str, &str)] = &[("", ""), ("Business", "Business"), ("Individuals", "Individuals")];

pub const BUSINESS_MODELS: &[(&str, &str)] = &[
    ("", ""),
    ("Department budget", "Department budget"),
    ("Fees and charges", "Fees and charges"),
    ("Taxpayers", "Taxpayers"),
    ("Fees and charges, and taxpayers", "Fees and charges, and taxpayers"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    fn empty() -> Self {
        Self::new("", "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormChoices {
    pub dashboard_types: Vec<Choice>,
    pub straplines: Vec<Choice>,
    pub customer_types: Vec<Choice>,
    pub business_models: Vec<Choice>,
    pub organisations: Vec<Choice>,
    pub organisations_loaded: bool,
    pub module_types: Vec<Choice>,
    pub module_types_loaded: bool,
}

impl FormChoices {
    /// Assemble choices; `None` marks a dynamic list that could not be fetched.
    #[must_use]
    pub fn new(organisations: Option<Vec<Organisation>>, module_types: Option<Vec<ModuleType>>) -> Self {
        let organisations_loaded = organisations.is_some();
        let mut org_choices: Vec<Choice> = organisations
            .unwrap_or_default()
            .into_iter()
            .map(|org| Choice::new(org.id.to_string(), org.name))
            .collect();
        org_choices.sort_by(|a, b| a.label.cmp(&b.label));
        org_choices.insert(0, Choice::empty());

        let module_types_loaded = module_types.is_some();
        let mut module_choices = vec![Choice::empty()];
        module_choices.extend(
            module_types
                .unwrap_or_default()
                .into_iter()
                .map(|t| Choice::new(t.id.to_string(), t.name)),
        );

        Self {
            dashboard_types: from_static(DASHBOARD_TYPES),
            straplines: from_static(STRAPLINES),
            customer_types: from_static(CUSTOMER_TYPES),
            business_models: from_static(BUSINESS_MODELS),
            organisations: org_choices,
            organisations_loaded,
            module_types: module_choices,
            module_types_loaded,
        }
    }
}

fn from_static(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(value, label)| Choice::new(*value, *label))
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn organisations_sorted_by_name_after_empty_choice() {
        let orgs = vec![
            Organisation { id: Uuid::new_v4(), name: "Home Office".into() },
            Organisation { id: Uuid::new_v4(), name: "Cabinet Office".into() },
        ];
        let choices = FormChoices::new(Some(orgs), None);
        let labels: Vec<&str> = choices
            .organisations
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["", "Cabinet Office", "Home Office"]);
        assert!(choices.organisations_loaded);
        assert!(!choices.module_types_loaded);
    }

    #[test]
    fn module_types_keep_api_order() {
        let kpi = ModuleType { id: Uuid::new_v4(), name: "kpi".into() };
        let bar = ModuleType { id: Uuid::new_v4(), name: "bar_chart".into() };
        let choices = FormChoices::new(None, Some(vec![kpi.clone(), bar.clone()]));
        assert_eq!(choices.module_types.len(), 3);
        assert_eq!(choices.module_types[1].value, kpi.id.to_string());
        assert_eq!(choices.module_types[2].value, bar.id.to_string());
    }

    #[test]
    fn unloaded_lists_hold_just_the_empty_choice() {
        let choices = FormChoices::new(None, None);
        assert_eq!(choices.organisations, vec![Choice::empty()]);
        assert_eq!(choices.module_types, vec![Choice::empty()]);
        assert_eq!(choices.dashboard_types.len(), DASHBOARD_TYPES.len());
    }
}
