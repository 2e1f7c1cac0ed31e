use super::*;

const EXAMPLE_DASHBOARD: &str = include_str!("fixtures/example_dashboard.json");

// =============================================================================
// Dashboard record
// =============================================================================

#[test]
fn dashboard_record_parses_nested_modules() {
    let dashboard: Dashboard = serde_json::from_str(EXAMPLE_DASHBOARD).unwrap();
    assert_eq!(dashboard.slug, "carers-allowance");
    assert_eq!(dashboard.dashboard_type.as_deref(), Some("transaction"));
    assert!(dashboard.published);
    assert_eq!(dashboard.modules.len(), 2);
    assert_eq!(dashboard.modules[0].module_type.name.as_deref(), Some("kpi"));
    assert_eq!(dashboard.modules[0].info, vec!["Data source: Department for Work and Pensions"]);
}

#[test]
fn dashboard_record_tolerates_nulls() {
    let dashboard: Dashboard = serde_json::from_str(EXAMPLE_DASHBOARD).unwrap();
    let section = &dashboard.modules[1];
    assert!(section.data_group.is_none());
    assert!(section.description.is_none());
    assert!(section.query_parameters.is_none());
    assert!(dashboard.other_notes.is_none());
}

#[test]
fn module_record_null_info_and_title_read_as_empty() {
    let json = EXAMPLE_DASHBOARD.replace(r#""info": []"#, r#""info": null"#);
    assert_ne!(json, EXAMPLE_DASHBOARD);
    let dashboard: Dashboard = serde_json::from_str(&json).unwrap();
    assert!(dashboard.modules[1].info.is_empty());

    let module: ModuleRecord = serde_json::from_value(serde_json::json!({
        "id": "9f0a6b52-3c4d-4e5f-8a9b-0c1d2e3f4a5b",
        "type": {"id": "b7d3a2c4-1e2f-4a5b-8c9d-0e1f2a3b4c5d", "name": "kpi"},
        "slug": null,
        "title": null,
        "info": null
    }))
    .unwrap();
    assert!(module.info.is_empty());
    assert!(module.slug.is_empty());
    assert!(module.title.is_empty());
}

#[test]
fn dashboard_record_defaults_missing_fields() {
    let json = r#"{"id":"4c1e5ae1-7a33-4d3c-9f29-1e8f2b9a7c01"}"#;
    let dashboard: Dashboard = serde_json::from_str(json).unwrap();
    assert!(dashboard.links.is_empty());
    assert!(dashboard.modules.is_empty());
    assert!(dashboard.organisation.is_none());
    assert!(!dashboard.published);
}

#[test]
fn link_is_transaction_checks_type() {
    let link = Link { title: "Apply".into(), url: "https://example.test".into(), link_type: "transaction".into() };
    assert!(link.is_transaction());
    let other = Link { link_type: "other".into(), ..link };
    assert!(!other.is_transaction());
}

// =============================================================================
// Payload
// =============================================================================

fn sample_payload() -> DashboardPayload {
    DashboardPayload {
        published: false,
        page_type: "dashboard",
        dashboard_type: "transaction".into(),
        slug: "carers-allowance".into(),
        title: "Carer's Allowance".into(),
        description: String::new(),
        organisation: None,
        customer_type: String::new(),
        business_model: String::new(),
        strapline: "Dashboard".into(),
        costs: String::new(),
        other_notes: String::new(),
        links: vec![],
        modules: vec![ModulePayload {
            id: None,
            type_id: "b7d3a2c4-0c4f-4e61-a0a5-7bfb1f7c9e33".into(),
            data_group: None,
            data_type: None,
            slug: "digital-takeup".into(),
            title: "Digital take-up".into(),
            description: String::new(),
            info: vec![],
            options: Map::new(),
            query_parameters: Map::new(),
            order: 1,
        }],
    }
}

#[test]
fn payload_uses_hyphenated_type_keys() {
    let value = serde_json::to_value(sample_payload()).unwrap();
    assert_eq!(value["page-type"], "dashboard");
    assert_eq!(value["dashboard-type"], "transaction");
    assert!(value.get("page_type").is_none());
}

#[test]
fn module_payload_omits_missing_id() {
    let value = serde_json::to_value(sample_payload()).unwrap();
    assert!(value["modules"][0].get("id").is_none());
    assert_eq!(value["modules"][0]["order"], 1);
}

#[test]
fn module_payload_keeps_present_id() {
    let mut payload = sample_payload();
    let id = Uuid::new_v4();
    payload.modules[0].id = Some(id);
    let value = serde_json::to_value(payload).unwrap();
    assert_eq!(value["modules"][0]["id"], id.to_string());
}

// =============================================================================
// ApiError
// =============================================================================

#[test]
fn status_error_user_message_is_upstream_message() {
    let err = ApiError::Status { status: 400, message: "Slug already taken".into() };
    assert_eq!(err.user_message(), "Slug already taken");
}

#[test]
fn request_error_user_message_includes_context() {
    let err = ApiError::Request("connection refused".into());
    assert_eq!(err.user_message(), "API request failed: connection refused");
}
