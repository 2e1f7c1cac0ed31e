use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::*;
use crate::routes::app;
use crate::routes::auth::COOKIE_NAME;
use crate::state::test_helpers::{MockApi, example_dashboard, example_organisation, test_app_state};

async fn setup(api: MockApi) -> (Arc<MockApi>, AppState, String) {
    let api = Arc::new(api);
    let state = test_app_state(api.clone());
    let token = state.sessions.create("test-access-token").await;
    (api, state, token)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, format!("{COOKIE_NAME}={token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, format!("{COOKIE_NAME}={token}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_create_body() -> String {
    let org = example_organisation().id;
    let kpi = example_dashboard().modules[0].module_type.id;
    format!(
        "dashboard_type=transaction&slug=new-service&title=New+service&strapline=Dashboard\
         &owning_organisation={org}&modules-0-module_type={kpi}&modules-0-title=A"
    )
}

// =============================================================================
// listing
// =============================================================================

#[tokio::test]
async fn index_lists_dashboards() {
    let (_api, state, token) = setup(MockApi::new()).await;

    let response = app(state).oneshot(get(DASHBOARD_ROUTE, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["dashboards"][0]["slug"], "carers-allowance");
    assert_eq!(body["messages"], serde_json::json!([]));
}

// =============================================================================
// create
// =============================================================================

#[tokio::test]
async fn new_form_renders_requested_module_rows() {
    let (_api, state, token) = setup(MockApi::new()).await;
    let uri = format!("{DASHBOARD_ROUTE}/new?modules=3");

    let response = app(state).oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["action"], DASHBOARD_ROUTE);
    assert_eq!(body["dashboard_id"], serde_json::Value::Null);
    assert_eq!(body["form"]["modules"].as_array().unwrap().len(), 3);

    let organisations = body["choices"]["organisations"].as_array().unwrap();
    assert_eq!(organisations.len(), 2);
    assert_eq!(organisations[0]["value"], "");
    assert_eq!(organisations[1]["value"], example_organisation().id.to_string());
    assert_eq!(organisations[1]["label"], example_organisation().name);
}

#[tokio::test]
async fn new_form_warns_when_choices_unavailable() {
    let api = MockApi { choices_unavailable: true, ..MockApi::new() };
    let (_api, state, token) = setup(api).await;
    let uri = format!("{DASHBOARD_ROUTE}/new");

    let response = app(state).oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let messages = body["messages"].as_array().unwrap();
    assert!(!messages.is_empty());
    assert!(messages.iter().all(|m| m["level"] == "warning"));
}

#[tokio::test]
async fn add_module_redirects_with_row_count_and_skips_api() {
    let (api, state, token) = setup(MockApi::new()).await;
    let body = "slug=draft&modules-0-title=A&modules-1-title=B&add_module=Add+module";

    let response = app(state).oneshot(post_form(DASHBOARD_ROUTE, &token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("{DASHBOARD_ROUTE}/new?modules=3"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn successful_create_redirects_to_listing_with_flash() {
    let (api, state, token) = setup(MockApi::new()).await;
    let sessions = state.sessions.clone();

    let response = app(state)
        .oneshot(post_form(DASHBOARD_ROUTE, &token, &valid_create_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), DASHBOARD_ROUTE);
    assert!(api.calls().contains(&"create_dashboard".to_owned()));

    let flashes = sessions.take_flashes(&token).await;
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].level, FlashLevel::Success);
    assert_eq!(flashes[0].message, "Created the new-service dashboard");
}

#[tokio::test]
async fn rejected_create_returns_to_form_and_keeps_draft() {
    let (_api, state, token) = setup(MockApi::failing_saves(400, "Slug already taken")).await;
    let sessions = state.sessions.clone();

    let response = app(state)
        .oneshot(post_form(DASHBOARD_ROUTE, &token, &valid_create_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("{DASHBOARD_ROUTE}/new"));

    let draft = sessions.resume_draft(&token, DraftTarget::New).await.expect("draft kept");
    assert_eq!(draft.slug, "new-service");
}

#[tokio::test]
async fn create_without_session_is_unauthorized() {
    let (api, state, _token) = setup(MockApi::new()).await;
    let request = Request::post(DASHBOARD_ROUTE)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(valid_create_body()))
        .unwrap();

    let response = app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(api.calls().is_empty());
}

// =============================================================================
// edit
// =============================================================================

#[tokio::test]
async fn edit_form_loads_existing_dashboard() {
    let (_api, state, token) = setup(MockApi::new()).await;
    let id = example_dashboard().id;
    let uri = format!("{DASHBOARD_ROUTE}/{id}");

    let response = app(state).oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["action"], uri);
    assert_eq!(body["form"]["slug"], "carers-allowance");
    assert_eq!(body["form"]["modules"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn edit_form_for_unknown_dashboard_redirects_to_listing() {
    let (_api, state, token) = setup(MockApi::new()).await;
    let sessions = state.sessions.clone();
    let uri = format!("{DASHBOARD_ROUTE}/{}", Uuid::new_v4());

    let response = app(state).oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), DASHBOARD_ROUTE);

    let flashes = sessions.take_flashes(&token).await;
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].level, FlashLevel::Danger);
}

#[tokio::test]
async fn move_module_on_edit_redirects_back_to_edit_form() {
    let (api, state, token) = setup(MockApi::new()).await;
    let id = example_dashboard().id;
    let uri = format!("{DASHBOARD_ROUTE}/{id}");
    let body = "slug=carers-allowance&modules-0-title=A&modules-1-title=B&move_module_down_0=Down";

    let response = app(state).oneshot(post_form(&uri, &token, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), uri);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn successful_update_redirects_to_listing() {
    let (api, state, token) = setup(MockApi::new()).await;
    let id = example_dashboard().id;
    let uri = format!("{DASHBOARD_ROUTE}/{id}");

    let response = app(state)
        .oneshot(post_form(&uri, &token, &valid_create_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), DASHBOARD_ROUTE);
    assert!(api.calls().contains(&"update_dashboard".to_owned()));
}

#[tokio::test]
async fn healthz_needs_no_session() {
    let state = test_app_state(Arc::new(MockApi::new()));
    let request = Request::get("/healthz").body(Body::empty()).unwrap();

    let response = app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
