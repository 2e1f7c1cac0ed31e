mod api;
mod config;
mod dashboard;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let client = api::StagecraftClient::new(config.stagecraft_host.clone(), config.api_timeouts)
        .expect("api client init failed");
    tracing::info!(base_url = client.base_url(), "stagecraft client initialized");

    if config.dev_auth.is_some() {
        tracing::warn!("development sign-in enabled at POST /dev/session");
    }

    let sessions = services::session::SessionStore::new(config.session_ttl);
    let state = state::AppState::new(Arc::new(client), sessions, config.cookie_secure, config.dev_auth);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "dashboard admin listening");
    axum::serve(listener, app).await.expect("server failed");
}
