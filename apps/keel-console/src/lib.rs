//! Web admin console for a cluster management server.
//!
//! The console keeps no data of its own: every page is built from a read
//! against the management REST API and every write is forwarded to it.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod session;
pub mod views;

use api::ManagementClient;
use config::ConsoleConfig;
use i18n::Catalog;
use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub client: ManagementClient,
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> error::Result<Self> {
        if !config.server_url.starts_with("http://") && !config.server_url.starts_with("https://") {
            return Err(error::ConsoleError::Config(format!(
                "server_url must be an http(s) URL, got {:?}",
                config.server_url
            )));
        }

        let client = ManagementClient::new(&config)?;
        let catalog = Catalog::new(config.locale);

        Ok(Self {
            config: Arc::new(config),
            client,
            catalog: Arc::new(catalog),
            sessions: SessionStore::default(),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    // Multipart framing adds a little on top of the file itself.
    let body_limit = state.config.max_upload_bytes + 64 * 1024;

    Router::new()
        .route("/", get(handlers::license::index))
        .route("/health", get(handlers::health::health_check))
        // License
        .route("/license", get(handlers::license::get_license))
        .route("/license/{action}/confirm", get(handlers::license::get_confirm))
        .route(
            "/license/upload",
            get(handlers::license::get_upload).post(handlers::license::post_upload),
        )
        .route("/license/{action}", post(handlers::license::post_action))
        // Logs
        .route("/logs", get(handlers::logs::get_logs))
        .route("/logs/refresh", post(handlers::logs::post_refresh))
        .route("/logs/next", post(handlers::logs::post_next))
        .route("/logs/back", post(handlers::logs::post_back))
        .route("/logs/filter", post(handlers::logs::post_filter))
        .route("/logs/poll", get(handlers::logs::get_poll))
        // Users
        .route("/users", get(handlers::users::get_users))
        .route(
            "/users/{name}/edit",
            get(handlers::users::get_edit).post(handlers::users::post_edit),
        )
        // Charts and services
        .route("/charts/memory", get(handlers::charts::get_memory))
        .route("/charts/memory.json", get(handlers::charts::get_memory_json))
        .route("/charts/heatmap", get(handlers::charts::get_heatmap))
        .route("/services/spark", get(handlers::services::get_spark))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
