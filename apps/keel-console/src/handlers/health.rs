use crate::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "server_url": state.config.server_url,
        "cluster": state.config.cluster,
        "locale": state.catalog.locale(),
        "sessions": state.sessions.len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
