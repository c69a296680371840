// Log browser: cursor paging, filters and new-log polling.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::api::LogQuery;
use crate::error::Result;
use crate::views::Route;
use crate::views::logs::LogsTemplate;

#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub content: String,
}

async fn load(state: &AppState, session: &str, query: LogQuery) -> Result<()> {
    let page = state.client.fetch_logs(&query).await?;
    tracing::debug!("Loaded {} log records", page.records.len());
    state.sessions.with(session, |s| s.logs.receive_page(page));
    Ok(())
}

/// Drops every cursor and reloads from the newest log.
async fn refresh(state: &AppState, session: &str) -> Result<()> {
    state.sessions.with(session, |s| s.logs.update_logs_by_click());
    let last_id = state.client.last_log_id().await?.unwrap_or_default();
    let now = chrono::Utc::now().timestamp_millis().to_string();
    let query = state.sessions.with(session, |s| {
        s.logs.observe_last_id(&last_id);
        s.logs.initialize_pagination(&now)
    });
    load(state, session, query).await
}

fn failure(state: &AppState, jar: CookieJar, e: crate::error::ConsoleError) -> Response {
    let popup = e
        .surface(&state.catalog, "logs.title")
        .with_message(&state.catalog, "logs.table.log.fail");
    (jar, popup).into_response()
}

pub async fn get_logs(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);

    if !state.sessions.with(&session, |s| s.logs.is_initialized()) {
        if let Err(e) = refresh(&state, &session).await {
            return failure(&state, jar, e);
        }
    }

    let page = state
        .sessions
        .with(&session, |s| LogsTemplate::new(&s.logs, &state.catalog));
    (jar, page).into_response()
}

pub async fn post_refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    match refresh(&state, &session).await {
        Ok(()) => (jar, Redirect::to(Route::Logs.path())).into_response(),
        Err(e) => failure(&state, jar, e),
    }
}

pub async fn post_next(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let query = state.sessions.with(&session, |s| s.logs.click_next());
    step(state, jar, &session, query).await
}

pub async fn post_back(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let query = state.sessions.with(&session, |s| s.logs.click_back());
    step(state, jar, &session, query).await
}

/// Loads the page a click asked for; a disabled control asks for nothing.
async fn step(state: AppState, jar: CookieJar, session: &str, query: Option<LogQuery>) -> Response {
    if let Some(query) = query {
        if let Err(e) = load(&state, session, query).await {
            return failure(&state, jar, e);
        }
    }
    (jar, Redirect::to(Route::Logs.path())).into_response()
}

pub async fn post_filter(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<FilterForm>,
) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let query = state
        .sessions
        .with(&session, |s| s.logs.apply_filters(&form.time, &form.level, &form.content));
    step(state, jar, &session, Some(query)).await
}

/// Polled by the page to learn whether newer logs exist.
pub async fn get_poll(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let last_id = match state.client.last_log_id().await {
        Ok(id) => id.unwrap_or_default(),
        Err(e) => return failure(&state, jar, e),
    };

    let (has_new_logs, last_log_id) = state.sessions.with(&session, |s| {
        s.logs.observe_last_id(&last_id);
        (s.logs.has_new_logs, s.logs.last_log_id.clone())
    });
    (
        jar,
        Json(json!({
            "lastLogId": last_log_id,
            "hasNewLogs": has_new_logs
        })),
    )
        .into_response()
}
