// License administration: detail page, confirmation popups, upload.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ConsoleError;
use crate::views::license::{LicensePanel, LicenseTemplate};
use crate::views::modal::{ConfirmDialog, ConfirmTemplate, LicenseAction};
use crate::views::upload::{UploadTemplate, stage_single_file};
use crate::views::{Nav, Route};

pub async fn index() -> Redirect {
    Redirect::to(Route::AdminLicense.path())
}

pub async fn get_license(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let staged = state.sessions.with(&session, |s| s.staged_license.is_some());

    match state.client.license_status().await {
        Ok(status) => {
            let panel = LicensePanel::from_status(status);
            (jar, LicenseTemplate::new(&panel, &state.catalog, staged)).into_response()
        }
        Err(e) => {
            let popup = e
                .surface(&state.catalog, "common.information")
                .with_message(&state.catalog, "license.upload.detail");
            (jar, popup).into_response()
        }
    }
}

pub async fn get_confirm(State(state): State<AppState>, Path(action): Path<String>) -> Response {
    let Some(action) = LicenseAction::parse(&action) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    ConfirmTemplate {
        nav: Nav::new(&state.catalog),
        dialog: ConfirmDialog::for_license(action, &state.catalog),
    }
    .into_response()
}

/// Confirmed license action. Writes go to the server first; the console only
/// moves on to the action's destination once the write succeeded.
pub async fn post_action(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(action): Path<String>,
) -> Response {
    let Some(action) = LicenseAction::parse(&action) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let (jar, session) = state.sessions.resolve(jar);

    let result = match action {
        LicenseAction::Add => Ok(()),
        LicenseAction::Update => {
            let staged = state.sessions.with(&session, |s| s.staged_license.clone());
            let result = state
                .client
                .update_license(staged.as_ref().map(|s| s.content.as_str()))
                .await;
            if result.is_ok() {
                state.sessions.with(&session, |s| s.staged_license = None);
            }
            result
        }
        LicenseAction::Delete => state.client.delete_license().await,
    };

    match result {
        Ok(()) => {
            if action.writes() {
                info!("License {} confirmed", action.slug());
            }
            (jar, Redirect::to(action.destination().path())).into_response()
        }
        Err(e) => (jar, e.surface(&state.catalog, action.header_key())).into_response(),
    }
}

pub async fn get_upload(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.sessions.resolve(jar);
    let staged = state.sessions.with(&session, |s| s.staged_license.clone());
    (jar, UploadTemplate::new(&state.catalog, staged.as_ref(), None)).into_response()
}

pub async fn post_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let (jar, session) = state.sessions.resolve(jar);

    let mut files = Vec::new();
    let read = loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                // An untouched file input still posts a part with an empty filename.
                if file_name.is_empty() {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => files.push((file_name, bytes.to_vec())),
                    Err(e) => {
                        warn!("Failed to read uploaded license: {}", e);
                        break Err(ConsoleError::Upload("license.upload.error.read"));
                    }
                }
            }
            Ok(None) => break Ok(files),
            Err(e) => {
                warn!("Malformed license upload: {}", e);
                break Err(ConsoleError::Upload("license.upload.error.read"));
            }
        }
    };

    match read.and_then(|files| stage_single_file(files, state.config.max_upload_bytes)) {
        Ok(staged) => {
            info!("Staged license file {} ({} bytes)", staged.file_name, staged.content.len());
            let page = UploadTemplate::new(&state.catalog, Some(&staged), None);
            state.sessions.with(&session, |s| s.staged_license = Some(staged));
            (jar, page).into_response()
        }
        Err(e) => {
            warn!("License upload refused: {}", e);
            state.sessions.with(&session, |s| s.staged_license = None);
            let page = UploadTemplate::new(&state.catalog, None, Some(e.user_message(&state.catalog)));
            (e.status_code(), jar, page).into_response()
        }
    }
}
