use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keel_shared::ServerErrorBody;
use thiserror::Error;

use crate::i18n::Catalog;
use crate::views::Nav;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("management server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("management server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response from management server: {0}")]
    Decode(String),

    /// Form input failed validation; carries a message key.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// License file upload was refused; carries a message key.
    #[error("upload refused: {0}")]
    Upload(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

impl ConsoleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConsoleError::Transport(_) | ConsoleError::Decode(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Rejected { status, .. } => match StatusCode::from_u16(*status) {
                Ok(code) if code.is_client_error() => code,
                _ => StatusCode::BAD_GATEWAY,
            },
            ConsoleError::Validation(_) | ConsoleError::Upload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ConsoleError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing text for this error.
    pub fn user_message(&self, catalog: &Catalog) -> String {
        match self {
            ConsoleError::Transport(_) => catalog.t("common.error.transport"),
            ConsoleError::Rejected { message, .. } => message.clone(),
            ConsoleError::Decode(_) => catalog.t("common.error.decode"),
            ConsoleError::Validation(key) | ConsoleError::Upload(key) => catalog.t(key),
            ConsoleError::Config(_) => catalog.t("common.error.internal"),
        }
    }

    /// Turns the error into the popup shown to the operator, logging it on the way.
    pub fn surface(self, catalog: &Catalog, header_key: &str) -> ErrorPopup {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        ErrorPopup {
            status,
            page: ErrorPopupTemplate {
                nav: Nav::new(catalog),
                header: catalog.t(header_key),
                message: self.user_message(catalog),
                close_label: catalog.t("ok"),
            },
        }
    }
}

/// Pulls the operator-facing message out of an error response body.
///
/// JSON bodies carry `{"message": "..."}` whose useful part follows the last
/// `:`; other bodies are used verbatim; empty bodies fall back to the status text.
pub fn extract_server_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ServerErrorBody>(body) {
        let message = parsed.message;
        let tail = match message.rfind(':') {
            Some(idx) => &message[idx + 1..],
            None => message.as_str(),
        };
        let tail = tail.trim();
        if !tail.is_empty() {
            return tail.to_string();
        }
        return message.trim().to_string();
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(|r| r.to_string())
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorPopupTemplate {
    pub nav: Nav,
    pub header: String,
    pub message: String,
    pub close_label: String,
}

pub struct ErrorPopup {
    pub status: StatusCode,
    pub page: ErrorPopupTemplate,
}

impl ErrorPopup {
    /// Replaces the popup body with a fixed catalog message.
    pub fn with_message(mut self, catalog: &Catalog, message_key: &str) -> Self {
        self.page.message = catalog.t(message_key);
        self
    }
}

impl IntoResponse for ErrorPopup {
    fn into_response(self) -> Response {
        (self.status, self.page).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn server_message_takes_text_after_last_colon() {
        let body = r#"{"status":400,"message":"org.apache.ambari.server.AmbariException: Invalid password"}"#;
        assert_eq!(
            extract_server_message(StatusCode::BAD_REQUEST, body),
            "Invalid password"
        );
    }

    #[test]
    fn server_message_without_colon_is_used_whole() {
        let body = r#"{"message":"Forbidden"}"#;
        assert_eq!(extract_server_message(StatusCode::FORBIDDEN, body), "Forbidden");
    }

    #[test]
    fn plain_body_and_empty_body() {
        assert_eq!(
            extract_server_message(StatusCode::BAD_GATEWAY, "  upstream down \n"),
            "upstream down"
        );
        assert_eq!(
            extract_server_message(StatusCode::NOT_FOUND, ""),
            "Not Found"
        );
    }

    #[test]
    fn rejected_client_errors_keep_status() {
        let err = ConsoleError::Rejected {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = ConsoleError::Rejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn surface_uses_catalog_header_and_message_key() {
        let catalog = Catalog::new(Locale::En);
        let popup = ConsoleError::Validation("admin.users.passwordsMismatch")
            .surface(&catalog, "admin.users.editButton");

        assert_eq!(popup.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(popup.page.header, "Edit User");
        assert_eq!(popup.page.message, "Passwords do not match.");
    }
}
