use askama::Template;
use askama_web::WebTemplate;

use super::{Nav, Route};
use crate::i18n::Catalog;

/// A state-changing license operation that needs confirmation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseAction {
    Add,
    Update,
    Delete,
}

impl LicenseAction {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "add" => Some(LicenseAction::Add),
            "update" => Some(LicenseAction::Update),
            "delete" => Some(LicenseAction::Delete),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            LicenseAction::Add => "add",
            LicenseAction::Update => "update",
            LicenseAction::Delete => "delete",
        }
    }

    pub fn header_key(self) -> &'static str {
        match self {
            LicenseAction::Add => "license.add.header",
            LicenseAction::Update => "license.update.header",
            LicenseAction::Delete => "license.delete.header",
        }
    }

    /// Where the console goes once the action is confirmed (and its write, if any, succeeded).
    pub fn destination(self) -> Route {
        match self {
            LicenseAction::Add => Route::LicenseUpload,
            LicenseAction::Update | LicenseAction::Delete => Route::AdminLicense,
        }
    }

    /// Whether confirming sends a write to the management server.
    pub fn writes(self) -> bool {
        !matches!(self, LicenseAction::Add)
    }
}

/// Header/body/buttons of a confirmation popup. A missing `secondary` makes it an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog {
    pub header: String,
    pub body: String,
    pub primary: String,
    pub secondary: Option<String>,
    /// Form target posted on confirm.
    pub confirm_path: String,
    /// Where cancel returns to.
    pub cancel_path: String,
}

impl ConfirmDialog {
    pub fn for_license(action: LicenseAction, catalog: &Catalog) -> Self {
        Self {
            header: catalog.t(action.header_key()),
            body: catalog.t("question.sure"),
            primary: catalog.t("yes"),
            secondary: Some(catalog.t("no")),
            confirm_path: format!("/license/{}", action.slug()),
            cancel_path: Route::AdminLicense.path().to_string(),
        }
    }

    pub fn secondary_label(&self) -> &str {
        self.secondary.as_deref().unwrap_or("")
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub nav: Nav,
    pub dialog: ConfirmDialog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[test]
    fn license_dialogs_ask_yes_no() {
        let catalog = Catalog::new(Locale::En);
        let dialog = ConfirmDialog::for_license(LicenseAction::Delete, &catalog);

        assert_eq!(dialog.header, "Delete License");
        assert_eq!(dialog.body, "Are you sure?");
        assert_eq!(dialog.primary, "Yes");
        assert_eq!(dialog.secondary.as_deref(), Some("No"));
        assert_eq!(dialog.confirm_path, "/license/delete");
        assert_eq!(dialog.cancel_path, "/license");
    }

    #[test]
    fn add_navigates_to_upload_without_writing() {
        assert!(!LicenseAction::Add.writes());
        assert_eq!(LicenseAction::Add.destination(), Route::LicenseUpload);
        assert!(LicenseAction::Update.writes());
        assert_eq!(LicenseAction::Delete.destination(), Route::AdminLicense);
    }

    #[test]
    fn parse_round_trips_slugs() {
        for action in [LicenseAction::Add, LicenseAction::Update, LicenseAction::Delete] {
            assert_eq!(LicenseAction::parse(action.slug()), Some(action));
        }
        assert_eq!(LicenseAction::parse("renew"), None);
    }

    #[test]
    fn chinese_headers_match_console_wording() {
        let catalog = Catalog::new(Locale::Zh);
        let dialog = ConfirmDialog::for_license(LicenseAction::Update, &catalog);
        assert_eq!(dialog.header, "更新许可证");
    }
}
