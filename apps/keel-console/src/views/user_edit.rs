use askama::Template;
use askama_web::WebTemplate;
use keel_shared::{UserEditPayload, UserEditRequest, UserInfo};
use serde::Deserialize;

use super::{Nav, Route};
use crate::error::{ConsoleError, Result};
use crate::i18n::Catalog;

const ROLES_ADMIN: &str = "admin,user";
const ROLES_USER: &str = "user";

/// Console path of a user's edit page, with the name percent-encoded as one segment.
pub fn edit_path(user_name: &str) -> String {
    format!("{}/{}/edit", Route::AllUsers.path(), urlencoding::encode(user_name))
}

/// Submitted edit-user form. Checkbox fields arrive as `Some("on")` or not at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditUserForm {
    pub user_name: String,
    #[serde(default)]
    pub admin: Option<String>,
    /// Set by the page when the admin checkbox was rendered; without it the
    /// admin flag is treated as unset, which counts as admin.
    #[serde(default)]
    pub admin_rendered: Option<String>,
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub new_password_retype: String,
}

impl EditUserForm {
    fn is_admin(&self) -> bool {
        match (&self.admin_rendered, &self.admin) {
            (None, _) => true,
            (Some(_), Some(value)) => value.is_empty() || value == "on" || value == "true",
            (Some(_), None) => false,
        }
    }

    /// Validates the form and builds the request body.
    ///
    /// LDAP users cannot change passwords here, so their password fields are ignored.
    pub fn to_request(&self, is_ldap: bool) -> Result<UserEditRequest> {
        let roles = if self.is_admin() { ROLES_ADMIN } else { ROLES_USER }.to_string();

        let (password, old_password) = if is_ldap {
            (None, None)
        } else {
            if self.new_password != self.new_password_retype {
                return Err(ConsoleError::Validation("admin.users.passwordsMismatch"));
            }
            match (self.old_password.is_empty(), self.new_password.is_empty()) {
                (false, false) => (Some(self.new_password.clone()), Some(self.old_password.clone())),
                (true, true) => (None, None),
                _ => return Err(ConsoleError::Validation("admin.users.passwordPairRequired")),
            }
        };

        Ok(UserEditRequest {
            users: UserEditPayload {
                roles,
                password,
                old_password,
            },
        })
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "user_edit.html")]
pub struct UserEditTemplate {
    pub nav: Nav,
    pub title: String,
    pub user_name: String,
    pub edit_path: String,
    pub is_admin: bool,
    /// LDAP users get their password inputs disabled.
    pub passwords_disabled: bool,
    pub ldap_notice: Option<String>,
    pub username_label: String,
    pub admin_label: String,
    pub old_password_label: String,
    pub new_password_label: String,
    pub retype_label: String,
    pub submit_label: String,
}

impl UserEditTemplate {
    pub fn new(user: &UserInfo, catalog: &Catalog) -> Self {
        Self {
            nav: Nav::new(catalog),
            title: catalog.t("admin.users.editButton"),
            user_name: user.user_name.clone(),
            edit_path: edit_path(&user.user_name),
            is_admin: user.is_admin(),
            passwords_disabled: user.ldap_user,
            ldap_notice: user.ldap_user.then(|| catalog.t("admin.users.ldap")),
            username_label: catalog.t("admin.users.username"),
            admin_label: catalog.t("admin.users.admin"),
            old_password_label: catalog.t("admin.users.oldPassword"),
            new_password_label: catalog.t("admin.users.newPassword"),
            retype_label: catalog.t("admin.users.newPasswordRetype"),
            submit_label: catalog.t("admin.users.editButton"),
        }
    }
}

/// A row of the users list.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user_name: String,
    pub edit_path: String,
    pub roles: String,
    pub ldap: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub nav: Nav,
    pub title: String,
    pub edit_label: String,
    pub username_label: String,
    pub saved_notice: Option<String>,
    pub rows: Vec<UserRow>,
}

impl UsersTemplate {
    pub fn new(users: &[UserInfo], catalog: &Catalog, saved: bool) -> Self {
        Self {
            nav: Nav::new(catalog),
            title: catalog.t("admin.users.title"),
            edit_label: catalog.t("admin.users.editButton"),
            username_label: catalog.t("admin.users.username"),
            saved_notice: saved.then(|| catalog.t("admin.users.saved")),
            rows: users
                .iter()
                .map(|u| UserRow {
                    user_name: u.user_name.clone(),
                    edit_path: edit_path(&u.user_name),
                    roles: u.roles.join(","),
                    ldap: u.ldap_user,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    fn form(admin: Option<&str>, old: &str, new: &str, retype: &str) -> EditUserForm {
        EditUserForm {
            user_name: "ops".to_string(),
            admin: admin.map(str::to_string),
            admin_rendered: Some("1".to_string()),
            old_password: old.to_string(),
            new_password: new.to_string(),
            new_password_retype: retype.to_string(),
        }
    }

    #[test]
    fn checked_admin_gets_both_roles() {
        let req = form(Some("on"), "", "", "").to_request(false).unwrap();
        assert_eq!(req.users.roles, "admin,user");
        assert_eq!(req.users.password, None);
    }

    #[test]
    fn unchecked_admin_is_plain_user() {
        let req = form(None, "", "", "").to_request(false).unwrap();
        assert_eq!(req.users.roles, "user");
    }

    #[test]
    fn unset_admin_flag_counts_as_admin() {
        let mut f = form(None, "", "", "");
        f.admin_rendered = None;
        assert_eq!(f.to_request(false).unwrap().users.roles, "admin,user");
    }

    #[test]
    fn password_pair_sent_only_when_both_present() {
        let req = form(None, "old", "new", "new").to_request(false).unwrap();
        assert_eq!(req.users.password.as_deref(), Some("new"));
        assert_eq!(req.users.old_password.as_deref(), Some("old"));

        let err = form(None, "", "new", "new").to_request(false).unwrap_err();
        assert!(matches!(err, ConsoleError::Validation("admin.users.passwordPairRequired")));
    }

    #[test]
    fn mismatched_retype_is_rejected() {
        let err = form(None, "old", "new", "neW").to_request(false).unwrap_err();
        assert!(matches!(err, ConsoleError::Validation("admin.users.passwordsMismatch")));
    }

    #[test]
    fn ldap_user_passwords_are_ignored() {
        let req = form(Some("on"), "old", "new", "other").to_request(true).unwrap();
        assert_eq!(req.users.password, None);
        assert_eq!(req.users.old_password, None);
    }

    #[test]
    fn ldap_template_disables_password_fields() {
        let user = UserInfo {
            user_name: "dir".to_string(),
            roles: vec!["user".to_string()],
            ldap_user: true,
        };
        let page = UserEditTemplate::new(&user, &Catalog::new(Locale::En));
        assert!(page.passwords_disabled);
        assert!(!page.is_admin);
        let html = page.render().unwrap();
        assert!(html.contains("disabled"));
    }

    #[test]
    fn edit_links_encode_reserved_characters() {
        assert_eq!(edit_path("admin"), "/users/admin/edit");
        assert_eq!(edit_path("ops?x/1#2"), "/users/ops%3Fx%2F1%232/edit");

        let user = UserInfo {
            user_name: "ops?x".to_string(),
            roles: vec!["user".to_string()],
            ldap_user: false,
        };
        let catalog = Catalog::new(Locale::En);
        let html = UsersTemplate::new(std::slice::from_ref(&user), &catalog, false)
            .render()
            .unwrap();
        assert!(html.contains(r#"href="/users/ops%3Fx/edit""#));
        assert!(!html.contains("/users/ops?x/edit"));

        let html = UserEditTemplate::new(&user, &catalog).render().unwrap();
        assert!(html.contains(r#"action="/users/ops%3Fx/edit""#));
    }
}
