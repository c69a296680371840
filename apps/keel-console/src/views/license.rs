use askama::Template;
use askama_web::WebTemplate;

use super::Nav;
use crate::api::{License, LicenseStatus};
use crate::i18n::Catalog;

/// Which license operation the page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Add,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LicensePanel {
    pub affordance: Affordance,
    pub record: Option<License>,
}

impl LicensePanel {
    pub fn from_status(status: LicenseStatus) -> Self {
        match status {
            LicenseStatus::Absent => Self {
                affordance: Affordance::Add,
                record: None,
            },
            LicenseStatus::Present(license) => Self {
                affordance: Affordance::Update,
                record: Some(license),
            },
        }
    }

    pub fn show_add(&self) -> bool {
        self.affordance == Affordance::Add
    }

    pub fn show_update(&self) -> bool {
        self.affordance == Affordance::Update
    }
}

/// One labelled row of the license detail table.
#[derive(Debug, Clone)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "license.html")]
pub struct LicenseTemplate {
    pub nav: Nav,
    pub title: String,
    pub show_add: bool,
    pub show_update: bool,
    pub add_label: String,
    pub update_label: String,
    pub delete_label: String,
    pub none_label: String,
    pub fields: Vec<Field>,
    pub audit_label: String,
    pub audit_items: Vec<String>,
    pub staged_notice: Option<String>,
}

impl LicenseTemplate {
    pub fn new(panel: &LicensePanel, catalog: &Catalog, staged: bool) -> Self {
        let (fields, audit_items) = match &panel.record {
            Some(license) => {
                let mut fields = vec![
                    Field { label: catalog.t("license.field.id"), value: license.id.clone() },
                    Field { label: catalog.t("license.field.version"), value: license.version.clone() },
                    Field { label: catalog.t("license.field.date1"), value: license.commencement.clone() },
                    Field { label: catalog.t("license.field.date2"), value: license.expiry.clone() },
                ];
                if let Some(nodes) = license.nodes {
                    fields.push(Field { label: catalog.t("license.field.nodes"), value: nodes.to_string() });
                }
                let audit = license
                    .audit_items
                    .iter()
                    .map(|item| {
                        [item.time.as_deref(), item.action.as_deref(), item.id.as_deref()]
                            .into_iter()
                            .flatten()
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect();
                (fields, audit)
            }
            None => (Vec::new(), Vec::new()),
        };

        Self {
            nav: Nav::new(catalog),
            title: catalog.t("license.title"),
            show_add: panel.show_add(),
            show_update: panel.show_update(),
            add_label: catalog.t("license.add"),
            update_label: catalog.t("license.update"),
            delete_label: catalog.t("license.delete"),
            none_label: catalog.t("license.none"),
            fields,
            audit_label: catalog.t("license.field.audit"),
            audit_items,
            staged_notice: staged.then(|| catalog.t("license.upload.staged")),
        }
    }

    pub fn has_record(&self) -> bool {
        !self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::classify_license;
    use crate::i18n::Locale;
    use keel_shared::{AuditItem, LicenseDetailResponse, LicenseEntity, LicenseItem, NO_LICENSE_SENTINEL};

    fn response(ids: &[&str]) -> LicenseDetailResponse {
        LicenseDetailResponse {
            items: Some(
                ids.iter()
                    .map(|id| LicenseItem {
                        licenses: LicenseEntity {
                            id: id.to_string(),
                            ..Default::default()
                        },
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn zero_items_show_add_hide_update() {
        let panel = LicensePanel::from_status(classify_license(response(&[]), NO_LICENSE_SENTINEL));
        assert!(panel.show_add());
        assert!(!panel.show_update());
        assert!(panel.record.is_none());
    }

    #[test]
    fn sentinel_item_shows_add_hides_update() {
        let panel = LicensePanel::from_status(classify_license(
            response(&["No License."]),
            NO_LICENSE_SENTINEL,
        ));
        assert!(panel.show_add());
        assert!(!panel.show_update());
    }

    #[test]
    fn real_item_shows_update_hides_add() {
        let panel = LicensePanel::from_status(classify_license(
            response(&["00:1b:44:11:3a:b7"]),
            NO_LICENSE_SENTINEL,
        ));
        assert!(!panel.show_add());
        assert!(panel.show_update());
    }

    #[test]
    fn template_lists_fields_and_audit() {
        let license = License {
            id: "00:1b".to_string(),
            version: "2.0".to_string(),
            commencement: "2024-01-01".to_string(),
            expiry: "2030-01-01".to_string(),
            nodes: Some(8),
            audit_items: vec![AuditItem {
                id: Some("7".to_string()),
                action: Some("installed".to_string()),
                time: Some("2024-01-01".to_string()),
            }],
        };
        let panel = LicensePanel::from_status(LicenseStatus::Present(license));
        let page = LicenseTemplate::new(&panel, &Catalog::new(Locale::En), false);

        assert!(page.has_record());
        assert_eq!(page.fields.len(), 5);
        assert_eq!(page.fields[0].label, "Mac");
        assert_eq!(page.fields[4].value, "8");
        assert_eq!(page.audit_items, vec!["2024-01-01 installed 7".to_string()]);
        assert!(page.staged_notice.is_none());

        let html = page.render().unwrap();
        assert!(html.contains("00:1b"));
        assert!(html.contains("/license/update/confirm"));
        assert!(!html.contains("/license/add/confirm"));
    }
}
