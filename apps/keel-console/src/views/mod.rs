//! Per-view state objects.
//!
//! Each view owns its state and changes it only through its own operations;
//! handlers fold server responses into these and render the result.

pub mod heatmap;
pub mod license;
pub mod logs;
pub mod memory;
pub mod modal;
pub mod spark;
pub mod upload;
pub mod user_edit;

use crate::i18n::Catalog;

/// Named view-states the console can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    AdminLicense,
    LicenseUpload,
    AllUsers,
    Logs,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::AdminLicense => "/license",
            Route::LicenseUpload => "/license/upload",
            Route::AllUsers => "/users",
            Route::Logs => "/logs",
        }
    }
}

/// Navigation labels shared by every page.
#[derive(Debug, Clone)]
pub struct Nav {
    pub license: String,
    pub users: String,
    pub logs: String,
    pub memory: String,
    pub heatmap: String,
    pub spark: String,
}

impl Nav {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            license: catalog.t("license.title"),
            users: catalog.t("admin.users.title"),
            logs: catalog.t("logs.title"),
            memory: catalog.t("dashboard.clusterMetrics.memory"),
            heatmap: catalog.t("charts.heatmap.title"),
            spark: catalog.t("services.spark.title"),
        }
    }
}
