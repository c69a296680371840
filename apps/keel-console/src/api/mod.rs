//! Adapter layer between the console and the management server.
//!
//! Everything the views consume is translated here into console types, so
//! server quirks (like the "no license" id) stop at this boundary.

pub mod client;

pub use client::ManagementClient;

use keel_shared::{AuditItem, LicenseDetailResponse, LicenseEntity, LogEntity, LogPageResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct License {
    pub id: String,
    pub version: String,
    pub commencement: String,
    pub expiry: String,
    pub nodes: Option<i64>,
    pub audit_items: Vec<AuditItem>,
}

impl From<LicenseEntity> for License {
    fn from(entity: LicenseEntity) -> Self {
        Self {
            id: entity.id,
            version: entity.version.unwrap_or_default(),
            commencement: entity.date1.unwrap_or_default(),
            expiry: entity.date2.unwrap_or_default(),
            nodes: entity.nodes,
            audit_items: entity.audit_items,
        }
    }
}

/// Whether the management server holds an installed license.
#[derive(Debug, Clone, PartialEq)]
pub enum LicenseStatus {
    Absent,
    Present(License),
}

impl LicenseStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, LicenseStatus::Present(_))
    }
}

/// Interprets the license detail envelope.
///
/// The first item decides presence; a first item whose id equals `sentinel`
/// means no license. When several items come back the last one is displayed.
pub fn classify_license(response: LicenseDetailResponse, sentinel: &str) -> LicenseStatus {
    let items = match response.items {
        Some(items) if !items.is_empty() => items,
        _ => return LicenseStatus::Absent,
    };

    if items[0].licenses.id.trim() == sentinel.trim() {
        return LicenseStatus::Absent;
    }

    match items.into_iter().last() {
        Some(item) => LicenseStatus::Present(item.licenses.into()),
        None => LicenseStatus::Absent,
    }
}

/// Query parameters for one log page request. Empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub next_from_id: String,
    pub back_from_id: String,
    pub from_ts: String,
    pub time: String,
    pub level: String,
    pub content: String,
}

impl LogQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        [
            ("nextFromId", &self.next_from_id),
            ("backFromId", &self.back_from_id),
            ("fromTs", &self.from_ts),
            ("time", &self.time),
            ("level", &self.level),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub id: String,
    pub time: String,
    pub level: String,
    pub content: String,
}

impl From<LogEntity> for LogRecord {
    fn from(entity: LogEntity) -> Self {
        Self {
            id: entity.id,
            time: entity.time,
            level: entity.level,
            content: entity.content,
        }
    }
}

/// One page of logs plus the server's forward cursor ("" when none).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPage {
    pub records: Vec<LogRecord>,
    pub next_id: String,
}

impl From<LogPageResponse> for LogPage {
    fn from(response: LogPageResponse) -> Self {
        Self {
            records: response.items.into_iter().map(|i| i.logs.into()).collect(),
            next_id: response.next_id.unwrap_or_default(),
        }
    }
}
