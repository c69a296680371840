//! Wire types of the management server REST API.
//!
//! These mirror the JSON envelopes exactly; interpretation (sentinel checks,
//! display names, pagination) belongs to the console's adapter and view layers.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Text the server puts in the license id field when no license is installed.
pub const NO_LICENSE_SENTINEL: &str = "No License.";

// ============================================================================
// License
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseDetailResponse {
    #[serde(default)]
    pub items: Option<Vec<LicenseItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseItem {
    #[serde(rename = "Licenses")]
    pub licenses: LicenseEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseEntity {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Commencement date.
    #[serde(default)]
    pub date1: Option<String>,
    /// Expiry date.
    #[serde(default)]
    pub date2: Option<String>,
    #[serde(default)]
    pub nodes: Option<i64>,
    #[serde(default, rename = "auditItems")]
    pub audit_items: Vec<AuditItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEditRequest {
    #[serde(rename = "Users")]
    pub users: UserEditPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEditPayload {
    pub roles: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub ldap_user: bool,
}

impl UserInfo {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "Users")]
    pub users: UserInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersListResponse {
    #[serde(default)]
    pub items: Vec<UserResponse>,
}

/// Error body the server attaches to rejected requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    pub message: String,
}

// ============================================================================
// Logs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogPageResponse {
    #[serde(default)]
    pub items: Vec<LogItem>,
    /// Forward cursor; empty or absent when there is no further page.
    #[serde(default, rename = "nextID", deserialize_with = "optional_cursor_id")]
    pub next_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogItem {
    #[serde(rename = "Logs")]
    pub logs: LogEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntity {
    #[serde(deserialize_with = "cursor_id")]
    pub id: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastLogIdResponse {
    #[serde(default)]
    pub entities: Vec<LastLogIdEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastLogIdEntity {
    #[serde(deserialize_with = "cursor_id")]
    pub entity: String,
}

/// Log cursors are opaque; servers send them as strings or as bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum CursorId {
    Text(String),
    Number(serde_json::Number),
}

impl From<CursorId> for String {
    fn from(id: CursorId) -> Self {
        match id {
            CursorId::Text(text) => text,
            CursorId::Number(number) => number.to_string(),
        }
    }
}

fn cursor_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    CursorId::deserialize(deserializer).map(String::from)
}

fn optional_cursor_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<CursorId>::deserialize(deserializer)?.map(String::from))
}

// ============================================================================
// Cluster metrics, hosts, components
// ============================================================================

/// A metric sample as the server sends it: `[value, unix_seconds]`.
pub type DataPoint = (Option<f64>, i64);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMetricsResponse {
    #[serde(default)]
    pub metrics: Option<ClusterMetrics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMetrics {
    #[serde(default)]
    pub memory: Option<BTreeMap<String, Option<Vec<DataPoint>>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostComponentsResponse {
    #[serde(default)]
    pub items: Vec<HostComponentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostComponentItem {
    #[serde(rename = "HostRoles")]
    pub host_roles: HostRoles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRoles {
    pub component_name: String,
    pub host_name: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostsResponse {
    #[serde(default)]
    pub items: Vec<HostItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostItem {
    #[serde(rename = "Hosts")]
    pub hosts: HostInfo,
    /// Whatever `metrics/...` fields were requested, nested as the server sends them.
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub host_name: String,
    #[serde(default)]
    pub rack_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_detail_accepts_null_items() {
        let parsed: LicenseDetailResponse = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(parsed.items.is_none());

        let parsed: LicenseDetailResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_none());
    }

    #[test]
    fn license_detail_reads_licenses_envelope() {
        let body = r#"{"items":[{"Licenses":{"id":"00:1b:44:11:3a:b7","version":"2.1","date1":"2024-01-01","date2":"2025-01-01","nodes":12}}]}"#;
        let parsed: LicenseDetailResponse = serde_json::from_str(body).unwrap();
        let items = parsed.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].licenses.id, "00:1b:44:11:3a:b7");
        assert_eq!(items[0].licenses.nodes, Some(12));
        assert!(items[0].licenses.audit_items.is_empty());
    }

    #[test]
    fn user_edit_omits_absent_passwords() {
        let req = UserEditRequest {
            users: UserEditPayload {
                roles: "user".to_string(),
                password: None,
                old_password: None,
            },
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"Users":{"roles":"user"}}"#
        );
    }

    #[test]
    fn user_info_admin_role() {
        let parsed: UserResponse = serde_json::from_str(
            r#"{"Users":{"user_name":"admin","roles":["admin","user"],"ldap_user":false}}"#,
        )
        .unwrap();
        assert!(parsed.users.is_admin());

        let parsed: UserResponse = serde_json::from_str(r#"{"Users":{"user_name":"dir"}}"#).unwrap();
        assert!(!parsed.users.is_admin());
        assert!(!parsed.users.ldap_user);
    }

    #[test]
    fn memory_metrics_keep_null_values() {
        let body = r#"{"metrics":{"memory":{"Use":[[1024.0,1700000000],[null,1700000015]],"Swap":null}}}"#;
        let parsed: ClusterMetricsResponse = serde_json::from_str(body).unwrap();
        let memory = parsed.metrics.unwrap().memory.unwrap();
        assert_eq!(memory["Use"].as_ref().unwrap()[1], (None, 1700000015));
        assert!(memory["Swap"].is_none());
    }

    #[test]
    fn log_page_next_id_is_optional() {
        let parsed: LogPageResponse =
            serde_json::from_str(r#"{"items":[{"Logs":{"id":"42","time":"t","level":"INFO","content":"c"}}]}"#)
                .unwrap();
        assert_eq!(parsed.items[0].logs.id, "42");
        assert!(parsed.next_id.is_none());
    }

    #[test]
    fn log_cursors_accept_numbers() {
        let page: LogPageResponse = serde_json::from_str(
            r#"{"items":[{"Logs":{"id":100,"time":"t","level":"INFO","content":"c"}}],"nextID":97}"#,
        )
        .unwrap();
        assert_eq!(page.items[0].logs.id, "100");
        assert_eq!(page.next_id.as_deref(), Some("97"));

        let page: LogPageResponse =
            serde_json::from_str(r#"{"items":[{"Logs":{"id":"a1"}}],"nextID":null}"#).unwrap();
        assert_eq!(page.items[0].logs.id, "a1");
        assert_eq!(page.next_id, None);

        let last: LastLogIdResponse = serde_json::from_str(r#"{"entities":[{"entity":100}]}"#).unwrap();
        assert_eq!(last.entities[0].entity, "100");
    }

    #[test]
    fn host_item_keeps_requested_metrics() {
        let item: HostItem = serde_json::from_str(
            r#"{"Hosts":{"host_name":"h1"},"metrics":{"cpu":{"cpu_wio":2.5}}}"#,
        )
        .unwrap();
        assert_eq!(item.metrics.unwrap()["cpu"]["cpu_wio"], 2.5);

        let item: HostItem = serde_json::from_str(r#"{"Hosts":{"host_name":"h2"}}"#).unwrap();
        assert!(item.metrics.is_none());
    }
}
