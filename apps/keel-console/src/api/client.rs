use keel_shared::{
    ClusterMetricsResponse, HostComponentsResponse, HostInfo, HostRoles, HostsResponse,
    LastLogIdResponse, LicenseDetailResponse, LogPageResponse, UserEditRequest, UserInfo,
    UserResponse, UsersListResponse,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use super::{LicenseStatus, LogPage, LogQuery, classify_license};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result, extract_server_message};

/// Write requests must carry this header or the server refuses them (CSRF guard).
const REQUESTED_BY_HEADER: &str = "X-Requested-By";
const REQUESTED_BY: &str = "keel";

/// Sampling step for metric windows, in seconds.
const METRIC_STEP_SECS: i64 = 15;

#[derive(Clone)]
pub struct ManagementClient {
    client: Client,
    base_url: String,
    cluster: String,
    username: Option<String>,
    password: Option<String>,
    no_license_sentinel: String,
}

impl ManagementClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base(),
            cluster: config.cluster.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            no_license_sentinel: config.no_license_sentinel.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    fn write(&self, request: RequestBuilder) -> RequestBuilder {
        self.authed(request).header(REQUESTED_BY_HEADER, REQUESTED_BY)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ConsoleError::Rejected {
            status: status.as_u16(),
            message: extract_server_message(status, &body),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn license_status(&self) -> Result<LicenseStatus> {
        tracing::debug!("Fetching license detail");
        let response = self.get("/license/detail").send().await?;
        let detail: LicenseDetailResponse = Self::read_json(response).await?;
        Ok(classify_license(detail, &self.no_license_sentinel))
    }

    /// Asks the server to update its license, optionally with new license text.
    pub async fn update_license(&self, content: Option<&str>) -> Result<()> {
        let mut request = self.write(self.client.post(self.url("/license/updateLicense")));
        if let Some(content) = content {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(content.to_string());
        }
        Self::check(request.send().await?).await?;
        tracing::info!("License update accepted");
        Ok(())
    }

    pub async fn delete_license(&self) -> Result<()> {
        let request = self.write(self.client.post(self.url("/license/deleteLicense")));
        Self::check(request.send().await?).await?;
        tracing::info!("License delete accepted");
        Ok(())
    }

    pub async fn users(&self) -> Result<Vec<UserInfo>> {
        let response = self.get("/users").query(&[("fields", "Users/*")]).send().await?;
        let body: UsersListResponse = Self::read_json(response).await?;
        Ok(body.items.into_iter().map(|i| i.users).collect())
    }

    pub async fn user(&self, user_name: &str) -> Result<UserInfo> {
        let path = format!("/users/{}", urlencoding::encode(user_name));
        let response = self.get(&path).query(&[("fields", "Users/*")]).send().await?;
        let body: UserResponse = Self::read_json(response).await?;
        Ok(body.users)
    }

    pub async fn edit_user(&self, user_name: &str, body: &UserEditRequest) -> Result<()> {
        let path = format!("/users/{}", urlencoding::encode(user_name));
        let request = self.write(self.client.put(self.url(&path))).json(body);
        Self::check(request.send().await?).await?;
        tracing::info!("User {} updated", user_name);
        Ok(())
    }

    pub async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage> {
        let response = self.get("/logs").query(&query.to_params()).send().await?;
        let page: LogPageResponse = Self::read_json(response).await?;
        Ok(page.into())
    }

    /// Id of the newest log on the server, if any.
    pub async fn last_log_id(&self) -> Result<Option<String>> {
        let response = self.get("/logs/lastID").send().await?;
        let body: LastLogIdResponse = Self::read_json(response).await?;
        Ok(body.entities.into_iter().next().map(|e| e.entity))
    }

    /// Cluster memory metrics for the window `[from, to]` (unix seconds).
    pub async fn memory_metrics(&self, from: i64, to: i64) -> Result<ClusterMetricsResponse> {
        let path = format!("/clusters/{}", urlencoding::encode(&self.cluster));
        let fields = format!("metrics/memory[{},{},{}]", from, to, METRIC_STEP_SECS);
        let response = self.get(&path).query(&[("fields", fields)]).send().await?;
        Self::read_json(response).await
    }

    pub async fn host_components(&self) -> Result<Vec<HostRoles>> {
        let path = format!("/clusters/{}/host_components", urlencoding::encode(&self.cluster));
        let response = self.get(&path).send().await?;
        let body: HostComponentsResponse = Self::read_json(response).await?;
        Ok(body.items.into_iter().map(|i| i.host_roles).collect())
    }

    pub async fn hosts(&self) -> Result<Vec<HostInfo>> {
        let path = format!("/clusters/{}/hosts", urlencoding::encode(&self.cluster));
        let response = self
            .get(&path)
            .query(&[("fields", "Hosts/rack_info")])
            .send()
            .await?;
        let body: HostsResponse = Self::read_json(response).await?;
        Ok(body.items.into_iter().map(|i| i.hosts).collect())
    }

    /// Requested `metrics/...` fields per host, keyed by host name. Hosts that
    /// report none of them are left out.
    pub async fn host_metrics(&self, fields: &[String]) -> Result<BTreeMap<String, Value>> {
        let path = format!("/clusters/{}/hosts", urlencoding::encode(&self.cluster));
        let fields = format!("Hosts/host_name,{}", fields.join(","));
        let response = self.get(&path).query(&[("fields", fields)]).send().await?;
        let body: HostsResponse = Self::read_json(response).await?;
        Ok(body
            .items
            .into_iter()
            .filter_map(|i| i.metrics.map(|m| (i.hosts.host_name, m)))
            .collect())
    }
}
