use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::i18n::Locale;

const CONFIG_PATHS: [&str; 2] = ["/etc/keel/console.toml", "./console.toml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the management server, e.g. `http://ambari.local:8080`.
    pub server_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_sentinel")]
    pub no_license_sentinel: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_cluster() -> String {
    "default".to_string()
}

fn default_listen_port() -> u16 {
    8090
}

fn default_sentinel() -> String {
    keel_shared::NO_LICENSE_SENTINEL.to_string()
}

fn default_max_upload_bytes() -> usize {
    1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl ConsoleConfig {
    pub fn load() -> Result<Self> {
        for path in CONFIG_PATHS {
            if Path::new(path).is_file() {
                tracing::info!("Loading config from {}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("Loading config from environment");
        Self::from_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config.normalized())
    }

    /// Builds the config from `KEEL_*` variables through `lookup`.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url = lookup("KEEL_SERVER_URL").context("KEEL_SERVER_URL is not set")?;

        let config = Self {
            server_url,
            api_prefix: lookup("KEEL_API_PREFIX").unwrap_or_else(default_api_prefix),
            cluster: lookup("KEEL_CLUSTER").unwrap_or_else(default_cluster),
            username: lookup("KEEL_USER"),
            password: lookup("KEEL_PASSWORD"),
            listen_port: lookup("KEEL_LISTEN_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_listen_port),
            locale: lookup("KEEL_LOCALE")
                .map(|l| Locale::parse(&l))
                .unwrap_or_default(),
            no_license_sentinel: lookup("KEEL_NO_LICENSE_SENTINEL").unwrap_or_else(default_sentinel),
            max_upload_bytes: lookup("KEEL_MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_upload_bytes),
            request_timeout_secs: lookup("KEEL_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
        };
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.server_url = self.server_url.trim_end_matches('/').to_string();
        let prefix = self.api_prefix.trim().trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };
        self
    }

    /// Management API root, e.g. `http://host:8080/api/v1`.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.server_url, self.api_prefix)
    }
}
