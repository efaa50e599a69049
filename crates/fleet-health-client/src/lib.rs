//! Munkireport client
//!
//! Authenticates against a Munkireport server and pulls the inventory data
//! table with the column projection the rule engine expects.
//!
//! ```text
//! POST {base_url}/auth/login        login=...&password=...   (session cookie)
//! POST {base_url}/datatables/data   columns[0][name]=...     -> {"data": [[...]]}
//! ```

mod error;

pub use error::{ClientError, Result};

use fleet_health_core::Field;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Munkireport server
#[derive(Clone)]
pub struct MunkireportClientConfig {
    /// Server root, e.g. `https://munki.example.com/index.php?`
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl MunkireportClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for MunkireportClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MunkireportClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Data table response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTablesResponse {
    /// One row per machine, columns in query order
    #[serde(default)]
    pub data: Vec<Vec<Value>>,

    #[serde(rename = "recordsTotal", default, skip_serializing_if = "Option::is_none")]
    pub records_total: Option<u64>,

    #[serde(rename = "recordsFiltered", default, skip_serializing_if = "Option::is_none")]
    pub records_filtered: Option<u64>,
}

/// Form fields selecting the inventory columns, in [`Field`] order
pub fn generate_column_query() -> Vec<(String, String)> {
    Field::ALL
        .iter()
        .enumerate()
        .map(|(index, field)| {
            (
                format!("columns[{}][name]", index),
                field.column().to_string(),
            )
        })
        .collect()
}

/// Session-based Munkireport client
pub struct MunkireportClient {
    client: Client,
    config: MunkireportClientConfig,
}

impl MunkireportClient {
    /// Create a client with its own cookie store
    pub fn new(config: MunkireportClientConfig) -> Result<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(config.base_url));
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Log in and keep the session cookie for later queries
    pub async fn authenticate(&self) -> Result<()> {
        let url = self.url("/auth/login");
        tracing::debug!(url = %url, username = %self.config.username, "Authenticating");

        let form = [
            ("login", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Authentication {
                status: status.as_u16(),
            });
        }

        tracing::info!(base_url = %self.config.base_url, "Authenticated with Munkireport");
        Ok(())
    }

    /// Query the inventory data table
    pub async fn query(&self) -> Result<DataTablesResponse> {
        let url = self.url("/datatables/data");
        tracing::debug!(url = %url, columns = Field::COUNT, "Querying data table");

        let response = self
            .client
            .post(&url)
            .form(&generate_column_query())
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if response.status().is_success() {
            let body: DataTablesResponse = response
                .json()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()))?;
            tracing::debug!(rows = body.data.len(), "Received data table");
            Ok(body)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Authenticate and fetch all inventory rows
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<Value>>> {
        self.authenticate().await?;
        Ok(self.query().await?.data)
    }
}
