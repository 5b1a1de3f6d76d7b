//! REST backend client
//!
//! Talks to the brokerage backend's `GET /api/properties` and
//! `GET /api/users` endpoints. Only compiled with the `http` feature.

use crate::config::FetchConfig;
use crate::core::error::{ConfigError, FetchError};
use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use crate::core::service::{FetchScope, PropertySource};
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const PROPERTIES_PATH: &str = "/api/properties";
const USERS_PATH: &str = "/api/users";

/// [`PropertySource`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpPropertySource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPropertySource {
    /// `base_url` is the backend origin, e.g. `https://erp.example.com`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client for the configured `fetch.base_url`
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        match config.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
            _ => Err(ConfigError::InvalidValue {
                field: "fetch.base_url".to_string(),
                value: String::new(),
                message: "required for the http property source".to_string(),
            }
            .into()),
        }
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?query, "Fetching");

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, url = %url, "Request failed");
                FetchError::Transport {
                    resource: path.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: path.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.json::<T>().await.map_err(|e| FetchError::Decode {
            resource: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(body)
    }
}

#[async_trait]
impl PropertySource for HttpPropertySource {
    async fn fetch_properties(&self, scope: &FetchScope) -> Result<Vec<Property>> {
        self.get_json(PROPERTIES_PATH, &scope.query_pairs()).await
    }

    async fn fetch_managers(&self, company: Option<&str>) -> Result<ManagerDirectory> {
        let query: Vec<(&'static str, String)> = company
            .map(|c| vec![("company", c.to_string())])
            .unwrap_or_default();
        self.get_json(USERS_PATH, &query).await
    }
}
