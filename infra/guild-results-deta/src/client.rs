use std::time::Duration;

use reqwest::{StatusCode, header::HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://database.deta.sh/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum DetaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },
}

#[derive(Debug, Clone)]
pub struct DetaConfig {
    pub project_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl DetaConfig {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `DB_KEY`, `DETA_BASE_URL` and `DETA_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DetaError> {
        let project_key = std::env::var("DB_KEY")
            .map_err(|_| DetaError::Config("DB_KEY must be set".to_string()))?;
        let mut config = Self::new(project_key);
        if let Ok(base_url) = std::env::var("DETA_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("DETA_TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                DetaError::Config(format!("DETA_TIMEOUT_SECS must be a number: {}", e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// The project id is the part of the project key before the first `_`.
    pub fn project_id(&self) -> Result<&str, DetaError> {
        match self.project_key.split_once('_') {
            Some((id, secret)) if !id.is_empty() && !secret.is_empty() => Ok(id),
            _ => Err(DetaError::Config(
                "project key must look like <project id>_<secret>".to_string(),
            )),
        }
    }
}

/// Minimal client for the Deta Base items endpoint.
pub struct DetaClient {
    http: reqwest::Client,
    project_root: String,
    api_key: HeaderValue,
}

impl DetaClient {
    pub fn new(config: &DetaConfig) -> Result<Self, DetaError> {
        let project_root = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.project_id()?
        );
        let mut api_key = HeaderValue::from_str(&config.project_key)
            .map_err(|_| DetaError::Config("project key is not a valid header".to_string()))?;
        api_key.set_sensitive(true);
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            project_root,
            api_key,
        })
    }

    pub fn item_url(&self, base: &str, key: &str) -> String {
        format!("{}/{}/items/{}", self.project_root, base, key)
    }

    /// Fetches one item, `None` when the base has no such key.
    pub async fn get_item<T: DeserializeOwned>(
        &self,
        base: &str,
        key: &str,
    ) -> Result<Option<T>, DetaError> {
        let url = self.item_url(base, key);
        log::debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .header("X-API-Key", self.api_key.clone())
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(resp.json::<T>().await?)),
            status => Err(DetaError::Status { status, url }),
        }
    }
}
