//! HTTP Config Store client
//!
//! Endpoints (relative to `API_BASE`):
//! - `GET  user/config/{userId}` -> `{ "config": Config }`
//! - `PUT  user/config/{userId}` body = Config -> 2xx
//! - `GET  scrape/instansi`      -> `{ "data": [string] }`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use super::store::ConfigStore;
use crate::config::ClientConfig;
use crate::models::config::Config;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ConfigEnvelope, InstansiResponse};
use crate::utils::constants::{join_url, INSTANSI_PATH, USER_CONFIG_PATH};

/// reqwest-backed [`ConfigStore`]
#[derive(Debug, Clone)]
pub struct HttpConfigStore {
    client: reqwest::Client,
    api_base: String,
}

impl HttpConfigStore {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        Ok(Self {
            client: Self::build_client(config)?,
            api_base: config.api_base.clone(),
        })
    }

    /// Build HTTP client with default headers and timeout
    fn build_client(config: &ClientConfig) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| AppError::invalid_value("User-Agent contains invalid characters"))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorCode::ConfigInvalidValue,
                    "Failed to build HTTP client",
                    e,
                )
            })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `{API_BASE}/user/config/{userId}` with the id percent-encoded as one segment
    fn user_config_url(&self, user_id: &str) -> AppResult<Url> {
        if user_id.is_empty() {
            return Err(AppError::invalid_value("user id must not be empty"));
        }
        let mut url = Url::parse(&join_url(&self.api_base, USER_CONFIG_PATH)).map_err(|e| {
            AppError::with_source(ErrorCode::ConfigInvalidValue, "Invalid API base URL", e)
        })?;
        url.path_segments_mut()
            .map_err(|_| AppError::invalid_value("API base URL cannot carry a path"))?
            .push(user_id);
        Ok(url)
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn fetch_config(&self, user_id: &str) -> AppResult<Config> {
        let url = self.user_config_url(user_id)?;
        debug!("📥 GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            info!("📭 No stored config for user {}", user_id);
            return Err(AppError::not_found(user_id));
        }
        if !status.is_success() {
            warn!("⚠️ Config load for {} failed: HTTP {}", user_id, status);
            return Err(AppError::unavailable(format!("Config load failed: HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let envelope: ConfigEnvelope = serde_json::from_slice(&body)?;
        envelope.config.ok_or_else(|| AppError::not_found(user_id))
    }

    async fn put_config(&self, user_id: &str, config: &Config) -> AppResult<()> {
        let url = self.user_config_url(user_id)?;
        debug!("📤 PUT {}", url);

        let response = self.client.put(url).json(config).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("⚠️ Config store rejected write for {}: HTTP {}", user_id, status);
            return Err(AppError::rejected(status.as_u16()));
        }
        Ok(())
    }

    async fn fetch_instansi(&self) -> AppResult<Vec<String>> {
        let url = join_url(&self.api_base, INSTANSI_PATH);
        debug!("📥 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::unavailable(format!("Instansi load failed: HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let parsed: InstansiResponse = serde_json::from_slice(&body)?;
        info!("📋 Loaded {} instansi options", parsed.data.len());
        Ok(parsed.data)
    }
}
