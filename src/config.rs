//! Client configuration
//! Base URL and HTTP knobs for talking to the Config Store

use std::time::Duration;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, ENV_API_BASE, ENV_API_BASE_ALIAS, ENV_HTTP_TIMEOUT_SECS, USER_AGENT,
};

/// Configuration for the Config Store client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.example.id`
    pub api_base: String,

    /// Timeout applied to every Config Store request
    pub request_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Build a config for an explicit base URL with default timeouts
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Read `API_BASE` (or its alias) and the optional timeout override
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup(ENV_API_BASE)
            .or_else(|| lookup(ENV_API_BASE_ALIAS))
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::missing_env(ENV_API_BASE))?;

        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(AppError::invalid_value(format!(
                "{} must be an http(s) URL, got '{}'",
                ENV_API_BASE, api_base
            )));
        }

        let mut config = Self::new(api_base.trim());

        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::invalid_value(format!(
                    "{} must be whole seconds, got '{}'",
                    ENV_HTTP_TIMEOUT_SECS, raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_base_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingEnv);
    }

    #[test]
    fn test_alias_and_timeout() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("NEXT_PUBLIC_API_URL", "https://api.tender.local"),
            ("TENDER_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://api.tender.local");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_primary_wins_over_alias() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("API_BASE", "http://primary"),
            ("NEXT_PUBLIC_API_URL", "http://alias"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://primary");
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_invalid_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[("API_BASE", "ftp://x")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("API_BASE", "http://x"),
            ("TENDER_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }
}
