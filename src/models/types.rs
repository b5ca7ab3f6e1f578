//! Wire types and shared user state shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::Config;

/// `GET /user/config/{userId}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEnvelope {
    /// Null or missing means the user has no stored config
    #[serde(default)]
    pub config: Option<Config>,
}

/// `GET /scrape/instansi` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstansiResponse {
    #[serde(default)]
    pub data: Vec<String>,
}

/// The "current user" object the rest of the application reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub config: Config,
    /// When `config` was last replaced by a confirmed save
    #[serde(default)]
    pub config_synced_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, config: Config) -> Self {
        Self {
            id: id.into(),
            config,
            config_synced_at: None,
        }
    }

    /// Copy of this user carrying a freshly confirmed config
    pub fn with_config(&self, config: Config) -> Self {
        Self {
            id: self.id.clone(),
            config,
            config_synced_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_null_config() {
        let env: ConfigEnvelope = serde_json::from_str(r#"{"config":null}"#).unwrap();
        assert!(env.config.is_none());
        let env: ConfigEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.config.is_none());
    }

    #[test]
    fn test_instansi_response() {
        let resp: InstansiResponse =
            serde_json::from_str(r#"{"data":["Kota Bandung","Kementerian PUPR"]}"#).unwrap();
        assert_eq!(resp.data.len(), 2);
    }

    #[test]
    fn test_with_config_stamps_sync_time() {
        let user = CurrentUser::new("u1", Config::default());
        assert!(user.config_synced_at.is_none());
        let next = user.with_config(Config::default());
        assert_eq!(next.id, "u1");
        assert!(next.config_synced_at.is_some());
    }
}
