//! Config Store abstraction
//!
//! Store of record untuk Config per user. Implementasi HTTP ada di
//! `providers::http`, implementasi in-memory di `providers::memory`.

use async_trait::async_trait;

use crate::models::config::Config;
use crate::models::errors::AppResult;

/// Remote owner of durable per-user configuration
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored config.
    ///
    /// Fails with `NotFound` when the user has none, `Unavailable` on
    /// transport failure or an unusable response.
    async fn fetch_config(&self, user_id: &str) -> AppResult<Config>;

    /// Replace the stored config wholesale.
    ///
    /// Fails with `Unavailable` on transport failure, `Rejected` when the
    /// store answers with a non-success status.
    async fn put_config(&self, user_id: &str, config: &Config) -> AppResult<()>;

    /// Valid `penyelenggara_proyek` values
    async fn fetch_instansi(&self) -> AppResult<Vec<String>>;
}
