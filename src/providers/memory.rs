//! In-memory Config Store
//!
//! Thread-safe store berbasis DashMap, dipakai untuk test dan mode offline.
//! Bisa disetel untuk menolak write, memutus koneksi, atau menormalisasi
//! config saat disimpan (meniru normalisasi server-side).

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::store::ConfigStore;
use crate::models::config::Config;
use crate::models::errors::{AppError, AppResult};

type Normalizer = Arc<dyn Fn(Config) -> Config + Send + Sync>;

/// [`ConfigStore`] backed by a concurrent map
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    /// user id -> durable config
    configs: Arc<DashMap<String, Config>>,
    instansi: Arc<RwLock<Vec<String>>>,
    normalizer: Option<Normalizer>,
    /// Status returned for every write while non-zero
    reject_status: Arc<AtomicU16>,
    offline: Arc<AtomicBool>,
    reads: Arc<AtomicU64>,
    writes: Arc<AtomicU64>,
}

impl std::fmt::Debug for InMemoryConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConfigStore")
            .field("users", &self.configs.len())
            .field("reads", &self.read_count())
            .field("writes", &self.write_count())
            .finish()
    }
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the instansi option list
    pub fn with_instansi(self, options: Vec<String>) -> Self {
        if let Ok(mut guard) = self.instansi.write() {
            *guard = options;
        }
        self
    }

    /// Apply `f` to every config accepted by `put_config`
    pub fn with_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(Config) -> Config + Send + Sync + 'static,
    {
        self.normalizer = Some(Arc::new(f));
        self
    }

    /// Store a config directly, bypassing counters and failure knobs
    pub fn insert(&self, user_id: impl Into<String>, config: Config) {
        self.configs.insert(user_id.into(), config);
    }

    pub fn get(&self, user_id: &str) -> Option<Config> {
        self.configs.get(user_id).map(|entry| entry.value().clone())
    }

    /// Answer writes with `status` (pass `None` to accept writes again)
    pub fn reject_writes(&self, status: Option<u16>) {
        self.reject_status.store(status.unwrap_or(0), Ordering::SeqCst);
    }

    /// Simulate a transport failure on every call
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Config store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn fetch_config(&self, user_id: &str) -> AppResult<Config> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.check_online()?;
        debug!("📥 memory read {}", user_id);
        self.get(user_id).ok_or_else(|| AppError::not_found(user_id))
    }

    async fn put_config(&self, user_id: &str, config: &Config) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.check_online()?;

        let status = self.reject_status.load(Ordering::SeqCst);
        if status != 0 {
            return Err(AppError::rejected(status));
        }

        let stored = match &self.normalizer {
            Some(normalize) => normalize(config.clone()),
            None => config.clone(),
        };
        debug!("📤 memory write {}", user_id);
        self.configs.insert(user_id.to_string(), stored);
        Ok(())
    }

    async fn fetch_instansi(&self) -> AppResult<Vec<String>> {
        self.check_online()?;
        Ok(self.instansi.read().map(|v| v.clone()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ListField;
    use crate::models::errors::ErrorCode;

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = InMemoryConfigStore::new();
        let err = store.fetch_config("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_put_then_fetch_applies_normalizer() {
        let store = InMemoryConfigStore::new().with_normalizer(|c| {
            c.remove_list_item(ListField::JenisProyek, "")
        });
        let c = Config::default()
            .append_list_item(ListField::JenisProyek, "")
            .append_list_item(ListField::JenisProyek, "Jasa Lainnya");
        store.put_config("u1", &c).await.unwrap();

        let stored = store.fetch_config("u1").await.unwrap();
        assert_eq!(stored.jenis_proyek.as_slice(), &["Jasa Lainnya".to_string()]);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_knobs() {
        let store = InMemoryConfigStore::new();
        store.insert("u1", Config::default());

        store.reject_writes(Some(422));
        let err = store.put_config("u1", &Config::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);

        store.reject_writes(None);
        store.set_offline(true);
        let err = store.fetch_config("u1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);
        assert!(store.fetch_instansi().await.is_err());
    }
}
