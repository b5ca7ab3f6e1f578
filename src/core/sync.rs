//! Sync Controller
//!
//! Orkestrasi antara editor lokal dan Config Store:
//! - load: tepat satu read saat mount
//! - save: satu write, lalu satu read konfirmasi setelah write di-ack
//! - propagasi: hasil read konfirmasi (bukan working copy lokal) dikirim ke
//!   session layer dulu, lalu ke UserStateStore. Kalau session menolak,
//!   save dianggap gagal dan user state tidak disentuh. Kalau user yang
//!   login sudah berganti sebelum publish, save juga dianggap gagal.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::user_state::{SessionLayer, UserStateStore};
use crate::models::config::Config;
use crate::models::errors::{AppError, AppResult};
use crate::providers::store::ConfigStore;
use crate::utils::notify::NotificationCenter;

/// Load/save orchestration against a [`ConfigStore`]
pub struct SyncController {
    store: Arc<dyn ConfigStore>,
    user_state: Arc<UserStateStore>,
    session: Arc<dyn SessionLayer>,
    notifications: Arc<NotificationCenter>,
}

impl SyncController {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        user_state: Arc<UserStateStore>,
        session: Arc<dyn SessionLayer>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            store,
            user_state,
            session,
            notifications,
        }
    }

    pub fn user_state(&self) -> &Arc<UserStateStore> {
        &self.user_state
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    /// Fetch the stored config for `user_id`
    pub async fn load(&self, user_id: &str) -> AppResult<Config> {
        let start = Instant::now();
        let result = self.store.fetch_config(user_id).await;
        match &result {
            Ok(_) => info!(
                "✅ Loaded config for {} in {:.1}ms",
                user_id,
                start.elapsed().as_secs_f64() * 1000.0
            ),
            Err(e) => warn!("⚠️ Config load for {} failed: {}", user_id, e),
        }
        result
    }

    /// Same as [`SyncController::load`], degrading every failure to the
    /// default template
    pub async fn load_or_default(&self, user_id: &str) -> Config {
        self.load(user_id).await.unwrap_or_default()
    }

    /// Write `config`, read back the canonical config and propagate it.
    ///
    /// Emits one pending notification and exactly one terminal notification.
    pub async fn save(&self, user_id: &str, config: &Config) -> AppResult<Config> {
        let attempt = self.notifications.save_pending(user_id);
        let start = Instant::now();

        let result = self.write_and_confirm(user_id, config).await;

        match &result {
            Ok(_) => {
                info!(
                    "✅ Config saved for {} in {:.1}ms",
                    user_id,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                self.notifications.save_succeeded(attempt, user_id);
            }
            Err(e) => {
                error!("❌ Config save for {} failed: {}", user_id, e);
                self.notifications.save_failed(attempt, user_id, e);
            }
        }
        result
    }

    async fn write_and_confirm(&self, user_id: &str, config: &Config) -> AppResult<Config> {
        self.store.put_config(user_id, config).await?;
        let canonical = self.store.fetch_config(user_id).await?;
        self.propagate(user_id, canonical.clone()).await?;
        Ok(canonical)
    }

    /// Session first, then user state. Succeeds only when both took the
    /// confirmed config.
    async fn propagate(&self, user_id: &str, canonical: Config) -> AppResult<()> {
        let Some(next) = self.user_state.prepare(user_id, canonical) else {
            warn!("⚠️ {} is no longer the current user, nothing propagated", user_id);
            return Err(AppError::user_changed(user_id));
        };

        self.session.refresh(&next).await.map_err(|e| {
            AppError::session_refresh_failed(format!(
                "Session refresh for {} failed: {}",
                user_id, e
            ))
        })?;

        // User may have switched while the session refresh was in flight
        if !self.user_state.publish(next) {
            return Err(AppError::user_changed(user_id));
        }
        Ok(())
    }

    /// `penyelenggara_proyek` option list
    pub async fn instansi_options(&self) -> AppResult<Vec<String>> {
        self.store.fetch_instansi().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user_state::NoopSession;
    use crate::models::config::ListField;
    use crate::models::errors::ErrorCode;
    use crate::models::types::CurrentUser;
    use crate::providers::memory::InMemoryConfigStore;
    use crate::utils::notify::NotificationKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct RefusingSession;

    #[async_trait]
    impl SessionLayer for RefusingSession {
        async fn refresh(&self, _user: &CurrentUser) -> AppResult<()> {
            Err(AppError::unavailable("session endpoint down"))
        }
    }

    #[derive(Default)]
    struct CountingSession {
        refreshed: AtomicU64,
    }

    #[async_trait]
    impl SessionLayer for CountingSession {
        async fn refresh(&self, _user: &CurrentUser) -> AppResult<()> {
            self.refreshed.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    /// Accepts the payload, but a different user signs in meanwhile
    struct SwitchingSession {
        users: Arc<UserStateStore>,
    }

    #[async_trait]
    impl SessionLayer for SwitchingSession {
        async fn refresh(&self, _user: &CurrentUser) -> AppResult<()> {
            self.users.sign_in(CurrentUser::new("u2", Config::default()));
            Ok(())
        }
    }

    fn controller(
        store: InMemoryConfigStore,
        session: Arc<dyn SessionLayer>,
    ) -> (SyncController, Arc<UserStateStore>) {
        let users = Arc::new(UserStateStore::with_user(CurrentUser::new("u1", Config::default())));
        let ctl = SyncController::new(
            Arc::new(store),
            users.clone(),
            session,
            Arc::new(NotificationCenter::new()),
        );
        (ctl, users)
    }

    #[tokio::test]
    async fn test_load_counts_one_read() {
        let store = InMemoryConfigStore::new();
        store.insert("u1", Config::default().append_list_item(ListField::JenisProyek, "A"));
        let (ctl, _) = controller(store.clone(), Arc::new(NoopSession));

        let c = ctl.load("u1").await.unwrap();
        assert_eq!(c.jenis_proyek.len(), 1);
        assert_eq!(store.read_count(), 1);

        assert_eq!(ctl.load("nobody").await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(ctl.load_or_default("nobody").await, Config::default());
    }

    #[tokio::test]
    async fn test_save_publishes_confirmed_not_local() {
        let store = InMemoryConfigStore::new()
            .with_normalizer(|c| c.append_list_item(ListField::PenyelenggaraProyek, "normalized"));
        let session = Arc::new(CountingSession::default());
        let (ctl, users) = controller(store.clone(), session.clone());

        let c1 = Config::default().append_list_item(ListField::JenisProyek, "Jasa Lainnya");
        let c2 = ctl.save("u1", &c1).await.unwrap();

        assert_ne!(c1, c2);
        assert_eq!(users.current().unwrap().config, c2);
        assert_eq!(session.refreshed.load(Ordering::Relaxed), 1);
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_user_state() {
        let store = InMemoryConfigStore::new();
        store.reject_writes(Some(500));
        let (ctl, users) = controller(store.clone(), Arc::new(NoopSession));
        let mut rx = ctl.notifications().subscribe();

        let c1 = Config::default().append_list_item(ListField::JenisProyek, "A");
        let err = ctl.save("u1", &c1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(users.current().unwrap().config, Config::default());
        assert_eq!(store.read_count(), 0);

        assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Pending);
        let terminal = rx.recv().await.unwrap();
        assert_eq!(terminal.kind, NotificationKind::Failure);
        assert_eq!(terminal.error_code, Some(ErrorCode::Rejected));
    }

    #[tokio::test]
    async fn test_session_refusal_fails_save_atomically() {
        let store = InMemoryConfigStore::new();
        let (ctl, users) = controller(store, Arc::new(RefusingSession));

        let c1 = Config::default().append_list_item(ListField::JenisProyek, "A");
        let err = ctl.save("u1", &c1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionRefreshFailed);
        assert_eq!(users.current().unwrap().config, Config::default());

        let stats = ctl.notifications().stats();
        assert_eq!((stats.attempts, stats.failures), (1, 1));
    }

    #[tokio::test]
    async fn test_offline_save_is_unavailable() {
        let store = InMemoryConfigStore::new();
        store.set_offline(true);
        let (ctl, _) = controller(store, Arc::new(NoopSession));
        let err = ctl.save("u1", &Config::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);
    }

    #[tokio::test]
    async fn test_user_switch_during_session_refresh_fails_save() {
        let users = Arc::new(UserStateStore::with_user(CurrentUser::new("u1", Config::default())));
        let ctl = SyncController::new(
            Arc::new(InMemoryConfigStore::new()),
            users.clone(),
            Arc::new(SwitchingSession { users: users.clone() }),
            Arc::new(NotificationCenter::new()),
        );
        let mut rx = ctl.notifications().subscribe();

        let c1 = Config::default().append_list_item(ListField::JenisProyek, "A");
        let err = ctl.save("u1", &c1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserChanged);

        let current = users.current().unwrap();
        assert_eq!(current.id, "u2");
        assert_eq!(current.config, Config::default());

        assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Pending);
        let terminal = rx.recv().await.unwrap();
        assert_eq!(terminal.kind, NotificationKind::Failure);
        assert_eq!(terminal.error_code, Some(ErrorCode::UserChanged));
        let stats = ctl.notifications().stats();
        assert_eq!((stats.attempts, stats.successes, stats.failures), (1, 0, 1));
    }

    #[tokio::test]
    async fn test_save_for_signed_out_user_fails() {
        let store = InMemoryConfigStore::new();
        let (ctl, users) = controller(store.clone(), Arc::new(NoopSession));
        users.sign_out();

        let err = ctl.save("u1", &Config::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserChanged);
        assert_eq!(ctl.notifications().stats().failures, 1);
    }

    #[tokio::test]
    async fn test_instansi_options_come_from_store() {
        let store = InMemoryConfigStore::new()
            .with_instansi(vec!["Kementerian PUPR".to_string(), "Kota Bogor".to_string()]);
        let (ctl, _) = controller(store, Arc::new(NoopSession));
        let options = ctl.instansi_options().await.unwrap();
        assert_eq!(options, vec!["Kementerian PUPR".to_string(), "Kota Bogor".to_string()]);
    }
}
