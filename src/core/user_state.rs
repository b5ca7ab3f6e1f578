//! Shared "current user" state and the session capability
//!
//! `UserStateStore` adalah satu-satunya tempat aplikasi membaca user yang
//! sedang login. Sub-field `config` hanya diganti lewat `publish`, yang
//! dipanggil SyncController setelah save berhasil (last successful save wins).

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::models::config::Config;
use crate::models::errors::AppResult;
use crate::models::types::CurrentUser;

/// Session/auth layer as consumed by this crate: it can be handed a
/// refreshed user payload and may refuse it.
#[async_trait]
pub trait SessionLayer: Send + Sync {
    async fn refresh(&self, user: &CurrentUser) -> AppResult<()>;
}

/// Session layer that accepts every payload (CLI, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSession;

#[async_trait]
impl SessionLayer for NoopSession {
    async fn refresh(&self, user: &CurrentUser) -> AppResult<()> {
        debug!("🔐 session refresh skipped for {}", user.id);
        Ok(())
    }
}

/// Holder of the application-wide current user
#[derive(Debug, Default)]
pub struct UserStateStore {
    current: Arc<RwLock<Option<CurrentUser>>>,
}

impl UserStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: CurrentUser) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(user))),
        }
    }

    /// Replace the signed-in user (session/auth plumbing)
    pub fn sign_in(&self, user: CurrentUser) {
        if let Ok(mut guard) = self.current.write() {
            info!("👤 Signed in as {}", user.id);
            *guard = Some(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.current.write() {
            *guard = None;
        }
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|u| u.id.clone()))
    }

    /// The user payload that publishing `config` for `user_id` would produce.
    /// `None` when `user_id` is no longer the signed-in user.
    pub fn prepare(&self, user_id: &str, config: Config) -> Option<CurrentUser> {
        let guard = self.current.read().ok()?;
        match guard.as_ref() {
            Some(user) if user.id == user_id => Some(user.with_config(config)),
            _ => None,
        }
    }

    /// Install a confirmed config. Ignored when the signed-in user changed
    /// since the payload was prepared.
    pub fn publish(&self, next: CurrentUser) -> bool {
        let Ok(mut guard) = self.current.write() else {
            return false;
        };
        match guard.as_mut() {
            Some(user) if user.id == next.id => {
                info!("📣 Published confirmed config for {}", next.id);
                *user = next;
                true
            }
            _ => {
                warn!("⚠️ Dropped config publish for {}: user changed", next.id);
                false
            }
        }
    }
}
