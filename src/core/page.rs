//! Setting page driver
//!
//! Menyatukan `ConfigEditor` dan `SyncController` untuk event loop UI.
//! Lock editor tidak pernah ditahan melewati `.await`, jadi edit yang masuk
//! saat save sedang menunggu network langsung mendapat `Busy`.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::editor::{ConfigEditor, Edit, EditorPhase};
use super::sync::SyncController;
use crate::models::config::{Config, ListField, ScalarField};
use crate::models::errors::{AppError, AppResult, ErrorCode};

/// Cheaply clonable handle shared by the page's event handlers
#[derive(Clone)]
pub struct SettingPage {
    editor: Arc<Mutex<ConfigEditor>>,
    controller: Arc<SyncController>,
}

impl SettingPage {
    pub fn new(controller: Arc<SyncController>) -> Self {
        Self {
            editor: Arc::new(Mutex::new(ConfigEditor::new())),
            controller,
        }
    }

    fn editor(&self) -> MutexGuard<'_, ConfigEditor> {
        // Editor state stays consistent across a panicking holder
        self.editor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn controller(&self) -> &Arc<SyncController> {
        &self.controller
    }

    pub fn phase(&self) -> EditorPhase {
        self.editor().phase()
    }

    pub fn snapshot(&self) -> Option<Config> {
        self.editor().working().cloned()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor().is_dirty()
    }

    /// Why the mount fell back to the default template, if it did
    pub fn load_error(&self) -> Option<ErrorCode> {
        self.editor().load_error()
    }

    /// Saving now would replace a stored config that could not be read
    pub fn may_overwrite_unread(&self) -> bool {
        self.editor().may_overwrite_unread()
    }

    /// Load the config for `user_id` and seed the editor.
    ///
    /// Returns the working config, or `None` when another mount or an
    /// unmount superseded this one while the fetch was in flight.
    pub async fn mount(&self, user_id: &str) -> Option<Config> {
        let ticket = {
            let mut editor = self.editor();
            editor.begin_load(user_id)
        };
        let result = self.controller.load(user_id).await;

        let mut editor = self.editor();
        if editor.complete_load(ticket, result) {
            editor.working().cloned()
        } else {
            None
        }
    }

    /// Mount for whoever the shared user state says is signed in
    pub async fn mount_current_user(&self) -> AppResult<Option<Config>> {
        let user_id = self
            .controller
            .user_state()
            .current_user_id()
            .ok_or_else(|| AppError::not_ready(EditorPhase::Uninitialized.as_str()))?;
        Ok(self.mount(&user_id).await)
    }

    pub fn apply(&self, edit: &Edit) -> AppResult<Config> {
        self.editor().apply(edit).cloned()
    }

    pub fn append_list_item(
        &self,
        field: ListField,
        value: impl Into<String>,
    ) -> AppResult<Config> {
        self.apply(&Edit::Append(field, value.into()))
    }

    pub fn remove_list_item(&self, field: ListField, value: &str) -> AppResult<Config> {
        self.apply(&Edit::Remove(field, value.to_string()))
    }

    pub fn set_scalar(&self, field: ScalarField, value: &str) -> AppResult<Config> {
        self.apply(&Edit::Set(field, value.to_string()))
    }

    /// Explicit save action. Returns the canonical config on success.
    pub async fn save(&self) -> AppResult<Config> {
        let ticket = {
            let mut editor = self.editor();
            editor.begin_save()?
        };
        let result = self.controller.save(&ticket.user_id, &ticket.snapshot).await;

        if !self.editor().complete_save(&ticket, &result) {
            debug!("🗑️ Save result for {} arrived after the page moved on", ticket.user_id);
        }
        result
    }

    /// Owning view went away
    pub fn unmount(&self) {
        self.editor().unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user_state::{NoopSession, UserStateStore};
    use crate::models::types::CurrentUser;
    use crate::providers::memory::InMemoryConfigStore;
    use crate::utils::notify::NotificationCenter;

    fn page(store: InMemoryConfigStore) -> (SettingPage, Arc<UserStateStore>) {
        let users = Arc::new(UserStateStore::with_user(CurrentUser::new("u1", Config::default())));
        let ctl = SyncController::new(
            Arc::new(store),
            users.clone(),
            Arc::new(NoopSession),
            Arc::new(NotificationCenter::new()),
        );
        (SettingPage::new(Arc::new(ctl)), users)
    }

    #[tokio::test]
    async fn test_mount_edit_save() {
        let store = InMemoryConfigStore::new();
        store.insert("u1", Config::default());
        let (page, users) = page(store.clone());

        let loaded = page.mount_current_user().await.unwrap().unwrap();
        assert_eq!(loaded, Config::default());
        assert_eq!(page.phase(), EditorPhase::Ready);

        page.append_list_item(ListField::JenisProyek, "Pekerjaan Konstruksi").unwrap();
        page.set_scalar(ScalarField::Min, "5000000").unwrap();
        assert!(page.is_dirty());

        let saved = page.save().await.unwrap();
        assert_eq!(saved.nilai_proyek.min, 5_000_000);
        assert_eq!(store.get("u1"), Some(saved.clone()));
        assert_eq!(users.current().unwrap().config, saved);
        assert!(!page.is_dirty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_working_copy() {
        let store = InMemoryConfigStore::new();
        store.insert("u1", Config::default());
        let (page, users) = page(store.clone());
        page.mount("u1").await.unwrap();

        page.append_list_item(ListField::JenisProyek, "A").unwrap();
        let working = page.snapshot();

        store.reject_writes(Some(503));
        let err = page.save().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(page.phase(), EditorPhase::SaveFailed);
        assert_eq!(page.snapshot(), working);
        assert_eq!(users.current().unwrap().config, Config::default());

        store.reject_writes(None);
        page.save().await.unwrap();
        assert_eq!(page.phase(), EditorPhase::Ready);
    }

    #[tokio::test]
    async fn test_mount_without_user_is_not_ready() {
        let (page, users) = page(InMemoryConfigStore::new());
        users.sign_out();
        let err = page.mount_current_user().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotReady);
    }

    #[tokio::test]
    async fn test_mount_missing_config_uses_default() {
        let (page, _) = page(InMemoryConfigStore::new());
        assert_eq!(page.mount("u1").await, Some(Config::default()));
        assert_eq!(page.load_error(), Some(ErrorCode::NotFound));
        assert!(!page.may_overwrite_unread());
        assert!(page.append_list_item(ListField::PenyelenggaraProyek, "Kota Bogor").is_ok());
    }

    #[tokio::test]
    async fn test_mount_during_outage_flags_unread_config() {
        let store = InMemoryConfigStore::new();
        store.insert("u1", Config::default().append_list_item(ListField::JenisProyek, "A"));
        store.set_offline(true);
        let (page, _) = page(store.clone());

        assert_eq!(page.mount("u1").await, Some(Config::default()));
        assert_eq!(page.load_error(), Some(ErrorCode::Unavailable));
        assert!(page.may_overwrite_unread());

        store.set_offline(false);
        page.mount("u1").await.unwrap();
        assert_eq!(page.load_error(), None);
        assert!(!page.may_overwrite_unread());
    }
}
