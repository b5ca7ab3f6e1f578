//! Tender Setting Library
//!
//! Client-side state machine for a user's tender filter configuration
//! ("setting") and its synchronization with the remote Config Store:
//! - Config model with copy-on-write list fields and checked numeric edits
//! - Editor state machine (Uninitialized → Loading → Ready → Saving → Ready | SaveFailed)
//! - Sync controller: load on mount, save + confirmatory read, propagation
//!   into the session layer and the shared current-user state

pub mod config;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::config::ClientConfig;
pub use crate::core::{
    ConfigEditor, Edit, EditorPhase, NoopSession, SessionLayer, SettingPage, SyncController,
    UserStateStore,
};
pub use models::{
    AppError, AppResult, Config, ConfigField, CurrentUser, ErrorCode, ListField, NilaiProyek,
    ScalarField,
};
pub use providers::{ConfigStore, HttpConfigStore, InMemoryConfigStore};
pub use utils::{Notification, NotificationCenter, NotificationKind, NotificationStats};
