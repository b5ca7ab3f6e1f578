//! Save notifications
//!
//! Satu notifikasi per percobaan save, diidentifikasi oleh `attempt_id`:
//! muncul sebagai `Pending`, lalu di-resolve tepat sekali menjadi `Success`
//! atau `Failure` (seperti satu toast yang diperbarui di tempat).
//! Subscriber (UI, logger) menerima lewat tokio broadcast channel.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::errors::{AppError, ErrorCode};
use crate::utils::constants::{
    MSG_SAVE_FAILURE, MSG_SAVE_PENDING, MSG_SAVE_SUCCESS, NOTIFICATION_CHANNEL_CAPACITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Pending,
    Success,
    Failure,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A user-visible save notification state
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Shared by the pending and the resolved state of one save attempt
    pub attempt_id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub error_code: Option<ErrorCode>,
    pub at: DateTime<Utc>,
}

/// Counters over all save attempts seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

impl NotificationStats {
    /// Attempts still waiting for their terminal notification
    pub fn in_flight(&self) -> u64 {
        self.attempts.saturating_sub(self.successes + self.failures)
    }
}

/// Fan-out point for save notifications
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self {
            sender,
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Open a new save attempt and announce it as pending
    pub fn save_pending(&self, user_id: &str) -> Uuid {
        let attempt_id = Uuid::new_v4();
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.emit(Notification {
            attempt_id,
            user_id: user_id.to_string(),
            kind: NotificationKind::Pending,
            message: MSG_SAVE_PENDING.to_string(),
            error_code: None,
            at: Utc::now(),
        });
        attempt_id
    }

    pub fn save_succeeded(&self, attempt_id: Uuid, user_id: &str) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.emit(Notification {
            attempt_id,
            user_id: user_id.to_string(),
            kind: NotificationKind::Success,
            message: MSG_SAVE_SUCCESS.to_string(),
            error_code: None,
            at: Utc::now(),
        });
    }

    pub fn save_failed(&self, attempt_id: Uuid, user_id: &str, error: &AppError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.emit(Notification {
            attempt_id,
            user_id: user_id.to_string(),
            kind: NotificationKind::Failure,
            message: MSG_SAVE_FAILURE.to_string(),
            error_code: Some(error.code),
            at: Utc::now(),
        });
    }

    pub fn stats(&self) -> NotificationStats {
        NotificationStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn emit(&self, notification: Notification) {
        debug!(
            "🔔 {} {} ({})",
            notification.kind.as_str(),
            notification.message,
            notification.attempt_id
        );
        // No subscribers is fine: counters still track the attempt
        let _ = self.sender.send(notification);
    }
}
