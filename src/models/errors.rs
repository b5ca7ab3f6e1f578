//! Centralized Error Handling Module
//!
//! Setiap kegagalan punya kode error yang unik supaya log mudah difilter.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CFG_xxx: stored configuration errors
//! - SYNC_xxx: Config Store synchronization errors
//! - EDIT_xxx: editor / edit boundary errors
//! - ENV_xxx: client configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ============================================
    // Stored Config Errors
    // ============================================
    /// User has no stored config yet (use default template)
    NotFound,

    // ============================================
    // Sync Errors
    // ============================================
    /// Network/transport failure, or unusable response
    Unavailable,
    /// Store answered a write with a non-success status
    Rejected,
    /// Session/auth layer refused the refreshed payload
    SessionRefreshFailed,
    /// Signed-in user changed before the confirmed config was published
    UserChanged,

    // ============================================
    // Edit Errors
    // ============================================
    /// Numeric field input is not an integer
    InvalidNumber,
    /// Edit or save attempted while a save is in flight
    Busy,
    /// Edit or save attempted before a config was loaded
    NotReady,
    /// Field name does not exist on Config
    UnknownField,

    // ============================================
    // Client Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "CFG_NOT_FOUND",

            Self::Unavailable => "SYNC_UNAVAILABLE",
            Self::Rejected => "SYNC_REJECTED",
            Self::SessionRefreshFailed => "SYNC_SESSION_REFRESH_FAILED",
            Self::UserChanged => "SYNC_USER_CHANGED",

            Self::InvalidNumber => "EDIT_INVALID_NUMBER",
            Self::Busy => "EDIT_BUSY",
            Self::NotReady => "EDIT_NOT_READY",
            Self::UnknownField => "EDIT_UNKNOWN_FIELD",

            Self::ConfigMissingEnv => "ENV_MISSING",
            Self::ConfigInvalidValue => "ENV_INVALID_VALUE",
        }
    }

    /// Load failures of this kind degrade to the default template
    pub fn falls_back_to_default(&self) -> bool {
        matches!(self, Self::NotFound | Self::Unavailable)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// No stored config for user
    pub fn not_found(user_id: &str) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("No stored config for user {}", user_id),
        )
    }

    /// Transport failure or unusable response
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, msg)
    }

    /// Store rejected a write
    pub fn rejected(status: u16) -> Self {
        Self::new(
            ErrorCode::Rejected,
            format!("Config store rejected write (HTTP {})", status),
        )
    }

    /// Session layer refused the refreshed user payload
    pub fn session_refresh_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionRefreshFailed, msg)
    }

    /// Confirmed config no longer belongs to the signed-in user
    pub fn user_changed(user_id: &str) -> Self {
        Self::new(
            ErrorCode::UserChanged,
            format!("{} is no longer the signed-in user", user_id),
        )
    }

    /// Non-integer input for a numeric field
    pub fn invalid_number(field: &str, input: &str) -> Self {
        Self::new(
            ErrorCode::InvalidNumber,
            format!("'{}' is not a valid integer for {}", input, field),
        )
    }

    /// Save in flight
    pub fn busy() -> Self {
        Self::new(ErrorCode::Busy, "A save is in progress")
    }

    /// No working config yet
    pub fn not_ready(phase: &str) -> Self {
        Self::new(
            ErrorCode::NotReady,
            format!("Editor is {}, no working config yet", phase),
        )
    }

    /// Unknown field name
    pub fn unknown_field(name: &str) -> Self {
        Self::new(ErrorCode::UnknownField, format!("Unknown config field: {}", name))
    }

    /// Missing environment variable
    pub fn missing_env(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingEnv,
            format!("Missing environment variable: {}", key_name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::Unavailable, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::Unavailable, "Connection failed")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::Unavailable, "Malformed response body", err)
        } else {
            Self::with_source(ErrorCode::Unavailable, "Transport error", err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unavailable, "JSON parse error", err)
    }
}
