//! Error types and recovery strategies for VinylCast
//!
//! Every failure the player, the community board or the assistant can hit is
//! classified into one of three severity tiers:
//! - **Recoverable**: the user can simply try again (network glitch, quota)
//! - **Degraded**: one feature is unavailable but the session continues
//!   (unplayable episode, rejected playback)
//! - **Fatal**: the application cannot continue without user action
//!   (broken bundled data, invalid configuration)
//!
//! Each error also carries a recovery action and a user-facing message, so
//! call sites can surface failures as text instead of propagating them into
//! the presentation layer.

use std::fmt;
use std::io;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Try the same operation again right away
    RetryImmediate,
    /// Wait for the quota window to reset, then try again
    WaitAndRetry,
    /// Re-select the episode (or pick a different one)
    SelectAgain,
    /// Correct the input and resubmit
    FixInput,
    /// Disable the failing feature and continue
    DisableFeature,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryImmediate => write!(f, "Retry now"),
            Self::WaitAndRetry => write!(f, "Wait and retry"),
            Self::SelectAgain => write!(f, "Select the episode again"),
            Self::FixInput => write!(f, "Fix the input"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be recovered from by retrying
    Recoverable,
    /// Feature degraded but the session can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for VinylCast
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Playback Errors =====
    /// Audio source unreachable or unsupported
    #[error("Failed to load audio from {source_url}: {detail}")]
    LoadError { source_url: String, detail: String },

    /// The audio engine refused to start playback
    #[error("Playback refused: {detail}")]
    PlayError { detail: String },

    // ===== Remote Service Errors =====
    /// Community store or assistant request failed
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Assistant endpoint quota or rate limit exhausted
    #[error("Quota exceeded: {message}")]
    QuotaError { message: String },

    // ===== Input and Data Errors =====
    /// User input rejected before reaching a remote service
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Bundled or user-supplied dataset is malformed
    #[error("Invalid {dataset} data: {reason}")]
    InvalidData { dataset: String, reason: String },

    /// Requested item does not exist
    #[error("Not found: {entity} with {identifier}")]
    NotFound { entity: String, identifier: String },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    // ===== Generic Errors =====
    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Operation cancelled (superseded or shut down)
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NetworkError { .. }
            | Self::QuotaError { .. }
            | Self::InvalidInput { .. }
            | Self::Cancelled { .. } => ErrorSeverity::Recoverable,

            Self::LoadError { .. } | Self::PlayError { .. } | Self::NotFound { .. } => {
                ErrorSeverity::Degraded
            }

            Self::InvalidData { .. } | Self::InvalidConfiguration { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::NetworkError { .. } | Self::Cancelled { .. } => RecoveryAction::RetryImmediate,
            Self::QuotaError { .. } => RecoveryAction::WaitAndRetry,
            Self::LoadError { .. } | Self::PlayError { .. } => RecoveryAction::SelectAgain,
            Self::InvalidInput { .. } => RecoveryAction::FixInput,
            Self::NotFound { .. } => RecoveryAction::DisableFeature,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Self::LoadError { .. } => {
                "This episode could not be loaded. Select it again or pick another one.".to_string()
            }
            Self::PlayError { .. } => {
                "Playback was blocked. Press play again to start listening.".to_string()
            }
            Self::NetworkError { .. } => {
                "Cannot reach the server. Please check your connection and try again.".to_string()
            }
            Self::QuotaError { .. } => {
                "The assistant has used up its request quota. Please wait a moment or use a new API key.".to_string()
            }
            Self::InvalidInput { field, reason } => format!("Please check {}: {}.", field, reason),
            Self::InvalidData { dataset, .. } => {
                format!("The {} content is damaged and cannot be shown.", dataset)
            }
            Self::NotFound { .. } => "The requested item was not found.".to_string(),
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::Cancelled { .. } => "Operation was cancelled.".to_string(),
            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Returns true if simply trying again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.recovery_action(),
            RecoveryAction::RetryImmediate | RecoveryAction::WaitAndRetry
        )
    }

    /// Helper to create a network error from any error type
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create an input validation error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a dataset error
    pub fn invalid_data(dataset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            dataset: dataset.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}
