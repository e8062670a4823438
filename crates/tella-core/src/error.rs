//! Error types for the Tella chat client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Tella client crates.
///
/// Remote failures carry enough structure (`status`, `detail`) for the chat
/// view to build a human-readable explanation without string sniffing.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TellaError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Http {
        status: u16,
        /// The `detail` field of the error body, if the server sent one.
        detail: Option<String>,
    },

    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TellaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Http error
    pub fn http(status: u16, detail: Option<String>) -> Self {
        Self::Http { status, detail }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an HTTP status error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The explanation shown to the user inside an error chat bubble.
    ///
    /// Preference order:
    /// 1. the server-provided `detail`
    /// 2. the generic status line for HTTP failures
    /// 3. the transport error message
    ///
    /// Returns `None` when nothing meaningful is available; callers then fall
    /// back to a localized "unknown error" phrase.
    pub fn user_detail(&self) -> Option<String> {
        let detail = match self {
            Self::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Http { status, .. } => format!("Request failed with status code {status}"),
            Self::Transport(message) | Self::Config(message) | Self::Internal(message) => {
                message.clone()
            }
            Self::Serialization { message, .. } | Self::Io { message } => message.clone(),
        };

        let trimmed = detail.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TellaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TellaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TellaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TellaError>`.
pub type Result<T> = std::result::Result<T, TellaError>;
