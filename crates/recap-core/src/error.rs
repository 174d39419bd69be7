//! Error types for the recap captcha recognition gateway.
//!
//! Errors are split by boundary: configuration problems are fatal at startup,
//! recognition problems are recovered per-request at the HTTP gateway.

use thiserror::Error;

/// Top-level error type for recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Recognition dispatch errors
    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
///
/// All of these abort startup; none of them is ever produced per-request.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No usable API credentials
    #[error("No API credentials configured: {0}")]
    Credentials(String),
}

/// Errors from a single recognition attempt.
///
/// These are the upstream failures the gateway recovers from: logged with
/// detail server-side, surfaced to the caller as a generic 500.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The outbound HTTP request could not be sent or completed
    #[error("Recognition request failed: {message}")]
    Request { message: String },

    /// The recognition API returned a non-success status
    #[error("Recognition API HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Malformed recognition response: {message}")]
    MalformedResponse { message: String },

    /// The attempt exceeded its deadline
    #[error("Recognition timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The worker task panicked or was cancelled before producing a result
    #[error("Recognition worker failed: {message}")]
    Worker { message: String },
}

/// Convenience type alias for recap results.
pub type Result<T> = std::result::Result<T, RecapError>;
