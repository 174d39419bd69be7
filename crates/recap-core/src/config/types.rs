//! Sub-configuration structs with defaults matching the reference deployment.

use serde::{Deserialize, Serialize};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Outbound recognition API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Per-attempt deadline in milliseconds
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint:
                "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
                    .to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            timeout_ms: 30_000,
            max_tokens: 100,
            temperature: 0.0,
        }
    }
}

/// Dispatch concurrency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Max recognition workers in flight; further requests queue on a permit
    pub max_in_flight: usize,

    /// Overall deadline for one dispatched attempt, in milliseconds
    pub timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 32,
            timeout_ms: 30_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
