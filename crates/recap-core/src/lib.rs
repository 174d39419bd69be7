//! Recap Core - captcha recognition library.
//!
//! Recap forwards base64-encoded captcha images to an external
//! OpenAI-compatible multimodal API and returns the recognized text.
//!
//! # Architecture
//!
//! ```text
//! HTTP gateway → CredentialPool.next() → Dispatcher → worker task → recognition API
//! ```
//!
//! The library half holds everything below the HTTP surface: configuration,
//! the rotating credential pool, the recognition client, and the bounded
//! per-request dispatcher. The `recap` binary wires these into an axum
//! server.
//!
//! # Usage
//!
//! ```rust,ignore
//! use recap_core::{Config, CredentialPool, Dispatcher, RecognitionClient, Solver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> recap_core::Result<()> {
//!     let config = Config::load()?;
//!     let pool = Arc::new(CredentialPool::from_env()?);
//!     let client = RecognitionClient::new(&config.recognition);
//!     let dispatcher = Dispatcher::new(client, pool, &config.dispatch);
//!
//!     let text = dispatcher.solve(base64_image).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod recognition;

// Re-exports for convenient access
pub use config::Config;
pub use credentials::CredentialPool;
pub use dispatch::{Dispatcher, Solver};
pub use error::{ConfigError, RecapError, RecognitionError, Result};
pub use recognition::{ImageInput, RecognitionClient};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
