//! Per-request dispatch of recognition workers.
//!
//! Each inbound request gets one freshly spawned tokio task that makes the
//! outbound recognition call with the next rotated credential. Concurrency is
//! bounded by a semaphore; callers queue on a permit when the pool of workers
//! is saturated. Each attempt runs under a deadline, and the worker task is
//! aborted if the awaiting request goes away.

use crate::config::DispatchConfig;
use crate::credentials::CredentialPool;
use crate::error::RecognitionError;
use crate::recognition::{ImageInput, RecognitionClient};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Something that can turn a base64 captcha payload into text.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the gateway holds an `Arc<dyn Solver>` so tests can inject a mock).
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve one captcha. One attempt, one credential, one outcome.
    async fn solve(&self, base64_image: String) -> Result<String, RecognitionError>;
}

/// Dispatches one bounded, deadline-guarded worker task per request.
pub struct Dispatcher {
    client: Arc<RecognitionClient>,
    pool: Arc<CredentialPool>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl Dispatcher {
    /// Build a dispatcher over a shared credential pool.
    pub fn new(
        client: RecognitionClient,
        pool: Arc<CredentialPool>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            client: Arc::new(client),
            pool,
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Join handle wrapper that aborts the task when dropped.
///
/// Ties the worker's lifetime to the awaiting request: when the HTTP client
/// disconnects and the response future is dropped, the in-flight recognition
/// call is cancelled instead of running detached. The same guard cancels the
/// worker when the deadline fires.
struct WorkerHandle<T>(JoinHandle<T>);

impl<T> Drop for WorkerHandle<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[async_trait]
impl Solver for Dispatcher {
    async fn solve(&self, base64_image: String) -> Result<String, RecognitionError> {
        // Backpressure: queue here until a worker slot frees up.
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RecognitionError::Worker {
                message: "dispatch semaphore closed".to_string(),
            })?;

        let credential = self.pool.next().to_string();
        let client = self.client.clone();

        let mut worker = WorkerHandle(tokio::spawn(async move {
            // Permit is held for the worker's whole lifetime, including the
            // time between the caller timing out and the abort landing.
            let _permit = permit;
            let image = ImageInput::from_base64(base64_image);
            client.extract_text(&image, &credential).await
        }));

        let timeout_ms = self.timeout.as_millis() as u64;
        match tokio::time::timeout(self.timeout, &mut worker.0).await {
            Ok(Ok(result)) => result,
            // The task panicked or was aborted before completing.
            Ok(Err(join_err)) => Err(RecognitionError::Worker {
                message: join_err.to_string(),
            }),
            Err(_) => Err(RecognitionError::Timeout { timeout_ms }),
        }
    }
}
