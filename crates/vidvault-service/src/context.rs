//! Per-request context carrying the request id and its deadline.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use uuid::Uuid;

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;

/// Context for the current request.
///
/// Created by the delivery layer and passed into every service method so
/// that store and filesystem calls share one deadline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id for logs.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    deadline: Instant,
}

impl RequestContext {
    /// Creates a context whose deadline is `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self::with_request_id(Uuid::new_v4(), timeout)
    }

    /// Creates a context for an already assigned request id.
    pub fn with_request_id(request_id: Uuid, timeout: Duration) -> Self {
        Self {
            request_id,
            request_time: Utc::now(),
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Await `fut`, failing with `ErrorKind::Timeout` if the deadline passes first.
    ///
    /// The inner future is dropped on timeout.
    pub async fn run<F, T>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "Request {} exceeded its deadline",
                self.request_id
            ))),
        }
    }
}
