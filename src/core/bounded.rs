// src/core/bounded.rs

//! A single combinator for every unreliable source: race the operation against a
//! deadline and hand back a typed fallback when the deadline wins or the operation
//! fails. Nothing wrapped here can raise an error to the caller.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// The settled outcome of a bounded task.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundedTaskResult<T> {
    /// The operation settled before the deadline. If it failed, this carries the
    /// fallback value.
    Completed(T),
    /// The deadline expired first; carries the fallback value.
    TimedOut(T),
}

impl<T> BoundedTaskResult<T> {
    pub fn into_inner(self) -> T {
        match self {
            BoundedTaskResult::Completed(value) | BoundedTaskResult::TimedOut(value) => value,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, BoundedTaskResult::TimedOut(_))
    }
}

/// Runs `operation` with a deadline of `budget`.
///
/// On expiry the operation future is dropped, which cancels any I/O that supports
/// cancellation; blocking work that cannot be cancelled keeps running in the
/// background and its result is discarded.
///
/// # Arguments
/// * `task` - A short label used in log lines.
/// * `budget` - The deadline for the operation.
/// * `fallback` - The value returned on timeout or failure.
/// * `operation` - The fallible operation to run.
pub async fn run_bounded<T, E, F>(
    task: &'static str,
    budget: Duration,
    fallback: T,
    operation: F,
) -> BoundedTaskResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(Ok(value)) => {
            debug!(task, "Bounded task completed.");
            BoundedTaskResult::Completed(value)
        }
        Ok(Err(e)) => {
            warn!(task, error = %e, "Source failed, substituting fallback.");
            BoundedTaskResult::Completed(fallback)
        }
        Err(_) => {
            warn!(task, budget_ms = budget.as_millis() as u64, "Source timed out, substituting fallback.");
            BoundedTaskResult::TimedOut(fallback)
        }
    }
}
