//! Poll-with-backoff primitive for asynchronous server-side operations
//!
//! Several portal operations (room archive/unarchive/delete, template
//! generation) only start a job; completion is observed by polling a status
//! endpoint. This module is the one place that loop lives: a probe function
//! is retried on a fixed interval schedule under a hard wall-clock budget,
//! independent of any assertion library, so it is unit-testable with the
//! tokio fake clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::{HarnessError, Result};

/// Retry intervals and overall budget for one polled operation.
///
/// The last interval repeats once the schedule is exhausted. The timeout is
/// wall-clock, independent of the number of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSchedule {
    pub intervals: Vec<Duration>,
    pub timeout: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            intervals: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(5),
            ],
            timeout: Duration::from_secs(30),
        }
    }
}

impl PollSchedule {
    /// Delay before retry number `attempt` (zero-based)
    pub fn delay(&self, attempt: usize) -> Duration {
        self.intervals
            .get(attempt)
            .or_else(|| self.intervals.last())
            .copied()
            .unwrap_or(Duration::from_secs(1))
    }
}

/// Outcome of one probe of a status endpoint
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// Operation reached terminal state; polling stops with this payload
    Ready(T),
    /// Not terminal yet; the raw status payload is kept for diagnosis
    Pending(serde_json::Value),
}

/// Repeatedly invoke `probe` until it reports [`PollOutcome::Ready`].
///
/// Probe errors propagate immediately: the poll is retried, never the
/// mutating call that started the operation. On budget expiry the error
/// carries the last pending payload seen.
pub async fn poll_until<T, F, Fut>(schedule: &PollSchedule, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>>>,
{
    let start = Instant::now();
    let mut last = serde_json::Value::Null;
    let mut attempt = 0usize;

    loop {
        match probe().await? {
            PollOutcome::Ready(value) => return Ok(value),
            PollOutcome::Pending(payload) => last = payload,
        }

        let elapsed = start.elapsed();
        if elapsed >= schedule.timeout {
            return Err(HarnessError::OperationTimeout { elapsed, last });
        }

        // Never sleep past the budget; the final probe lands at the deadline.
        let delay = schedule.delay(attempt).min(schedule.timeout - elapsed);
        attempt += 1;
        debug!(attempt, ?delay, "operation not terminal yet, backing off");
        tokio::time::sleep(delay).await;
    }
}
