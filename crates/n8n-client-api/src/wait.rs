//! Bounded, fixed-interval wait for an execution to finish

use n8n_rest_api_contract::ExecutionRecord;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{ClientApiError, ClientApiResult};
use crate::ClientApi;

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Budget and cadence of [`ClientApi::wait_for_execution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time to wait for the execution to report `finished`
    pub timeout: Duration,
    /// Delay between two consecutive fetches
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Fetch the execution until it reports `finished` or the budget runs out.
///
/// Every iteration performs exactly one fetch; fetch errors end the wait
/// immediately. The elapsed time is checked after each sleep, so a wait that
/// never observes completion returns after at least `timeout` and at most
/// `timeout + poll_interval` (plus request latency).
pub async fn poll_until_finished<C>(
    client: &C,
    execution_id: &str,
    options: WaitOptions,
) -> ClientApiResult<ExecutionRecord>
where
    C: ClientApi + ?Sized,
{
    if options.poll_interval.is_zero() {
        return Err(ClientApiError::InvalidInput(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let start = Instant::now();
    let mut polls: u32 = 0;

    loop {
        let execution = client.get_execution(execution_id).await?;
        polls += 1;

        if execution.finished {
            debug!(execution_id, polls, elapsed = ?start.elapsed(), "execution finished");
            return Ok(execution);
        }

        debug!(execution_id, polls, "execution still running");
        tokio::time::sleep(options.poll_interval).await;

        if start.elapsed() >= options.timeout {
            return Err(ClientApiError::Timeout {
                execution_id: execution_id.to_string(),
                timeout: options.timeout,
            });
        }
    }
}
