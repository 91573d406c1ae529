//! Fixed-interval status polling for render jobs.
//!
//! [`wait_for_completion`] checks the status of a project once per
//! interval until the service reports a terminal response, a request fails,
//! or the [`CancellationToken`] is triggered. Status requests never overlap:
//! the next interval only starts once the previous response is in.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{ClientError, MoviesApi};
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::messages::{PollOutcome, StatusResponse};

/// Tunable parameters for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before each status check.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Poll the status of `project` until it reaches a terminal response.
///
/// `on_tick` is called with every response, terminal or not, in order.
/// Resolves with the terminal response: either the one reporting the movie
/// as done, or the first one without the expected shape (see
/// [`StatusResponse::outcome`]). A failed request ends the loop with its
/// error; cancellation ends it with [`ClientError::Cancelled`]. There is no
/// built-in timeout.
pub async fn wait_for_completion<A, F>(
    api: &A,
    api_key: &str,
    project: &str,
    config: &PollConfig,
    mut on_tick: F,
    cancel: &CancellationToken,
) -> Result<StatusResponse, ClientError>
where
    A: MoviesApi + ?Sized,
    F: FnMut(&StatusResponse),
{
    let mut attempt = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(project, attempt, "Status polling cancelled");
                return Err(ClientError::Cancelled);
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        attempt += 1;
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(project, attempt, "Status polling cancelled");
                return Err(ClientError::Cancelled);
            }
            result = api.movie_status(api_key, project) => match result {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(project, attempt, error = %e, "Status check failed");
                    return Err(e);
                }
            },
        };

        let outcome = response.outcome();
        tracing::debug!(project, attempt, ?outcome, "Polled render status");
        on_tick(&response);

        match outcome {
            PollOutcome::Pending => {}
            PollOutcome::Done => {
                tracing::info!(project, attempt, "Render finished");
                return Ok(response);
            }
            PollOutcome::Failed => {
                tracing::warn!(
                    project,
                    attempt,
                    message = response.message.as_deref().unwrap_or(""),
                    "Render status check returned an unsuccessful response",
                );
                return Ok(response);
            }
        }
    }
}
