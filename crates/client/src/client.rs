//! Movie-level render operations.
//!
//! [`Json2VideoClient`] ties a [`Movie`] to the `/movies` endpoint: it
//! checks the movie's credential and project id before any request is
//! sent, submits renders, and waits for them to finish.

use json2video_core::Movie;
use tokio_util::sync::CancellationToken;

use crate::api::{ClientError, Json2VideoApi, MoviesApi};
use crate::config::ClientConfig;
use crate::messages::{RenderResponse, StatusResponse};
use crate::poll::{wait_for_completion, PollConfig};

/// Render and status operations for movies.
pub struct Json2VideoClient<A = Json2VideoApi> {
    api: A,
    poll: PollConfig,
}

impl Json2VideoClient<Json2VideoApi> {
    /// Create an HTTP-backed client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let api = Json2VideoApi::from_config(config)?;
        Ok(Self::new(api).with_poll_config(PollConfig {
            interval: config.poll_interval,
        }))
    }
}

impl<A: MoviesApi> Json2VideoClient<A> {
    /// Wrap an API implementation, polling at the default interval.
    pub fn new(api: A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
        }
    }

    /// Override the poll loop settings.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// The underlying API implementation.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit `movie` for rendering.
    ///
    /// Fails with [`CoreError::InvalidApiKey`](json2video_core::CoreError)
    /// before sending anything when the movie has no API key. On success
    /// the returned project id is recorded on the movie, so
    /// [`get_status`](Self::get_status) can follow directly.
    pub async fn render(&self, movie: &mut Movie) -> Result<RenderResponse, ClientError> {
        let api_key = movie.require_api_key()?.to_owned();

        tracing::info!(scenes = movie.scenes().len(), "Submitting movie for rendering");
        let response = self.api.create_movie(&api_key, movie).await?;

        match (&response.project, response.success) {
            (Some(project), true) => {
                tracing::info!(project = %project, "Render job queued");
                movie.set_project(project.clone());
            }
            _ => {
                tracing::warn!(
                    success = response.success,
                    message = response.message.as_deref().unwrap_or(""),
                    "Render request was not accepted",
                );
            }
        }

        Ok(response)
    }

    /// Fetch the current render status of `movie`.
    ///
    /// Requires an API key and a known project id; either missing fails
    /// before any request is sent.
    pub async fn get_status(&self, movie: &Movie) -> Result<StatusResponse, ClientError> {
        let api_key = movie.require_api_key()?;
        let project = movie.require_project()?;
        self.api.movie_status(api_key, &project).await
    }

    /// Poll the status of `movie` until it is done or the service returns
    /// an unsuccessful response. See [`wait_for_completion`].
    pub async fn wait_to_finish<F>(
        &self,
        movie: &Movie,
        on_tick: F,
        cancel: &CancellationToken,
    ) -> Result<StatusResponse, ClientError>
    where
        F: FnMut(&StatusResponse),
    {
        let api_key = movie.require_api_key()?;
        let project = movie.require_project()?;
        wait_for_completion(&self.api, api_key, &project, &self.poll, on_tick, cancel).await
    }
}
