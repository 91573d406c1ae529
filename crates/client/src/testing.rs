//! In-memory [`MoviesApi`] used by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use json2video_core::Movie;
use serde_json::json;

use crate::api::{ClientError, MoviesApi};
use crate::messages::{RenderResponse, StatusResponse};

/// Replays scripted responses and records every call.
#[derive(Default)]
pub struct ScriptedApi {
    renders: Mutex<VecDeque<Result<RenderResponse, ClientError>>>,
    statuses: Mutex<VecDeque<Result<StatusResponse, ClientError>>>,
    /// Bodies received by `create_movie`.
    pub submitted: Mutex<Vec<serde_json::Value>>,
    /// `(api_key, project)` pairs received by `movie_status`.
    pub status_requests: Mutex<Vec<(String, String)>>,
    /// Simulated latency of each status request.
    pub status_delay: Duration,
    in_flight: AtomicUsize,
    /// Highest number of concurrent status requests observed.
    pub max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render(self, response: Result<RenderResponse, ClientError>) -> Self {
        self.renders.lock().unwrap().push_back(response);
        self
    }

    pub fn with_status(self, response: Result<StatusResponse, ClientError>) -> Self {
        self.statuses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn render_calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn status_calls(&self) -> usize {
        self.status_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl MoviesApi for ScriptedApi {
    async fn create_movie(
        &self,
        _api_key: &str,
        movie: &Movie,
    ) -> Result<RenderResponse, ClientError> {
        self.submitted
            .lock()
            .unwrap()
            .push(serde_json::to_value(movie).unwrap());
        self.renders
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RenderResponse::default()))
    }

    async fn movie_status(
        &self,
        api_key: &str,
        project: &str,
    ) -> Result<StatusResponse, ClientError> {
        self.status_requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), project.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status(json!({"success": true, "movies": [{"status": "running"}]}))))
    }
}

/// Parse a status response from JSON.
pub fn status(value: serde_json::Value) -> StatusResponse {
    serde_json::from_value(value).unwrap()
}
