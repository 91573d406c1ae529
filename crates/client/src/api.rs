//! REST API client for the JSON2Video `/movies` endpoint.
//!
//! [`MoviesApi`] is the transport seam used by the higher-level
//! [`Json2VideoClient`](crate::client::Json2VideoClient) and the poll loop;
//! [`Json2VideoApi`] implements it over HTTPS using [`reqwest`].

use async_trait::async_trait;
use json2video_core::{CoreError, Movie};

use crate::config::ClientConfig;
use crate::messages::{RenderResponse, StatusResponse};

/// Header carrying the account credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Errors from the JSON2Video client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A local precondition failed; no request was sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status and a body that is not
    /// a JSON response object.
    #[error("JSON2Video API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response body ({status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Polling was stopped through its cancellation token.
    #[error("Polling cancelled")]
    Cancelled,
}

/// Operations offered by the `/movies` endpoint.
#[async_trait]
pub trait MoviesApi: Send + Sync {
    /// Submit `movie` for rendering (`POST /movies`).
    async fn create_movie(&self, api_key: &str, movie: &Movie)
        -> Result<RenderResponse, ClientError>;

    /// Fetch the render status of `project` (`GET /movies?project=<id>`).
    async fn movie_status(&self, api_key: &str, project: &str)
        -> Result<StatusResponse, ClientError>;
}

/// HTTP client for the JSON2Video service.
#[derive(Debug, Clone)]
pub struct Json2VideoApi {
    client: reqwest::Client,
    api_url: String,
}

impl Json2VideoApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Full endpoint URL, e.g.
    ///   `https://api.json2video.com/v1/movies`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Create an API client from configuration, applying its request
    /// timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Endpoint URL requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    /// Read the whole body and decode it.
    ///
    /// JSON bodies are returned even for non-2xx statuses so that callers
    /// can inspect `success`/`message`; other bodies become
    /// [`ClientError::ApiError`] (non-2xx) or [`ClientError::Decode`] (2xx).
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    tracing::warn!(status = status.as_u16(), "JSON2Video returned an error status");
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(ClientError::ApiError {
                status: status.as_u16(),
                body,
            }),
            Err(source) => Err(ClientError::Decode {
                status: status.as_u16(),
                source,
            }),
        }
    }
}

#[async_trait]
impl MoviesApi for Json2VideoApi {
    async fn create_movie(
        &self,
        api_key: &str,
        movie: &Movie,
    ) -> Result<RenderResponse, ClientError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(API_KEY_HEADER, api_key)
            .json(movie)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn movie_status(
        &self,
        api_key: &str,
        project: &str,
    ) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .get(&self.api_url)
            .header(API_KEY_HEADER, api_key)
            .query(&[("project", project)])
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
