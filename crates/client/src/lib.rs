//! JSON2Video REST client library.
//!
//! Submits movie documents built with `json2video-core` to the rendering
//! service, fetches their status and polls until they finish. HTTP goes
//! through [`reqwest`]; the [`api::MoviesApi`] trait is the seam used to
//! swap in other transports.

pub mod api;
pub mod client;
pub mod config;
pub mod messages;
pub mod poll;

#[cfg(test)]
mod testing;

pub use api::{ClientError, Json2VideoApi, MoviesApi};
pub use client::Json2VideoClient;
pub use config::ClientConfig;
pub use messages::{MovieStatus, PollOutcome, RenderResponse, StatusResponse};
pub use poll::{wait_for_completion, PollConfig};

pub use tokio_util::sync::CancellationToken;
