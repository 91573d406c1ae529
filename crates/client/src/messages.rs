//! Response bodies returned by the `/movies` endpoint.
//!
//! The service's schema is only partially documented, so decoding is
//! lenient: any JSON object parses. Modelled fields that are missing or have
//! an unexpected type fall back to `None`/`false`, and the raw value is kept
//! in the flattened `extra` map alongside every unmodelled field. A body such
//! as `{"success": false, "message": {"code": 1}}` therefore still parses,
//! and [`StatusResponse::outcome`] classifies it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Movie status value marking a finished render.
pub const STATUS_DONE: &str = "done";

/// Response to `POST /movies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RenderResponse {
    pub success: bool,
    /// Identifier of the queued render job. Numeric ids are converted to
    /// strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response to `GET /movies?project=<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct StatusResponse {
    pub success: bool,
    /// Set only when `movies` is an array of objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<MovieStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of [`StatusResponse::movies`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct MovieStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Download URL, present once the render is done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieStatus {
    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DONE)
    }
}

/// How a status response affects the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Exactly one movie, not finished yet. Keep polling.
    Pending,
    /// Exactly one movie with status `"done"`.
    Done,
    /// Anything else: an unsuccessful response, no `movies`, or not
    /// exactly one entry.
    Failed,
}

impl StatusResponse {
    /// Classify this response for the poll loop.
    pub fn outcome(&self) -> PollOutcome {
        match self.movies.as_deref() {
            Some([movie]) if self.success => {
                if movie.is_done() {
                    PollOutcome::Done
                } else {
                    PollOutcome::Pending
                }
            }
            _ => PollOutcome::Failed,
        }
    }

    /// The single movie entry, when the response has exactly one.
    pub fn movie(&self) -> Option<&MovieStatus> {
        match self.movies.as_deref() {
            Some([movie]) => Some(movie),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RenderResponse {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            success: take_success(&mut fields),
            project: take_id(&mut fields, "project"),
            message: take_string(&mut fields, "message"),
            extra: fields,
        }
    }
}

impl From<Map<String, Value>> for StatusResponse {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            success: take_success(&mut fields),
            movies: take_movies(&mut fields),
            message: take_string(&mut fields, "message"),
            extra: fields,
        }
    }
}

impl From<Map<String, Value>> for MovieStatus {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            status: take_string(&mut fields, "status"),
            url: take_string(&mut fields, "url"),
            extra: fields,
        }
    }
}

// ---- lenient field extraction ----
//
// Each helper removes `key` when it has the expected type. Values of any
// other type stay in `fields` and end up in `extra`; `null` is dropped.

/// Only a literal `true` counts as success.
fn take_success(fields: &mut Map<String, Value>) -> bool {
    match fields.get("success") {
        Some(Value::Bool(success)) => {
            let success = *success;
            fields.shift_remove("success");
            success
        }
        _ => false,
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(_) | Value::Null => match fields.shift_remove(key)? {
            Value::String(s) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Accept ids sent either as strings or as numbers.
fn take_id(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Number(id) => {
            let id = id.to_string();
            fields.shift_remove(key);
            Some(id)
        }
        _ => take_string(fields, key),
    }
}

fn take_movies(fields: &mut Map<String, Value>) -> Option<Vec<MovieStatus>> {
    match fields.get("movies")? {
        Value::Array(items) if items.iter().all(Value::is_object) => {}
        Value::Null => {
            fields.shift_remove("movies");
            return None;
        }
        _ => return None,
    }
    let Some(Value::Array(items)) = fields.shift_remove("movies") else {
        return None;
    };
    let movies = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(entry) => Some(MovieStatus::from(entry)),
            _ => None,
        })
        .collect();
    Some(movies)
}
