//! Client configuration.
//!
//! # Environment variables
//!
//! | Variable                        | Default                                 |
//! |---------------------------------|-----------------------------------------|
//! | `JSON2VIDEO_API_KEY`            | --                                      |
//! | `JSON2VIDEO_API_URL`            | `https://api.json2video.com/v1/movies`  |
//! | `JSON2VIDEO_POLL_INTERVAL_SECS` | `1`                                     |
//! | `JSON2VIDEO_TIMEOUT_SECS`       | `30`                                    |

use std::fmt;
use std::time::Duration;

/// Production endpoint of the rendering service.
pub const DEFAULT_API_URL: &str = "https://api.json2video.com/v1/movies";

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default timeout for a single HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "JSON2VIDEO_API_KEY";
pub const ENV_API_URL: &str = "JSON2VIDEO_API_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "JSON2VIDEO_POLL_INTERVAL_SECS";
pub const ENV_TIMEOUT_SECS: &str = "JSON2VIDEO_TIMEOUT_SECS";

/// Settings for talking to the rendering service.
#[derive(Clone)]
pub struct ClientConfig {
    /// Full `/movies` endpoint URL.
    pub api_url: String,
    /// Account credential, if configured.
    pub api_key: Option<String>,
    /// Delay between two status checks while waiting for a render.
    pub poll_interval: Duration,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults. Unparseable durations
    /// are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(api_key) = var(ENV_API_KEY) {
            config.api_key = Some(api_key);
        }
        if let Some(api_url) = var(ENV_API_URL) {
            config.api_url = api_url;
        }
        if let Some(interval) =
            var(ENV_POLL_INTERVAL_SECS).and_then(|v| parse_secs(ENV_POLL_INTERVAL_SECS, &v))
        {
            config.poll_interval = interval;
        }
        if let Some(timeout) = var(ENV_TIMEOUT_SECS).and_then(|v| parse_secs(ENV_TIMEOUT_SECS, &v))
        {
            config.request_timeout = timeout;
        }

        config
    }
}

/// Parse a positive number of seconds, fractional values allowed.
fn parse_secs(name: &str, raw: &str) -> Option<Duration> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            tracing::warn!(variable = name, value = raw, "Ignoring invalid duration");
            None
        }
    }
}
