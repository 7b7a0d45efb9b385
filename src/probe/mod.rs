//! Reachability probe for the local Ollama server.
//!
//! Informational only: the result is printed but never changes the exit status.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigState, parse_duration};

/// Enables the probe when set to `true`.
pub const PROBE_ENABLE_VAR: &str = "ENVCHECK_PROBE_OLLAMA";

/// Probe timeout as a duration string such as "5s".
pub const PROBE_TIMEOUT_VAR: &str = "ENVCHECK_PROBE_TIMEOUT";

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Path of the Ollama version endpoint.
const VERSION_PATH: &str = "/api/version";

/// Probe errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub url: String,
    pub available: bool,
    /// Why the server was considered unavailable.
    pub detail: Option<String>,
}

/// HTTP probe against `{base_url}/api/version`.
pub struct OllamaProbe {
    http_client: HttpClient,
    url: String,
}

impl OllamaProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: version_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the version endpoint; the server is available iff it answers 200.
    pub async fn check(&self) -> ProbeOutcome {
        match self.fetch().await {
            Ok(()) => {
                debug!(url = %self.url, "Ollama reachable");
                ProbeOutcome {
                    url: self.url.clone(),
                    available: true,
                    detail: None,
                }
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Ollama unreachable");
                ProbeOutcome {
                    url: self.url.clone(),
                    available: false,
                    detail: Some(e.to_string()),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<(), ProbeError> {
        let response = self.http_client.get(&self.url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ProbeError::Status(status)),
        }
    }
}

/// Join the base URL and the version path without doubling the slash.
pub fn version_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), VERSION_PATH)
}

/// Whether the probe was requested.
pub fn probe_enabled(state: &ConfigState) -> bool {
    state
        .value(PROBE_ENABLE_VAR)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Configured probe timeout, or the default when unset.
pub fn probe_timeout(state: &ConfigState) -> Result<Duration, ConfigError> {
    match state.value(PROBE_TIMEOUT_VAR) {
        Some(raw) => match parse_duration(raw) {
            Ok(d) if d.is_zero() => Err(ConfigError::invalid(
                PROBE_TIMEOUT_VAR,
                "must be greater than zero",
            )),
            Ok(d) => Ok(d),
            Err(e) => Err(ConfigError::invalid(PROBE_TIMEOUT_VAR, e)),
        },
        None => Ok(DEFAULT_PROBE_TIMEOUT),
    }
}
