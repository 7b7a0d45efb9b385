//! Validation of the configuration state against the key catalog.
//!
//! Purely local string checks; nothing here touches the network.

mod error;

pub use error::CheckError;

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ConfigState;

/// Prefix of the hardcoded stand-in values, e.g. `@YOUR_OPENAI_API_KEY`.
const PLACEHOLDER_PREFIX: &str = "@YOUR_";

/// Env template values look like `your_openai_api_key_here`.
const TEMPLATE_PREFIX: &str = "your_";
const TEMPLATE_SUFFIX: &str = "_here";

/// Whether a key holds a usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Set,
    Missing,
    /// Assigned, but still holds a template value such as `@YOUR_OPENAI_API_KEY`.
    Placeholder,
}

impl Presence {
    /// Classify a raw value. Blank strings count as missing.
    pub fn of(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Presence::Missing,
            Some(v) if is_placeholder(v) => Presence::Placeholder,
            Some(_) => Presence::Set,
        }
    }

    pub fn is_present(self) -> bool {
        self == Presence::Set
    }

    pub fn label(self) -> &'static str {
        match self {
            Presence::Set => "SET",
            Presence::Missing => "MISSING",
            Presence::Placeholder => "PLACEHOLDER",
        }
    }
}

fn is_placeholder(value: &str) -> bool {
    value.starts_with(PLACEHOLDER_PREFIX)
        || (value.starts_with(TEMPLATE_PREFIX) && value.ends_with(TEMPLATE_SUFFIX))
}

/// Result of checking one required key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub key: String,
    pub presence: Presence,
}

impl KeyStatus {
    pub fn present(&self) -> bool {
        self.presence.is_present()
    }
}

/// Whether a service has every credential it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub label: String,
    /// Credential keys that are missing or still placeholders.
    pub missing: Vec<String>,
}

impl ServiceStatus {
    pub fn configured(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check each required key in order.
pub fn validate(state: &ConfigState, required: &[&str]) -> Vec<KeyStatus> {
    required
        .iter()
        .map(|key| {
            let presence = Presence::of(state.get(key));
            debug!(key = %key, presence = presence.label(), "Checked required key");
            KeyStatus {
                key: (*key).to_string(),
                presence,
            }
        })
        .collect()
}

/// Summarize every service that has credential keys.
///
/// Services whose keys all carry defaults are always usable and are skipped.
pub fn summarize_services(state: &ConfigState, catalog: &Catalog) -> Vec<ServiceStatus> {
    catalog
        .services
        .iter()
        .filter(|service| service.credential_keys().next().is_some())
        .map(|service| ServiceStatus {
            name: service.name.clone(),
            label: service.label.clone(),
            missing: service
                .credential_keys()
                .filter(|k| !Presence::of(state.get(&k.name)).is_present())
                .map(|k| k.name.clone())
                .collect(),
        })
        .collect()
}

/// Outcome of validating the configuration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// One entry per required key, in Required-Key List order.
    pub keys: Vec<KeyStatus>,
    pub services: Vec<ServiceStatus>,
}

impl Validation {
    pub fn run(state: &ConfigState, catalog: &Catalog) -> Self {
        Self {
            keys: validate(state, &catalog.required_keys()),
            services: summarize_services(state, catalog),
        }
    }

    /// True when every required key is present.
    pub fn all_present(&self) -> bool {
        self.keys.iter().all(KeyStatus::present)
    }

    /// Required keys that are missing or placeholders, in order.
    pub fn missing(&self) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|k| !k.present())
            .map(|k| k.key.as_str())
            .collect()
    }

    /// Turn the outcome into an error when any required key is absent.
    pub fn ensure_complete(&self) -> Result<(), CheckError> {
        if self.all_present() {
            return Ok(());
        }
        Err(CheckError::MissingConfiguration {
            missing: self.missing().into_iter().map(String::from).collect(),
        })
    }
}
