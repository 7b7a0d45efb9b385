//! Built-in catalog of the keys the application reads, grouped by service.
//!
//! The catalog is embedded at build time as YAML and deserialized with serde.

use serde::Deserialize;
use std::collections::HashSet;

use crate::config::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");

/// Every known configuration key, grouped by the service that consumes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

/// An external service or subsystem and the keys it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    /// Stable identifier, e.g. "supabase".
    pub name: String,
    /// Human-readable name used in reports.
    pub label: String,
    pub keys: Vec<KeySpec>,
}

/// Description of a single configuration key.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySpec {
    pub name: String,
    /// The application cannot start without this key.
    #[serde(default)]
    pub required: bool,
    /// The value is a credential and is never printed.
    #[serde(default)]
    pub secret: bool,
    /// Value used when the key is unset.
    pub default: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Service {
    /// Keys without a default; the service is usable only when all are set.
    pub fn credential_keys(&self) -> impl Iterator<Item = &KeySpec> {
        self.keys.iter().filter(|k| k.default.is_none())
    }
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// All keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &KeySpec> {
        self.services.iter().flat_map(|s| s.keys.iter())
    }

    /// All key names in catalog order.
    pub fn key_names(&self) -> Vec<&str> {
        self.keys().map(|k| k.name.as_str()).collect()
    }

    /// The Required-Key List, in catalog order.
    pub fn required_keys(&self) -> Vec<&str> {
        self.keys()
            .filter(|k| k.required)
            .map(|k| k.name.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&KeySpec> {
        self.keys().find(|k| k.name == name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen_services = HashSet::new();
        let mut seen_keys = HashSet::new();

        for service in &self.services {
            if service.name.is_empty() {
                return Err(ConfigError::Validation("service name is required".into()));
            }
            if !seen_services.insert(service.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate service {}",
                    service.name
                )));
            }

            for key in &service.keys {
                if key.name.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "service {}: key name is required",
                        service.name
                    )));
                }
                if !seen_keys.insert(key.name.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate key {}",
                        key.name
                    )));
                }
                if key.required && key.default.is_some() {
                    return Err(ConfigError::Validation(format!(
                        "key {}: required keys cannot have a default",
                        key.name
                    )));
                }
            }
        }

        if seen_keys.is_empty() {
            return Err(ConfigError::Validation(
                "catalog must define at least one key".into(),
            ));
        }

        Ok(())
    }
}
