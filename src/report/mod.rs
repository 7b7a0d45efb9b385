//! Human-readable report of a configuration check.

use std::fmt;
use std::path::Path;

use crate::catalog::Catalog;
use crate::check::{KeyStatus, Presence, ServiceStatus, Validation};
use crate::config::{AppSettings, ConfigError, ConfigState, EnvFileStatus};
use crate::probe::ProbeOutcome;

/// Shown instead of the value of a secret key.
const HIDDEN: &str = "(hidden)";

/// Report over a finished validation. Render it with `Display`.
pub struct Report<'a> {
    catalog: &'a Catalog,
    state: &'a ConfigState,
    validation: &'a Validation,
    env_file: Option<(&'a Path, &'a EnvFileStatus)>,
    settings: Option<(&'a AppSettings, &'a [ConfigError])>,
    probe: Option<&'a ProbeOutcome>,
}

impl<'a> Report<'a> {
    pub fn new(catalog: &'a Catalog, state: &'a ConfigState, validation: &'a Validation) -> Self {
        Self {
            catalog,
            state,
            validation,
            env_file: None,
            settings: None,
            probe: None,
        }
    }

    pub fn with_env_file(mut self, path: &'a Path, status: &'a EnvFileStatus) -> Self {
        self.env_file = Some((path, status));
        self
    }

    /// Include the effective settings and any values that were rejected.
    pub fn with_settings(mut self, settings: &'a AppSettings, warnings: &'a [ConfigError]) -> Self {
        self.settings = Some((settings, warnings));
        self
    }

    pub fn with_probe(mut self, outcome: &'a ProbeOutcome) -> Self {
        self.probe = Some(outcome);
        self
    }

    fn key_detail(&self, status: &KeyStatus) -> String {
        let spec = self.catalog.get(&status.key);
        match status.presence {
            Presence::Set if spec.is_some_and(|s| s.secret) => HIDDEN.to_string(),
            Presence::Set => self.state.value(&status.key).unwrap_or_default().to_string(),
            Presence::Missing | Presence::Placeholder => spec
                .map(|s| s.description.clone())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment check")?;
        if let Some((path, status)) = self.env_file {
            writeln!(f, "  {}", format_env_file(path, status))?;
        }

        writeln!(f)?;
        writeln!(f, "Required keys:")?;
        let width = self
            .validation
            .keys
            .iter()
            .map(|k| k.key.len())
            .max()
            .unwrap_or(0);
        for status in &self.validation.keys {
            let line = format!(
                "  {:<13} {:<width$}  {}",
                format!("[{}]", status.presence.label()),
                status.key,
                self.key_detail(status),
                width = width
            );
            writeln!(f, "{}", line.trim_end())?;
        }

        if !self.validation.services.is_empty() {
            writeln!(f)?;
            writeln!(f, "Services:")?;
            for service in &self.validation.services {
                writeln!(f, "  {}", format_service(service))?;
            }
        }

        if let Some((settings, warnings)) = self.settings {
            writeln!(f)?;
            writeln!(f, "Settings:")?;
            for (key, value) in settings.entries() {
                let rejected = warnings.iter().any(
                    |w| matches!(w, ConfigError::InvalidValue { key: k, .. } if k == key),
                );
                let origin = if self.state.value(key).is_some() && !rejected {
                    ""
                } else {
                    " (default)"
                };
                writeln!(f, "  {:<22} {}{}", key, value, origin)?;
            }
            for warning in warnings {
                writeln!(f, "  warning: {}, using default", warning)?;
            }
        }

        if let Some(outcome) = self.probe {
            writeln!(f)?;
            writeln!(f, "Ollama:")?;
            writeln!(f, "  {}", format_probe(outcome))?;
        }

        writeln!(f)?;
        match self.validation.ensure_complete() {
            Ok(()) => writeln!(
                f,
                "Result: OK, all {} required keys are set",
                self.validation.keys.len()
            ),
            Err(e) => writeln!(f, "Result: FAILED, {}", e),
        }
    }
}

fn format_env_file(path: &Path, status: &EnvFileStatus) -> String {
    match status {
        EnvFileStatus::Loaded { entries } => {
            format!("env file: {} ({} entries)", path.display(), entries)
        }
        EnvFileStatus::NotFound => format!(
            "env file: {} not found, using process environment only",
            path.display()
        ),
        EnvFileStatus::Unreadable(reason) => format!(
            "env file: {} unreadable ({}), using process environment only",
            path.display(),
            reason
        ),
    }
}

fn format_service(service: &ServiceStatus) -> String {
    if service.configured() {
        format!("{:<15} configured", service.label)
    } else {
        format!(
            "{:<15} not configured (missing {})",
            service.label,
            service.missing.join(", ")
        )
    }
}

fn format_probe(outcome: &ProbeOutcome) -> String {
    match (outcome.available, &outcome.detail) {
        (true, _) => format!("reachable at {}", outcome.url),
        (false, Some(detail)) => format!("unreachable at {}: {}", outcome.url, detail),
        (false, None) => format!("unreachable at {}", outcome.url),
    }
}
