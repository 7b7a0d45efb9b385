mod catalog;
mod check;
mod config;
mod probe;
mod report;

use catalog::Catalog;
use check::Validation;
use config::{AppSettings, ConfigState, ProcessEnv};
use probe::OllamaProbe;
use report::Report;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Log level used when `RUST_LOG` is not set. Stdout carries only the report.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Exit status when the built-in key catalog cannot be loaded.
const CATALOG_FAILURE: u8 = 2;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load key catalog: {}", e);
            return ExitCode::from(CATALOG_FAILURE);
        }
    };

    let env_path = config::env_file_path(&ProcessEnv);
    let (mut state, env_status) = ConfigState::load_or_empty(&env_path);
    let overridden = state.overlay(&ProcessEnv, &catalog.key_names());
    if state.is_empty() {
        warn!("No configuration values found in env file or process environment");
    }
    debug!(path = %env_path.display(), overridden, "Configuration state ready");

    let validation = Validation::run(&state, &catalog);
    for service in &validation.services {
        debug!(service = %service.name, configured = service.configured(), "Service checked");
    }

    let (settings, warnings) = AppSettings::resolve(&state);
    for warning in &warnings {
        warn!(error = %warning, "Invalid setting, using default");
    }

    let probe_outcome = if probe::probe_enabled(&state) {
        let timeout = probe::probe_timeout(&state).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid probe timeout, using default");
            probe::DEFAULT_PROBE_TIMEOUT
        });
        match OllamaProbe::new(&settings.ollama_url, timeout) {
            Ok(probe) => {
                info!(url = %probe.url(), ?timeout, "Probing Ollama");
                Some(probe.check().await)
            }
            Err(e) => {
                error!(error = %e, "Failed to build Ollama probe");
                None
            }
        }
    } else {
        None
    };

    let mut report = Report::new(&catalog, &state, &validation)
        .with_env_file(&env_path, &env_status)
        .with_settings(&settings, &warnings);
    if let Some(ref outcome) = probe_outcome {
        report = report.with_probe(outcome);
    }
    print!("{}", report);

    match validation.ensure_complete() {
        Ok(()) => {
            info!(required = validation.keys.len(), "Configuration check passed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Configuration check failed");
            ExitCode::FAILURE
        }
    }
}
