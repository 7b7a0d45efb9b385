//! Check error types.

/// Check error type.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("missing required configuration: {}", .missing.join(", "))]
    MissingConfiguration { missing: Vec<String> },
}
