//! Sources of environment variables layered over the env file.

use std::collections::HashMap;
use std::env;

/// Read access to a set of environment variables.
///
/// The process environment is the production source; tests use a plain map.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
