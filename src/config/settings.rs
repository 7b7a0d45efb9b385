//! Optional application settings with built-in defaults.

use std::fmt;
use std::str::FromStr;

use super::{ConfigError, ConfigState};

pub const OLLAMA_URL: &str = "OLLAMA_URL";
pub const SERVER_PORT: &str = "STREAMLIT_SERVER_PORT";
pub const VOICE_GENDER: &str = "DEFAULT_VOICE_GENDER";
pub const VOICE_SPEED: &str = "DEFAULT_VOICE_SPEED";
pub const EMOTION_LEVEL: &str = "DEFAULT_EMOTION_LEVEL";
pub const DEBUG: &str = "DEBUG";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_SERVER_PORT: u16 = 8501;
pub const DEFAULT_VOICE_SPEED: u32 = 150;
pub const DEFAULT_EMOTION_LEVEL: u8 = 5;
pub const MAX_EMOTION_LEVEL: u8 = 10;

/// Text-to-speech voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "female" => Ok(VoiceGender::Female),
            "male" => Ok(VoiceGender::Male),
            other => Err(format!("expected \"female\" or \"male\", got {:?}", other)),
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceGender::Female => write!(f, "female"),
            VoiceGender::Male => write!(f, "male"),
        }
    }
}

/// Non-secret settings resolved from the configuration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Base URL of the local Ollama server.
    pub ollama_url: String,
    /// Port the web UI listens on; also used for the OAuth redirect URI.
    pub server_port: u16,
    pub voice_gender: VoiceGender,
    /// Speech rate in words per minute.
    pub voice_speed: u32,
    /// Expressiveness of replies, 0 to 10.
    pub emotion_level: u8,
    pub debug: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            voice_gender: VoiceGender::default(),
            voice_speed: DEFAULT_VOICE_SPEED,
            emotion_level: DEFAULT_EMOTION_LEVEL,
            debug: false,
        }
    }
}

impl AppSettings {
    /// Resolves every setting, falling back to its default when the key is
    /// unset, empty or invalid. Invalid values are returned alongside.
    pub fn resolve(state: &ConfigState) -> (Self, Vec<ConfigError>) {
        let defaults = Self::default();
        let mut errors = Vec::new();

        let emotion_level = match parse_setting(state, EMOTION_LEVEL, defaults.emotion_level) {
            Ok(level) if level > MAX_EMOTION_LEVEL => {
                errors.push(ConfigError::invalid(
                    EMOTION_LEVEL,
                    format!("must be between 0 and {}, got {}", MAX_EMOTION_LEVEL, level),
                ));
                defaults.emotion_level
            }
            Ok(level) => level,
            Err(e) => {
                errors.push(e);
                defaults.emotion_level
            }
        };

        let settings = Self {
            ollama_url: state
                .value(OLLAMA_URL)
                .map(|url| url.to_string())
                .unwrap_or(defaults.ollama_url),
            server_port: parse_setting(state, SERVER_PORT, defaults.server_port)
                .unwrap_or_else(|e| collect(&mut errors, e, defaults.server_port)),
            voice_gender: parse_setting(state, VOICE_GENDER, defaults.voice_gender)
                .unwrap_or_else(|e| collect(&mut errors, e, defaults.voice_gender)),
            voice_speed: parse_setting(state, VOICE_SPEED, defaults.voice_speed)
                .unwrap_or_else(|e| collect(&mut errors, e, defaults.voice_speed)),
            emotion_level,
            debug: state
                .value(DEBUG)
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.debug),
        };

        (settings, errors)
    }

    /// Setting names paired with their effective values, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (OLLAMA_URL, self.ollama_url.clone()),
            (SERVER_PORT, self.server_port.to_string()),
            (VOICE_GENDER, self.voice_gender.to_string()),
            (VOICE_SPEED, self.voice_speed.to_string()),
            (EMOTION_LEVEL, self.emotion_level.to_string()),
            (DEBUG, self.debug.to_string()),
        ]
    }
}

fn parse_setting<T>(state: &ConfigState, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match state.value(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, format!("{:?}: {}", raw, e))),
        None => Ok(default),
    }
}

fn collect<T>(errors: &mut Vec<ConfigError>, error: ConfigError, fallback: T) -> T {
    errors.push(error);
    fallback
}
