//! Tests for config module.

use super::*;
use super::settings::VoiceGender;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn env_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ==================== Env file loading tests ====================

#[test]
fn test_load_reproduces_pairs() {
    let file = env_file(
        "OPENAI_API_KEY=sk-123\nSUPABASE_URL=https://x.supabase.co\nSUPABASE_KEY=eyJhbGci\n",
    );
    let state = ConfigState::load(file.path()).unwrap();

    let expected: ConfigState = [
        ("OPENAI_API_KEY", "sk-123"),
        ("SUPABASE_URL", "https://x.supabase.co"),
        ("SUPABASE_KEY", "eyJhbGci"),
    ]
    .into_iter()
    .collect();
    assert_eq!(state, expected);
}

#[test]
fn test_load_skips_blank_and_comment_lines() {
    let file = env_file(
        "# OpenAI\nOPENAI_API_KEY=sk-123\n\n   \n# Supabase\n#SUPABASE_KEY=commented\nSUPABASE_URL=https://x.supabase.co\n",
    );
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.len(), 2);
    assert_eq!(state.get("OPENAI_API_KEY"), Some("sk-123"));
    assert_eq!(state.get("SUPABASE_KEY"), None);
}

#[test]
fn test_load_trims_surrounding_whitespace() {
    let file = env_file("  OPENAI_API_KEY = sk-123   \n");
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.get("OPENAI_API_KEY"), Some("sk-123"));
}

#[test]
fn test_load_keeps_values_literal() {
    let file = env_file(
        "SUPABASE_KEY=$2b$10$abcdef\nOPENAI_API_KEY=sk-a$b\nSUPABASE_URL=C:\\x\\y\nA=pa ss #word\nB=x'y\nC=\"quoted\"\nD=a=b\n",
    );
    let state = ConfigState::load(file.path()).unwrap();

    let expected: ConfigState = [
        ("SUPABASE_KEY", "$2b$10$abcdef"),
        ("OPENAI_API_KEY", "sk-a$b"),
        ("SUPABASE_URL", "C:\\x\\y"),
        ("A", "pa ss #word"),
        ("B", "x'y"),
        ("C", "\"quoted\""),
        ("D", "a=b"),
    ]
    .into_iter()
    .collect();
    assert_eq!(state, expected);
}

#[test]
fn test_load_export_prefix() {
    let file = env_file("export DEBUG=true\n");
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.get("DEBUG"), Some("true"));
}

#[test]
fn test_load_later_assignment_wins() {
    let file = env_file("OPENAI_API_KEY=sk-old\nOPENAI_API_KEY=sk-new\n");
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.len(), 1);
    assert_eq!(state.get("OPENAI_API_KEY"), Some("sk-new"));
}

#[test]
fn test_load_skips_malformed_line() {
    let file = env_file("OPENAI_API_KEY=sk-123\nNOT_AN_ASSIGNMENT\nSUPABASE_KEY=abc\n");
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.get("OPENAI_API_KEY"), Some("sk-123"));
    assert_eq!(state.get("SUPABASE_KEY"), Some("abc"));
    assert_eq!(state.get("NOT_AN_ASSIGNMENT"), None);
}

#[test]
fn test_load_empty_value_is_kept_but_unset() {
    let file = env_file("SUPABASE_KEY=\n");
    let state = ConfigState::load(file.path()).unwrap();

    assert_eq!(state.get("SUPABASE_KEY"), Some(""));
    assert_eq!(state.value("SUPABASE_KEY"), None);
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigState::load(dir.path().join("absent.env"));

    assert!(matches!(result, Err(ConfigError::ReadFile(_))));
}

#[test]
fn test_load_or_empty_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let (state, status) = ConfigState::load_or_empty(dir.path().join("absent.env"));

    assert!(state.is_empty());
    assert_eq!(status, EnvFileStatus::NotFound);
}

#[test]
fn test_load_or_empty_directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let (state, status) = ConfigState::load_or_empty(dir.path());

    assert!(state.is_empty());
    assert!(matches!(status, EnvFileStatus::Unreadable(_)));
}

#[test]
fn test_load_or_empty_reports_entry_count() {
    let file = env_file("OPENAI_API_KEY=sk-123\nDEBUG=false\n");
    let (state, status) = ConfigState::load_or_empty(file.path());

    assert_eq!(state.len(), 2);
    assert_eq!(status, EnvFileStatus::Loaded { entries: 2 });
}

// ==================== Line grammar tests ====================

#[test]
fn test_parse_line_splits_on_first_equals() {
    assert_eq!(
        env_file::parse_line("  KEY = a=b  ").unwrap(),
        Some(("KEY".to_string(), "a=b".to_string()))
    );
}

#[test]
fn test_parse_line_skips_blank_and_comments() {
    assert_eq!(env_file::parse_line("").unwrap(), None);
    assert_eq!(env_file::parse_line("   ").unwrap(), None);
    assert_eq!(env_file::parse_line("  # KEY=value").unwrap(), None);
}

#[test]
fn test_parse_line_rejects_malformed() {
    assert!(env_file::parse_line("NO_EQUALS").is_err());
    assert!(env_file::parse_line("=value").is_err());
    assert!(env_file::parse_line("TWO WORDS=value").is_err());
}

// ==================== Process environment overlay tests ====================

#[test]
fn test_overlay_overrides_listed_keys() {
    let mut state: ConfigState = [("OPENAI_API_KEY", "sk-file")].into_iter().collect();
    let env = env_map(&[("OPENAI_API_KEY", "sk-env"), ("SUPABASE_KEY", "from-env")]);

    let applied = state.overlay(&env, &["OPENAI_API_KEY", "SUPABASE_KEY"]);

    assert_eq!(applied, 2);
    assert_eq!(state.get("OPENAI_API_KEY"), Some("sk-env"));
    assert_eq!(state.get("SUPABASE_KEY"), Some("from-env"));
}

#[test]
fn test_overlay_ignores_unlisted_keys() {
    let mut state = ConfigState::default();
    let env = env_map(&[("HOME", "/root"), ("PATH", "/usr/bin")]);

    let applied = state.overlay(&env, &["OPENAI_API_KEY"]);

    assert_eq!(applied, 0);
    assert!(state.is_empty());
}

#[test]
fn test_overlay_keeps_file_value_when_env_empty() {
    let mut state: ConfigState = [("SUPABASE_URL", "https://x.supabase.co")]
        .into_iter()
        .collect();
    let env = env_map(&[("SUPABASE_URL", "  ")]);

    assert_eq!(state.overlay(&env, &["SUPABASE_URL"]), 0);
    assert_eq!(state.get("SUPABASE_URL"), Some("https://x.supabase.co"));
}

#[test]
fn test_env_file_path_default() {
    let env = env_map(&[]);
    assert_eq!(env_file_path(&env), PathBuf::from(DEFAULT_ENV_PATH));
}

#[test]
fn test_env_file_path_override() {
    let env = env_map(&[(ENV_FILE_VAR, "config/prod.env")]);
    assert_eq!(env_file_path(&env), PathBuf::from("config/prod.env"));
}

#[test]
fn test_env_file_path_blank_override_ignored() {
    let env = env_map(&[(ENV_FILE_VAR, " ")]);
    assert_eq!(env_file_path(&env), PathBuf::from(DEFAULT_ENV_PATH));
}

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_seconds() {
    assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
}

#[test]
fn test_parse_duration_bare_number_is_seconds() {
    assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
}

#[test]
fn test_parse_duration_milliseconds() {
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
}

#[test]
fn test_parse_duration_minutes() {
    assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
}

#[test]
fn test_parse_duration_rejects_unknown_unit() {
    let err = parse_duration("10x").unwrap_err();
    assert!(err.contains("unknown duration unit"));
}

#[test]
fn test_parse_duration_rejects_empty() {
    assert!(parse_duration("").is_err());
    assert!(parse_duration("ms").is_err());
}

// ==================== Settings tests ====================

#[test]
fn test_settings_defaults_when_unset() {
    let (settings, errors) = AppSettings::resolve(&ConfigState::default());

    assert!(errors.is_empty());
    assert_eq!(settings, AppSettings::default());
    assert_eq!(settings.ollama_url, "http://localhost:11434");
    assert_eq!(settings.server_port, 8501);
    assert_eq!(settings.voice_gender, VoiceGender::Female);
    assert_eq!(settings.voice_speed, 150);
    assert_eq!(settings.emotion_level, 5);
    assert!(!settings.debug);
}

#[test]
fn test_settings_from_state() {
    let state: ConfigState = [
        ("OLLAMA_URL", "http://ollama:11434"),
        ("STREAMLIT_SERVER_PORT", "9000"),
        ("DEFAULT_VOICE_GENDER", "Male"),
        ("DEFAULT_VOICE_SPEED", "180"),
        ("DEFAULT_EMOTION_LEVEL", "8"),
        ("DEBUG", "TRUE"),
    ]
    .into_iter()
    .collect();

    let (settings, errors) = AppSettings::resolve(&state);

    assert!(errors.is_empty());
    assert_eq!(settings.ollama_url, "http://ollama:11434");
    assert_eq!(settings.server_port, 9000);
    assert_eq!(settings.voice_gender, VoiceGender::Male);
    assert_eq!(settings.voice_speed, 180);
    assert_eq!(settings.emotion_level, 8);
    assert!(settings.debug);
}

#[test]
fn test_settings_debug_only_true_enables() {
    let state: ConfigState = [("DEBUG", "yes")].into_iter().collect();
    let (settings, errors) = AppSettings::resolve(&state);

    assert!(errors.is_empty());
    assert!(!settings.debug);
}

#[test]
fn test_settings_invalid_values_fall_back() {
    let state: ConfigState = [
        ("STREAMLIT_SERVER_PORT", "http"),
        ("DEFAULT_VOICE_GENDER", "robot"),
        ("DEFAULT_EMOTION_LEVEL", "11"),
    ]
    .into_iter()
    .collect();

    let (settings, errors) = AppSettings::resolve(&state);

    assert_eq!(settings.server_port, 8501);
    assert_eq!(settings.voice_gender, VoiceGender::Female);
    assert_eq!(settings.emotion_level, 5);
    assert_eq!(errors.len(), 3);

    let keys: Vec<String> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::InvalidValue { key, .. } => Some(key.clone()),
            _ => None,
        })
        .collect();
    assert!(keys.contains(&"STREAMLIT_SERVER_PORT".to_string()));
    assert!(keys.contains(&"DEFAULT_VOICE_GENDER".to_string()));
    assert!(keys.contains(&"DEFAULT_EMOTION_LEVEL".to_string()));
}

#[test]
fn test_settings_entries_order() {
    let names: Vec<&str> = AppSettings::default()
        .entries()
        .into_iter()
        .map(|(k, _)| k)
        .collect();

    assert_eq!(
        names,
        vec![
            "OLLAMA_URL",
            "STREAMLIT_SERVER_PORT",
            "DEFAULT_VOICE_GENDER",
            "DEFAULT_VOICE_SPEED",
            "DEFAULT_EMOTION_LEVEL",
            "DEBUG",
        ]
    );
}

#[test]
fn test_invalid_value_error_message() {
    let err = ConfigError::invalid("DEFAULT_VOICE_SPEED", "not a number");
    assert_eq!(
        err.to_string(),
        "invalid value for DEFAULT_VOICE_SPEED: not a number"
    );
}
