//! Line grammar of the flat `KEY=VALUE` env file.
//!
//! Values are literal: no quote removal, escapes, inline comments or
//! `$NAME` expansion.

/// Optional shell-style prefix accepted before a key.
const EXPORT_PREFIX: &str = "export ";

/// Parses one line of an env file.
///
/// Returns `Ok(None)` for blank and `#` comment lines. The line is split on
/// its first `=`; key and value are trimmed, everything else is kept as
/// written.
pub(crate) fn parse_line(line: &str) -> Result<Option<(String, String)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let Some((key, value)) = trimmed.split_once('=') else {
        return Err("expected KEY=VALUE".to_string());
    };

    let key = key.trim();
    let key = key.strip_prefix(EXPORT_PREFIX).map(str::trim).unwrap_or(key);
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    if key.contains(char::is_whitespace) {
        return Err(format!("key {:?} contains whitespace", key));
    }

    Ok(Some((key.to_string(), value.trim().to_string())))
}
