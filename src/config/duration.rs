//! Parsing of duration strings like "500ms", "5s", "1m".

use std::time::Duration;

/// Parses a whole-number duration with an optional unit suffix.
///
/// A bare number is read as seconds. Supported units: `ms`, `s`, `m`.
pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let num_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, unit) = s.split_at(num_end);
    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid duration number: {:?}", num_str))?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(num)),
        "s" | "" => Ok(Duration::from_secs(num)),
        "m" => num
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: {}", s)),
        other => Err(format!("unknown duration unit: {}", other)),
    }
}
