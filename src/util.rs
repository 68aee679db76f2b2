// === Module Header (agents-tooling) START ===
// purpose: Utilities for error formatting, timestamp parsing, text truncation, and man page rendering
// role: utilities/helpers
// inputs: Raw tracker timestamp strings; clap CommandFactory
// outputs: Formatted error lines, naive UTC timestamps, truncated text, man page text
// invariants:
// - format_error output always starts with the failure marker
// - parse_naive_timestamp strips the offset without converting (clock time preserved)
// - truncate_chars never splits a UTF-8 character
// errors: render_man_page bubbles IO errors; parsers return Option
// === Module Header END ===

use chrono::{NaiveDate, NaiveDateTime};
use clap::CommandFactory;

/// Marker prefixing every failure line a public entry point can return.
pub const FAILURE_MARKER: &str = "❌";

/// Format a failure message as the single error line callers print.
pub fn format_error(msg: impl AsRef<str>) -> String {
  format!("{} {}", FAILURE_MARKER, msg.as_ref())
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
  s.chars().take(max).collect()
}

/// Parse a tracker timestamp into a naive UTC instant.
///
/// Accepts RFC3339 (`2025-12-02T10:00:00Z`, offsets, fractional seconds), a
/// bare `%Y-%m-%dT%H:%M:%S`, or a plain date (taken at midnight). Offsets are
/// stripped, not converted: the tracker emits UTC and window comparisons are
/// naive on both sides.
pub fn parse_naive_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let s = raw.trim();

  if s.is_empty() {
    return None;
  }

  if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }

  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(ndt);
    }
  }

  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
