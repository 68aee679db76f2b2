use anyhow::{Result, bail};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// Reporting-window types live here to keep the report orchestration focused.

/// How the caller selected the window: explicit dates, or a Monday–Sunday
/// week derived from "now".
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Dates { from: String, to: String },
  ThisWeek,
  LastWeek,
}

/// Inclusive calendar-date range a report covers. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
  pub from: NaiveDate,
  pub to: NaiveDate,
}

impl ReportWindow {
  /// First instant inside the window.
  pub fn start(&self) -> NaiveDateTime {
    self.from.and_hms_opt(0, 0, 0).unwrap()
  }

  /// Last instant inside the window (boundaries are inclusive on both ends).
  pub fn end(&self) -> NaiveDateTime {
    self.to.and_hms_opt(23, 59, 59).unwrap()
  }

  pub fn contains(&self, ts: NaiveDateTime) -> bool {
    self.start() <= ts && ts <= self.end()
  }

  /// Start of the recently-closed capture range: 30 days before the window end.
  pub fn closed_cutoff(&self) -> NaiveDateTime {
    (self.to - Duration::days(30)).and_hms_opt(0, 0, 0).unwrap()
  }
}

/// Resolve a window spec against an optional "now" override (naive UTC).
pub fn resolve(spec: &WindowSpec, now: Option<NaiveDateTime>) -> Result<ReportWindow> {
  match spec {
    WindowSpec::Dates { from, to } => {
      let from = parse_date(from)?;
      let to = parse_date(to)?;

      if from > to {
        bail!("from_date must be before or equal to to_date");
      }

      Ok(ReportWindow { from, to })
    }
    WindowSpec::ThisWeek => Ok(week_of(effective_now(now).date())),
    WindowSpec::LastWeek => Ok(week_of(effective_now(now).date() - Duration::days(7))),
  }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
  match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
    Ok(d) => Ok(d),
    Err(_) => bail!("Invalid date format. Use YYYY-MM-DD"),
  }
}

/// Monday–Sunday week containing the given day.
fn week_of(day: NaiveDate) -> ReportWindow {
  let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);

  ReportWindow {
    from: monday,
    to: monday + Duration::days(6),
  }
}

/// The effective "now" given an optional override. Centralizes clock access
/// so window math stays deterministic under test.
pub fn effective_now(override_now: Option<NaiveDateTime>) -> NaiveDateTime {
  override_now.unwrap_or_else(|| Utc::now().naive_utc())
}

/// Parse a `--now-override` string into a naive UTC instant.
/// Accepts RFC3339 (e.g. 2025-12-10T12:00:00Z) or a bare `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<NaiveDateTime> {
  s.and_then(crate::util::parse_naive_timestamp)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ts(s: &str) -> NaiveDateTime {
    crate::util::parse_naive_timestamp(s).unwrap()
  }

  #[test]
  fn explicit_dates_resolve() {
    let spec = WindowSpec::Dates {
      from: "2025-12-02".into(),
      to: "2025-12-08".into(),
    };
    let w = resolve(&spec, None).unwrap();
    assert_eq!(w.from.to_string(), "2025-12-02");
    assert_eq!(w.to.to_string(), "2025-12-08");
  }

  #[test]
  fn malformed_date_is_rejected() {
    let spec = WindowSpec::Dates {
      from: "2025-13-40".into(),
      to: "2025-12-08".into(),
    };
    let err = resolve(&spec, None).unwrap_err();
    assert!(err.to_string().contains("Invalid date format"));

    let spec = WindowSpec::Dates {
      from: "12/02/2025".into(),
      to: "2025-12-08".into(),
    };
    assert!(resolve(&spec, None).is_err());
  }

  #[test]
  fn inverted_range_is_rejected() {
    let spec = WindowSpec::Dates {
      from: "2025-12-09".into(),
      to: "2025-12-08".into(),
    };
    let err = resolve(&spec, None).unwrap_err();
    assert!(err.to_string().contains("from_date must be before or equal to to_date"));
  }

  #[test]
  fn single_day_window_is_allowed() {
    let spec = WindowSpec::Dates {
      from: "2025-12-08".into(),
      to: "2025-12-08".into(),
    };
    let w = resolve(&spec, None).unwrap();
    assert_eq!(w.from, w.to);
    assert!(w.contains(ts("2025-12-08T23:59:59")));
  }

  #[test]
  fn window_boundaries_are_inclusive() {
    let w = resolve(
      &WindowSpec::Dates {
        from: "2025-12-02".into(),
        to: "2025-12-08".into(),
      },
      None,
    )
    .unwrap();

    assert!(w.contains(ts("2025-12-02T00:00:00")));
    assert!(w.contains(ts("2025-12-08T23:59:00")));
    assert!(w.contains(ts("2025-12-08T23:59:59")));
    assert!(!w.contains(ts("2025-12-09T00:00:00")));
    assert!(!w.contains(ts("2025-12-01T23:59:59")));
  }

  #[test]
  fn this_week_is_monday_through_sunday() {
    // 2025-12-10 is a Wednesday
    let now = ts("2025-12-10T12:00:00");
    let w = resolve(&WindowSpec::ThisWeek, Some(now)).unwrap();
    assert_eq!(w.from.to_string(), "2025-12-08");
    assert_eq!(w.to.to_string(), "2025-12-14");
  }

  #[test]
  fn last_week_is_previous_monday_through_sunday() {
    let now = ts("2025-12-10T12:00:00");
    let w = resolve(&WindowSpec::LastWeek, Some(now)).unwrap();
    assert_eq!(w.from.to_string(), "2025-12-01");
    assert_eq!(w.to.to_string(), "2025-12-07");
  }

  #[test]
  fn week_of_monday_anchors_to_itself() {
    let now = ts("2025-12-08T00:30:00");
    let w = resolve(&WindowSpec::ThisWeek, Some(now)).unwrap();
    assert_eq!(w.from.to_string(), "2025-12-08");
  }

  #[test]
  fn closed_cutoff_is_thirty_days_before_end() {
    let w = resolve(
      &WindowSpec::Dates {
        from: "2025-12-02".into(),
        to: "2025-12-08".into(),
      },
      None,
    )
    .unwrap();
    assert_eq!(w.closed_cutoff().to_string(), "2025-11-08 00:00:00");
  }

  #[test]
  fn now_override_parses_rfc3339_and_naive() {
    assert!(parse_now_override(Some("2025-12-10T12:00:00Z")).is_some());
    assert!(parse_now_override(Some("2025-12-10T12:00:00")).is_some());
    assert!(parse_now_override(Some("nonsense")).is_none());
    assert!(parse_now_override(None).is_none());
  }
}
