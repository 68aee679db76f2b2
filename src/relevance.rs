use crate::classify::{Category, label_matches};
use crate::model::WorkItem;
use crate::util::parse_naive_timestamp;
use crate::window::ReportWindow;

// The tracker has no "closed during window" query, so relevance is decided
// client-side over the full unfiltered item set. The checks form a priority
// cascade and short-circuit on first match:
//   1. updated inside the window
//   2. created inside the window
//   3. closed-keyword label and updated within 30 days of the window end
//   4. explicit closed date inside the window
//
// Failure policy: an unparseable timestamp keeps the item only when its label
// passes the closed-keyword test. This biases toward not silently dropping
// completed work, accepting possible false positives for malformed data.

/// Decide whether a work item belongs to the reporting window.
pub fn is_relevant(item: &WorkItem, window: &ReportWindow) -> bool {
  let closed_label = label_matches(item.status_label(), Category::Done);

  match cascade(item, window, closed_label) {
    Ok(relevant) => relevant,
    Err(field) => {
      eprintln!(
        "[report] Failed to parse {} for work package #{}: {}",
        field,
        item.id,
        if closed_label { "keeping (closed status)" } else { "excluding" }
      );
      closed_label
    }
  }
}

/// The ordered checks; `Err(field)` reports the first unparseable timestamp.
fn cascade(item: &WorkItem, window: &ReportWindow, closed_label: bool) -> Result<bool, &'static str> {
  let updated = parse_optional(&item.updated_at, "updatedAt")?;

  if let Some(ts) = updated {
    if window.contains(ts) {
      return Ok(true);
    }
  }

  if let Some(ts) = parse_optional(&item.created_at, "createdAt")? {
    if window.contains(ts) {
      return Ok(true);
    }
  }

  // Captures work finished near the window without being re-touched
  if closed_label {
    if let Some(ts) = updated {
      if window.closed_cutoff() <= ts && ts <= window.end() {
        return Ok(true);
      }
    }
  }

  if let Some(raw) = &item.closed_on {
    if let Some(ts) = parse_optional(raw, "closedOn")? {
      if window.contains(ts) {
        return Ok(true);
      }
    }
  }

  Ok(false)
}

fn parse_optional(raw: &str, field: &'static str) -> Result<Option<chrono::NaiveDateTime>, &'static str> {
  if raw.trim().is_empty() {
    return Ok(None);
  }

  match parse_naive_timestamp(raw) {
    Some(ts) => Ok(Some(ts)),
    None => Err(field),
  }
}
