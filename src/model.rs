// === Module Header (agents-tooling) START ===
// purpose: Define the typed report model (work items, time entries, members, metrics, blockers) built from HAL JSON
// role: model/types
// outputs: Serializable structs with stable field names; from_json constructors over raw tracker payloads
// invariants: Items are built once per run and never mutated; status two-tier lookup is the single label source
// === Module Header END ===

use serde::Serialize;

use crate::ext::serde_json::JsonFetch;

/// Project summary used in report headers and the JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
  pub id: i64,
  pub name: String,
  pub description: String,
}

impl Project {
  pub fn from_json(v: &serde_json::Value) -> Self {
    Self {
      id: v.fetch("id").to_or_default::<i64>(),
      name: v.fetch("name").str_or_empty(),
      // Rich-text field: only the raw text is carried into reports
      description: v.fetch("description.raw").str_or_empty(),
    }
  }
}

/// A trackable unit of work with free-text status and type labels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
  pub id: i64,
  pub subject: String,
  /// Primary status label from `_embedded.status.name`; may be empty.
  pub status: String,
  /// Secondary label from `_links.status.title`, consulted only when the
  /// primary is empty or "unknown".
  #[serde(skip)]
  pub status_fallback: Option<String>,
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  pub created_at: String,
  pub updated_at: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub closed_on: Option<String>,
}

impl WorkItem {
  pub fn from_json(v: &serde_json::Value) -> Self {
    let status_fallback = v
      .fetch("_links.status.title")
      .as_str()
      .filter(|s| !s.trim().is_empty())
      .map(str::to_string);

    // closedOn wins over closedAt when both are present
    let closed_on = ["closedOn", "closedAt"]
      .iter()
      .find_map(|k| v.fetch(k).as_str().filter(|s| !s.trim().is_empty()).map(str::to_string));

    Self {
      id: v.fetch("id").to_or_default::<i64>(),
      subject: v.fetch("subject").str_or_empty(),
      status: v.fetch("_embedded.status.name").str_or_empty(),
      status_fallback,
      kind: v.fetch("_embedded.type.name").str_or_empty(),
      assignee: v.fetch("_embedded.assignee.name").to::<String>(),
      created_at: v.fetch("createdAt").str_or_empty(),
      updated_at: v.fetch("updatedAt").str_or_empty(),
      due_date: v.fetch("dueDate").as_str().filter(|s| !s.trim().is_empty()).map(str::to_string),
      closed_on,
    }
  }

  /// Resolved status label: the primary field unless it is empty or
  /// "unknown", in which case the link-title fallback applies.
  pub fn status_label(&self) -> &str {
    let primary = self.status.trim();

    if !primary.is_empty() && !primary.eq_ignore_ascii_case("unknown") {
      return primary;
    }

    match &self.status_fallback {
      Some(t) => t.trim(),
      None => "",
    }
  }
}

/// Logged time scoped to the report window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
  pub hours: f64,
  pub activity: String,
  pub spent_on: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project: Option<String>,
}

impl TimeEntry {
  pub fn from_json(v: &serde_json::Value) -> Self {
    Self {
      hours: parse_hours(v.fetch("hours").value()),
      activity: v.fetch("_embedded.activity.name").str_or_empty(),
      spent_on: v.fetch("spentOn").str_or_empty(),
      project: v.fetch("_links.project.href").to::<String>(),
    }
  }
}

/// Hours as reported by the tracker: either a plain number or an ISO-8601
/// duration string such as `PT8H` or `PT1H30M`. Unparseable values count 0.
pub fn parse_hours(v: Option<&serde_json::Value>) -> f64 {
  let Some(v) = v else { return 0.0 };

  if let Some(n) = v.as_f64() {
    return n.max(0.0);
  }

  let Some(s) = v.as_str() else { return 0.0 };
  let s = s.trim();

  if let Ok(n) = s.parse::<f64>() {
    return n.max(0.0);
  }

  parse_iso_duration_hours(s).unwrap_or(0.0)
}

fn parse_iso_duration_hours(s: &str) -> Option<f64> {
  let rest = s.strip_prefix('P')?;
  let (day_part, time_part) = match rest.split_once('T') {
    Some((d, t)) => (d, t),
    None => (rest, ""),
  };

  let mut total = 0.0;
  let mut num = String::new();

  for ch in day_part.chars() {
    if ch.is_ascii_digit() || ch == '.' {
      num.push(ch);
    } else if ch == 'D' {
      total += num.parse::<f64>().ok()? * 24.0;
      num.clear();
    } else {
      return None;
    }
  }
  if !num.is_empty() {
    return None;
  }

  for ch in time_part.chars() {
    if ch.is_ascii_digit() || ch == '.' {
      num.push(ch);
    } else {
      let n = num.parse::<f64>().ok()?;
      num.clear();
      match ch {
        'H' => total += n,
        'M' => total += n / 60.0,
        'S' => total += n / 3600.0,
        _ => return None,
      }
    }
  }
  if !num.is_empty() {
    return None;
  }

  Some(total)
}

/// Project member; role metadata is passed through unmodified.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
  pub name: String,
  pub roles: serde_json::Value,
}

impl Member {
  pub fn from_json(v: &serde_json::Value) -> Self {
    let name = match v.fetch("_embedded.principal.name").as_str() {
      Some(n) if !n.trim().is_empty() => n.to_string(),
      _ => v.fetch("_links.principal.title").str_or_empty(),
    };

    let roles = v
      .fetch("_embedded.roles")
      .value()
      .or_else(|| v.fetch("_links.roles").value())
      .cloned()
      .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));

    Self { name, roles }
  }
}

/// A work item whose status label indicates it cannot proceed.
#[derive(Debug, Clone, Serialize)]
pub struct Blocker {
  pub id: i64,
  pub subject: String,
  pub assignee: String,
  pub status: String,
  pub reason: String,
}

/// Counters derived from the filtered item set and the window's time entries.
///
/// The five status counters are mutually exclusive and sum to `total_wps`;
/// `bug_count`/`feature_count` are additive and independent of status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Metrics {
  pub total_wps: usize,
  pub done_count: usize,
  pub in_progress_count: usize,
  pub planned_count: usize,
  pub blocked_count: usize,
  pub de_scoped_count: usize,
  pub bug_count: usize,
  pub feature_count: usize,
  pub total_hours: f64,
  pub dev_hours: f64,
  pub qa_hours: f64,
  pub management_hours: f64,
}

/// The five-way status partition of the filtered item set.
#[derive(Debug, Default, Serialize)]
pub struct GroupedWorkItems {
  pub done: Vec<WorkItem>,
  pub in_progress: Vec<WorkItem>,
  pub planned: Vec<WorkItem>,
  pub blocked: Vec<WorkItem>,
  pub de_scoped: Vec<WorkItem>,
}

/// Everything one report invocation fetches; built fresh per run, never cached.
#[derive(Debug)]
pub struct ReportData {
  pub project: Project,
  pub work_items: Vec<WorkItem>,
  pub members: Vec<Member>,
  pub time_entries: Vec<TimeEntry>,
  pub relations: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hal_item() -> serde_json::Value {
    serde_json::json!({
      "id": 101,
      "subject": "Implement OAuth flow",
      "createdAt": "2025-11-28T09:00:00Z",
      "updatedAt": "2025-12-03T10:00:00Z",
      "dueDate": "2025-12-12",
      "_embedded": {
        "status": { "name": "In Progress" },
        "type": { "name": "Feature" },
        "assignee": { "name": "Alice" }
      },
      "_links": { "status": { "title": "In progress" } }
    })
  }

  #[test]
  fn work_item_from_hal_json() {
    let item = WorkItem::from_json(&hal_item());
    assert_eq!(item.id, 101);
    assert_eq!(item.status, "In Progress");
    assert_eq!(item.kind, "Feature");
    assert_eq!(item.assignee.as_deref(), Some("Alice"));
    assert_eq!(item.due_date.as_deref(), Some("2025-12-12"));
    assert_eq!(item.closed_on, None);
    assert_eq!(item.status_label(), "In Progress");
  }

  #[test]
  fn status_label_falls_back_when_primary_empty_or_unknown() {
    let v = serde_json::json!({
      "id": 1,
      "subject": "x",
      "_links": { "status": { "title": "Specified" } }
    });
    let item = WorkItem::from_json(&v);
    assert_eq!(item.status, "");
    assert_eq!(item.status_label(), "Specified");

    let v = serde_json::json!({
      "id": 2,
      "subject": "y",
      "_embedded": { "status": { "name": "Unknown" } },
      "_links": { "status": { "title": "To Do" } }
    });
    let item = WorkItem::from_json(&v);
    assert_eq!(item.status_label(), "To Do");
  }

  #[test]
  fn closed_on_prefers_closed_on_over_closed_at() {
    let v = serde_json::json!({
      "id": 3, "subject": "z",
      "closedOn": "2025-12-05T00:00:00Z",
      "closedAt": "2025-12-06T00:00:00Z"
    });
    assert_eq!(WorkItem::from_json(&v).closed_on.as_deref(), Some("2025-12-05T00:00:00Z"));

    let v = serde_json::json!({ "id": 4, "subject": "w", "closedAt": "2025-12-06T00:00:00Z" });
    assert_eq!(WorkItem::from_json(&v).closed_on.as_deref(), Some("2025-12-06T00:00:00Z"));
  }

  #[test]
  fn hours_accept_numbers_strings_and_durations() {
    assert_eq!(parse_hours(Some(&serde_json::json!(7.5))), 7.5);
    assert_eq!(parse_hours(Some(&serde_json::json!("6"))), 6.0);
    assert_eq!(parse_hours(Some(&serde_json::json!("PT8H"))), 8.0);
    assert_eq!(parse_hours(Some(&serde_json::json!("PT1H30M"))), 1.5);
    assert_eq!(parse_hours(Some(&serde_json::json!("P1DT2H"))), 26.0);
    assert_eq!(parse_hours(Some(&serde_json::json!("PT0.5H"))), 0.5);
    assert_eq!(parse_hours(Some(&serde_json::json!("garbage"))), 0.0);
    assert_eq!(parse_hours(Some(&serde_json::json!(-2.0))), 0.0);
    assert_eq!(parse_hours(None), 0.0);
  }

  #[test]
  fn member_name_and_roles_pass_through() {
    let v = serde_json::json!({
      "_links": { "principal": { "title": "Bob" }, "roles": [{"title": "Developer"}] }
    });
    let m = Member::from_json(&v);
    assert_eq!(m.name, "Bob");
    assert_eq!(m.roles[0]["title"], "Developer");

    let v = serde_json::json!({
      "_embedded": { "principal": { "name": "Carol" }, "roles": [{"name": "PM"}] }
    });
    let m = Member::from_json(&v);
    assert_eq!(m.name, "Carol");
    assert_eq!(m.roles[0]["name"], "PM");
  }

  #[test]
  fn project_description_extracts_raw_text() {
    let v = serde_json::json!({
      "id": 5,
      "name": "Payments",
      "description": { "format": "markdown", "raw": "Core payments platform", "html": "<p>…</p>" }
    });
    let p = Project::from_json(&v);
    assert_eq!(p.id, 5);
    assert_eq!(p.description, "Core payments platform");
  }
}
