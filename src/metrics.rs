use crate::classify::{self, ActivityClass, Category, TypeClass};
use crate::model::{Metrics, TimeEntry, WorkItem};

/// Compute the report counters from the filtered item set and the window's
/// time entries.
///
/// Each item increments exactly one status counter — the same `classify`
/// call that drives grouping — and independently at most one type counter.
/// Each time entry adds to total_hours and to at most one activity bucket.
pub fn aggregate(items: &[WorkItem], time_entries: &[TimeEntry]) -> Metrics {
  let mut m = Metrics {
    total_wps: items.len(),
    ..Metrics::default()
  };

  for item in items {
    match classify::classify(item.status_label()) {
      Category::Done => m.done_count += 1,
      Category::InProgress => m.in_progress_count += 1,
      Category::Blocked => m.blocked_count += 1,
      Category::DeScoped => m.de_scoped_count += 1,
      Category::Planned => m.planned_count += 1,
    }

    match classify::classify_type(&item.kind) {
      Some(TypeClass::Bug) => m.bug_count += 1,
      Some(TypeClass::Feature) => m.feature_count += 1,
      None => {}
    }
  }

  for te in time_entries {
    m.total_hours += te.hours;

    match classify::classify_activity(&te.activity) {
      Some(ActivityClass::Development) => m.dev_hours += te.hours,
      Some(ActivityClass::Qa) => m.qa_hours += te.hours,
      Some(ActivityClass::Management) => m.management_hours += te.hours,
      None => {}
    }
  }

  m
}
