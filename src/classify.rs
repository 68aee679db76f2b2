// === Module Header (agents-tooling) START ===
// purpose: Map free-text status/type/activity labels into closed enumerations via one canonical keyword table
// role: classification/core
// outputs: Category enum, classify(), group_by_status(), type and activity classifiers
// invariants:
// - CATEGORY_RULES is the only place status keywords exist; grouping, metrics, and relevance all consume it
// - classify() is total: every label (including empty) lands in exactly one of the five categories
// - Matching is substring, case-insensitive, first-match-wins in table order
// === Module Header END ===

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::{GroupedWorkItems, WorkItem};

/// Canonical status buckets. Upstream labels are uncontrolled strings; this
/// enum is the only internal representation of category membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Done,
  InProgress,
  Blocked,
  DeScoped,
  Planned,
}

/// Priority-ordered keyword table; first matching row wins. Labels matching
/// no row (including empty and "unknown") default to Planned.
pub static CATEGORY_RULES: Lazy<Vec<(Category, &'static [&'static str])>> = Lazy::new(|| {
  vec![
    (Category::Done, &["closed", "done", "resolved", "completed", "finished"][..]),
    (Category::InProgress, &["progress", "development", "implementing"][..]),
    (Category::Blocked, &["blocked"][..]),
    (Category::DeScoped, &["rejected", "cancelled"][..]),
    (Category::Planned, &["new", "open", "specified", "to do"][..]),
  ]
});

/// Classify a free-text status label into its canonical category.
pub fn classify(label: &str) -> Category {
  let lower = label.to_lowercase();

  for (category, keywords) in CATEGORY_RULES.iter() {
    if keywords.iter().any(|k| lower.contains(k)) {
      return *category;
    }
  }

  Category::Planned
}

/// Whether a label matches the keyword row of a specific category, ignoring
/// the priority cascade. The relevance filter uses this for the closed-label
/// test; blocker detection for the blocked-label test.
pub fn label_matches(label: &str, category: Category) -> bool {
  let lower = label.to_lowercase();

  CATEGORY_RULES
    .iter()
    .find(|(c, _)| *c == category)
    .map(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
    .unwrap_or(false)
}

/// Partition items into the five status groups. Every item lands in exactly
/// one group; the same classify() drives the metrics counters, so the two
/// cannot drift.
pub fn group_by_status(items: &[WorkItem]) -> GroupedWorkItems {
  let mut groups = GroupedWorkItems::default();

  for item in items {
    let bucket = match classify(item.status_label()) {
      Category::Done => &mut groups.done,
      Category::InProgress => &mut groups.in_progress,
      Category::Blocked => &mut groups.blocked,
      Category::DeScoped => &mut groups.de_scoped,
      Category::Planned => &mut groups.planned,
    };

    bucket.push(item.clone());
  }

  groups
}

/// Work item type buckets for the quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
  Bug,
  Feature,
}

/// `bug|defect` → Bug, `feature|story|task` → Feature, anything else neither.
pub fn classify_type(label: &str) -> Option<TypeClass> {
  let lower = label.to_lowercase();

  if lower.contains("bug") || lower.contains("defect") {
    Some(TypeClass::Bug)
  } else if lower.contains("feature") || lower.contains("story") || lower.contains("task") {
    Some(TypeClass::Feature)
  } else {
    None
  }
}

/// Activity buckets for the capacity breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityClass {
  Development,
  Qa,
  Management,
}

/// Entries matching no bucket still count toward total hours only.
pub fn classify_activity(label: &str) -> Option<ActivityClass> {
  let lower = label.to_lowercase();

  if lower.contains("development") || lower.contains("implement") {
    Some(ActivityClass::Development)
  } else if lower.contains("test") || lower.contains("qa") {
    Some(ActivityClass::Qa)
  } else if lower.contains("management") || lower.contains("meeting") {
    Some(ActivityClass::Management)
  } else {
    None
  }
}
