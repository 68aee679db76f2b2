use crate::classify::{Category, label_matches};
use crate::model::{Blocker, WorkItem};

/// Fixed reason attached to every detected blocker.
pub const BLOCKER_REASON: &str = "Status marked as blocked";

/// Extract items whose primary status label indicates they cannot proceed.
///
/// Detection is status-label only and reads the primary field without the
/// two-tier fallback. The `_relations` parameter is an extension point for
/// relation-based blocker analysis (blocks/blocked-by edges) that is not
/// implemented yet; callers already thread relation data through so the
/// signature will not churn when it lands.
pub fn detect(items: &[WorkItem], _relations: &[serde_json::Value]) -> Vec<Blocker> {
  items
    .iter()
    .filter(|item| label_matches(&item.status, Category::Blocked))
    .map(|item| Blocker {
      id: item.id,
      subject: item.subject.clone(),
      assignee: item.assignee.clone().unwrap_or_else(|| "Unassigned".into()),
      status: item.status.clone(),
      reason: BLOCKER_REASON.into(),
    })
    .collect()
}
