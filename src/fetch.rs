// === Module Header (agents-tooling) START ===
// purpose: Exhaustive paginated retrieval and per-run data collection over the tracker API seam
// role: processing/collection
// inputs: &dyn OpenProjectApi, project id, resolved ReportWindow, relation probe cap
// outputs: ReportData snapshot (project, relevant items, members, time entries, relations)
// invariants:
// - Every work-package request carries the all-statuses filter; pagination is strictly sequential
// - Termination: offset + page_size >= server total, or an empty page
// - Relation probing is bounded and best-effort; its failures never abort the run
// errors: Required fetch failures propagate with the failed operation named in context
// === Module Header END ===

use anyhow::{Context, Result};

use crate::model::{Member, Project, ReportData, TimeEntry, WorkItem};
use crate::openproject_api::{self, OpenProjectApi};
use crate::relevance;
use crate::window::ReportWindow;

/// Fixed page size for work-package retrieval.
pub const PAGE_SIZE: usize = 500;

/// Fetch ALL work packages for a project, open and closed.
///
/// The date-relevance decision happens client-side afterwards; the tracker
/// has no closed-during-window query, so nothing is filtered server-side
/// beyond the mandatory all-statuses override.
pub fn fetch_all_work_packages(api: &dyn OpenProjectApi, project_id: i64) -> Result<Vec<WorkItem>> {
  let filters = openproject_api::all_statuses_filter();
  let mut all: Vec<WorkItem> = Vec::new();
  let mut offset = 0usize;

  loop {
    let envelope = api
      .list_work_packages(project_id, &filters, offset, PAGE_SIZE)
      .with_context(|| format!("listing work packages for project {} (offset {})", project_id, offset))?;

    let elements = openproject_api::elements(&envelope);
    if elements.is_empty() {
      break;
    }

    all.extend(elements.iter().map(WorkItem::from_json));

    let total = openproject_api::total(&envelope);
    if offset + PAGE_SIZE >= total {
      break;
    }

    offset += PAGE_SIZE;
  }

  Ok(all)
}

/// Collect everything one report needs: required data first (any failure is
/// fatal and names its operation), then the bounded best-effort relation probe.
pub fn collect_report_data(
  api: &dyn OpenProjectApi,
  project_id: i64,
  window: &ReportWindow,
  relation_probe_limit: usize,
) -> Result<ReportData> {
  let project_json = api
    .get_project(project_id)
    .with_context(|| format!("fetching project {}", project_id))?;
  let project = Project::from_json(&project_json);

  let all_items = fetch_all_work_packages(api, project_id)?;
  let work_items: Vec<WorkItem> = all_items.into_iter().filter(|it| relevance::is_relevant(it, window)).collect();

  let members_envelope = api
    .list_memberships(project_id)
    .with_context(|| format!("fetching memberships for project {}", project_id))?;
  let members: Vec<Member> = openproject_api::elements(&members_envelope).iter().map(Member::from_json).collect();

  let te_envelope = api
    .list_time_entries(&openproject_api::time_entries_filter(project_id, window))
    .context("fetching time entries")?;
  let time_entries: Vec<TimeEntry> =
    openproject_api::elements(&te_envelope).iter().map(TimeEntry::from_json).collect();

  // Optional enrichment: probe the first few relevant items for relations.
  // Each probe failure is ignored independently.
  let mut relations: Vec<serde_json::Value> = Vec::new();
  for item in work_items.iter().take(relation_probe_limit) {
    if let Ok(envelope) = api.list_relations(item.id) {
      relations.extend(openproject_api::elements(&envelope));
    }
  }

  Ok(ReportData {
    project,
    work_items,
    members,
    time_entries,
    relations,
  })
}
