use crate::model::{Blocker, GroupedWorkItems, Member, Metrics, Project, TimeEntry, WorkItem};
use crate::util::{parse_naive_timestamp, truncate_chars};
use crate::window::ReportWindow;

/// Everything both renderings consume. Grouping, metrics, and blockers are
/// computed once upstream and shared, so text and data outputs cannot drift.
pub struct RenderInputs<'a> {
  pub project: &'a Project,
  pub grouped: &'a GroupedWorkItems,
  pub metrics: &'a Metrics,
  pub blockers: &'a [Blocker],
  pub time_entries: &'a [TimeEntry],
  pub members: &'a [Member],
  pub relations: &'a [serde_json::Value],
  pub window: &'a ReportWindow,
  pub sprint_goal: Option<&'a str>,
  pub team_name: Option<&'a str>,
}

/// Traffic-light progress indicator for the executive summary.
fn status_indicator(metrics: &Metrics, blockers: &[Blocker]) -> &'static str {
  if !blockers.is_empty() {
    "🔴 Off track"
  } else if metrics.done_count < metrics.in_progress_count {
    "🟡 At risk"
  } else {
    "🟢 On track"
  }
}

/// One delivery-table row: ticket, truncated description, owner, date, status.
fn work_item_row(item: &WorkItem) -> String {
  let kind = if item.kind.is_empty() { "Task" } else { &item.kind };
  let subject = truncate_chars(&item.subject, 50);
  let assignee = item.assignee.as_deref().unwrap_or("Unassigned");

  let updated_date = parse_naive_timestamp(&item.updated_at)
    .map(|ts| ts.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "N/A".to_string());
  let date = item.due_date.clone().unwrap_or(updated_date);

  let status = if item.status.is_empty() { "Unknown" } else { &item.status };

  format!("| [{} #{}] | {} | {} | {} | {} |", kind, item.id, subject, assignee, date, status)
}

/// Render the full weekly report as markdown, fixed section order A–H plus
/// the leadership appendix.
pub fn render_markdown(inp: &RenderInputs) -> String {
  let metrics = inp.metrics;
  let grouped = inp.grouped;
  let status = status_indicator(metrics, inp.blockers);

  let mut report: Vec<String> = Vec::new();

  report.push("# WEEKLY REPORT - AGILE SCRUM\n".into());
  report.push("*Automatically generated from OpenProject*\n".into());

  // A. GENERAL INFORMATION
  report.push("## A. GENERAL INFORMATION\n".into());
  report.push("| Report Week | Value |".into());
  report.push("|-------------|-------|".into());
  report.push(format!("| From Date - To Date | {} - {} |", inp.window.from, inp.window.to));
  report.push(format!("| Team/Squad | {} |", inp.team_name.unwrap_or("N/A")));
  report.push(format!("| Product/Module | {} |", non_empty_or(&inp.project.name, "N/A")));
  report.push(format!("| Project ID | #{} |", inp.project.id));
  report.push(format!("| Sprint Goal | {} |", inp.sprint_goal.unwrap_or("N/A")));
  report.push(String::new());

  // B. EXECUTIVE SUMMARY
  report.push("## B. EXECUTIVE SUMMARY\n".into());
  report.push(format!("**Progress vs Sprint Goal:** {}\n", status));

  report.push("**Key Deliverables (Done):**".into());
  if grouped.done.is_empty() {
    report.push("- No work packages completed yet".into());
  } else {
    for (i, item) in grouped.done.iter().take(3).enumerate() {
      report.push(format!("{}. #{} - {}", i + 1, item.id, item.subject));
    }
  }
  report.push(String::new());

  if inp.blockers.is_empty() {
    report.push("**Main Impediment:** None\n".into());
  } else {
    report.push(format!(
      "**Main Impediment:** {} work package(s) currently blocked\n",
      inp.blockers.len()
    ));
  }
  report.push("**Support Needed/Decisions:** _(Requires manual update)_\n".into());

  // C. DELIVERY & BACKLOG MOVEMENT
  report.push("## C. DELIVERY & BACKLOG MOVEMENT\n".into());

  report.push("### 1) Completed Work (Done)\n".into());
  if grouped.done.is_empty() {
    report.push("_No work packages completed this week._".into());
  } else {
    report.push("| Ticket/Story | Short Description | Owner | Done Date | Status |".into());
    report.push("|--------------|-------------------|-------|-----------|--------|".into());
    for item in &grouped.done {
      report.push(work_item_row(item));
    }
  }
  report.push(String::new());

  report.push("### 2) Work In Progress\n".into());
  if grouped.in_progress.is_empty() {
    report.push("_No work packages in progress._".into());
  } else {
    report.push("| Ticket/Story | Short Description | Owner | ETA | Status |".into());
    report.push("|--------------|-------------------|-------|-----|--------|".into());
    for item in &grouped.in_progress {
      report.push(work_item_row(item));
    }
  }
  report.push(String::new());

  report.push("### 3) Planned Work (Not Started)\n".into());
  if grouped.planned.is_empty() {
    report.push("_No planned work packages._".into());
  } else {
    report.push("| Ticket/Story | Short Description | Owner | ETA | Status |".into());
    report.push("|--------------|-------------------|-------|-----|--------|".into());
    for item in &grouped.planned {
      report.push(work_item_row(item));
    }
  }
  report.push(String::new());

  if !grouped.de_scoped.is_empty() {
    report.push("### 4) De-scoped Work (Stopped/Reprioritized)\n".into());
    report.push("| Ticket | Reason | Status |".into());
    report.push("|--------|--------|--------|".into());
    for item in &grouped.de_scoped {
      let subject = truncate_chars(&item.subject, 40);
      let status = if item.status.is_empty() { "Unknown" } else { &item.status };
      report.push(format!("| #{} {} | _(Requires update)_ | {} |", item.id, subject, status));
    }
    report.push(String::new());
  }

  // D. RESOURCES & CAPACITY
  report.push("## D. RESOURCES & EXECUTION CAPACITY\n".into());
  report.push(format!("**Team Size:** {} member(s)\n", inp.members.len()));
  report.push(format!("**Weekly Capacity:** {:.1} person-hours\n", metrics.total_hours));
  report.push("**Staff Changes:** _(Requires manual update)_\n".into());

  // Distribution only when hours were logged; avoids the zero division
  if metrics.total_hours > 0.0 {
    report.push("**Time Distribution by Activity Type:**\n".into());
    report.push("| Type | Hours | % |".into());
    report.push("|------|-------|---|".into());
    report.push(format!(
      "| Development | {:.1} | {:.1}% |",
      metrics.dev_hours,
      metrics.dev_hours / metrics.total_hours * 100.0
    ));
    report.push(format!(
      "| QA/Testing | {:.1} | {:.1}% |",
      metrics.qa_hours,
      metrics.qa_hours / metrics.total_hours * 100.0
    ));
    report.push(format!(
      "| Management | {:.1} | {:.1}% |",
      metrics.management_hours,
      metrics.management_hours / metrics.total_hours * 100.0
    ));
    report.push(String::new());
  }

  // E. IMPEDIMENTS & DEPENDENCIES
  report.push("## E. IMPEDIMENTS & DEPENDENCIES\n".into());
  if inp.blockers.is_empty() {
    report.push("_No impediments._\n".into());
  } else {
    report.push("### Impediments (Direct Blockers)\n".into());
    report.push("| Description | Severity | Owner Handling | Status |".into());
    report.push("|------------|----------|----------------|--------|".into());
    for blocker in inp.blockers {
      report.push(format!(
        "| #{} {} | High | {} | {} |",
        blocker.id,
        truncate_chars(&blocker.subject, 40),
        blocker.assignee,
        blocker.status
      ));
    }
    report.push(String::new());
  }

  // F. QUALITY & STABILITY
  report.push("## F. QUALITY & SYSTEM STABILITY\n".into());
  report.push(format!("**Bugs Created This Week:** {}\n", metrics.bug_count));
  report.push("**Bugs Closed This Week:** _(Requires further analysis)_\n".into());
  report.push("**Test Coverage:** _(Requires manual update)_\n".into());
  report.push("**Incident/Outage:** _(Requires manual update)_\n".into());

  // G. NEXT WEEK PLAN
  report.push("## G. NEXT WEEK PLAN\n".into());
  report.push("**Top Priorities:**".into());
  if grouped.planned.is_empty() {
    report.push("_(Planning required)_".into());
  } else {
    for (i, item) in grouped.planned.iter().take(5).enumerate() {
      let assignee = item.assignee.as_deref().unwrap_or("Unassigned");
      let eta = item.due_date.as_deref().unwrap_or("TBD");
      report.push(format!("{}. #{} {} ({} - ETA: {})", i + 1, item.id, item.subject, assignee, eta));
    }
  }
  report.push(String::new());

  // H. SPRINT HEALTH & IMPROVEMENTS
  report.push("## H. SPRINT HEALTH & IMPROVEMENTS\n".into());
  report.push("**What Went Well:** _(Requires update from retro)_\n".into());
  report.push("**What Needs Improvement:** _(Requires update from retro)_\n".into());
  report.push("**Action Items:** _(Requires update from retro)_\n".into());

  // APPENDIX
  report.push("---\n".into());
  report.push("## APPENDIX: EXECUTIVE SUMMARY FOR LEADERSHIP\n".into());
  report.push(format!("**Status:** {}", status));
  report.push(format!("**Done:** {} work packages", metrics.done_count));
  report.push(format!("**In progress:** {} work packages", metrics.in_progress_count));
  report.push(format!("**Planned:** {} work packages", metrics.planned_count));
  report.push(format!("**Main blockers:** {} blocked items", inp.blockers.len()));
  report.push(format!("**Hours logged:** {:.1}h", metrics.total_hours));

  report.join("\n")
}

fn non_empty_or<'a>(s: &'a str, default: &'a str) -> &'a str {
  if s.trim().is_empty() { default } else { s }
}

/// Assemble the structured-data payload mirroring the markdown inputs.
pub fn render_json(inp: &RenderInputs) -> serde_json::Value {
  serde_json::json!({
    "project": {
      "id": inp.project.id,
      "name": inp.project.name,
      "description": inp.project.description,
    },
    "metrics": inp.metrics,
    "work_packages": inp.grouped,
    "time_entries": inp.time_entries,
    "members": inp.members,
    "blockers": inp.blockers,
    "relations": inp.relations,
  })
}
