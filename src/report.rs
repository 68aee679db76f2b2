// === Module Header (agents-tooling) START ===
// purpose: Orchestrate one report run: validate window, collect data, derive groups/metrics/blockers, render
// role: processing/orchestrator
// inputs: &dyn OpenProjectApi, ReportParams (project, window spec, labels, format, probe cap, now override)
// outputs: The final text payload (markdown or pretty JSON), or a formatted failure line
// invariants:
// - Validation failures surface before any fetch
// - No error value crosses generate(); failures come back as the marker-prefixed line
// - Classification runs once; grouping, metrics, and both renderings share its outputs
// === Module Header END ===

use anyhow::Result;

use crate::blockers;
use crate::classify;
use crate::fetch;
use crate::metrics;
use crate::model::ReportData;
use crate::openproject_api::OpenProjectApi;
use crate::render::{self, RenderInputs};
use crate::util::format_error;
use crate::window::{self, ReportWindow, WindowSpec};

#[derive(Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Markdown,
  Json,
}

#[derive(Debug)]
pub struct ReportParams {
  pub project_id: i64,
  pub window: WindowSpec,
  pub sprint_goal: Option<String>,
  pub team_name: Option<String>,
  pub format: OutputFormat,
  pub relation_probe_limit: usize,
  pub now_override: Option<chrono::NaiveDateTime>,
}

/// Generate one report. Returns the payload, or the single formatted error
/// line; nothing else escapes this boundary.
pub fn generate(api: &dyn OpenProjectApi, params: &ReportParams) -> Result<String, String> {
  // Window validation happens before any fetch
  let window = window::resolve(&params.window, params.now_override).map_err(|e| format_error(format!("{:#}", e)))?;

  match build(api, params, &window) {
    Ok(payload) => Ok(payload),
    Err(e) => Err(format_error(format!("Failed to generate weekly report: {:#}", e))),
  }
}

fn build(api: &dyn OpenProjectApi, params: &ReportParams, window: &ReportWindow) -> Result<String> {
  let data: ReportData = fetch::collect_report_data(api, params.project_id, window, params.relation_probe_limit)?;

  let grouped = classify::group_by_status(&data.work_items);
  let m = metrics::aggregate(&data.work_items, &data.time_entries);
  let blockers = blockers::detect(&data.work_items, &data.relations);

  let inputs = RenderInputs {
    project: &data.project,
    grouped: &grouped,
    metrics: &m,
    blockers: &blockers,
    time_entries: &data.time_entries,
    members: &data.members,
    relations: &data.relations,
    window,
    sprint_goal: params.sprint_goal.as_deref(),
    team_name: params.team_name.as_deref(),
  };

  match params.format {
    OutputFormat::Markdown => Ok(render::render_markdown(&inputs)),
    OutputFormat::Json => {
      let payload = render::render_json(&inputs);
      Ok(serde_json::to_string_pretty(&payload)?)
    }
  }
}
