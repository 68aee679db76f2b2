use anyhow::{Result, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::openproject_api;
use crate::report::OutputFormat;
use crate::window::WindowSpec;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Week {
  This,
  Last,
}

#[derive(Parser, Debug)]
#[command(
    name = "openproject-weekly-report",
    version,
    about = "Generate weekly Agile status reports from OpenProject (markdown or JSON)",
    long_about = None
)]
pub struct Cli {
  /// Project to report on (positive id)
  #[arg(long)]
  pub project: Option<i64>,

  /// Report start date, YYYY-MM-DD; must be paired with --to
  #[arg(long)]
  pub from: Option<String>,

  /// Report end date (inclusive), YYYY-MM-DD; must be paired with --from
  #[arg(long)]
  pub to: Option<String>,

  /// Monday-Sunday convenience window for the current or previous week
  #[arg(long, value_enum)]
  pub week: Option<Week>,

  /// Sprint goal line for the report header
  #[arg(long)]
  pub sprint_goal: Option<String>,

  /// Team/squad name for the report header
  #[arg(long)]
  pub team_name: Option<String>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
  pub format: OutputFormat,

  /// Output location: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// OpenProject base URL (default: env OPENPROJECT_URL)
  #[arg(long)]
  pub base_url: Option<String>,

  /// OpenProject API key (default: env OPENPROJECT_API_KEY)
  #[arg(long)]
  pub api_key: Option<String>,

  /// Cap on relevant work items probed for dependency relations
  #[arg(long, default_value_t = 10)]
  pub relation_probe_limit: usize,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for --week windows (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub project_id: i64,
  pub window: WindowSpec,
  pub sprint_goal: Option<String>,
  pub team_name: Option<String>,
  pub format: OutputFormat,
  pub out: String,
  pub base_url: Option<String>,
  pub api_key: Option<String>,
  pub relation_probe_limit: usize,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate window selection
  let window = match (&cli.from, &cli.to, cli.week) {
    (Some(f), Some(t), None) => WindowSpec::Dates {
      from: f.clone(),
      to: t.clone(),
    },
    (None, None, Some(Week::This)) => WindowSpec::ThisWeek,
    (None, None, Some(Week::Last)) => WindowSpec::LastWeek,
    (None, None, None) => bail!("Provide either --week or (--from AND --to)"),
    _ => bail!("Ambiguous window selection: choose only one of --week | --from/--to"),
  };

  let project_id = match cli.project {
    Some(id) if id > 0 => id,
    Some(_) => bail!("--project must be a positive id"),
    None => bail!("--project is required"),
  };

  // Credentials are only needed against a live tracker; fixture-backed runs
  // (OPWR_TEST_*) skip them.
  let base_url = openproject_api::resolve_base_url(cli.base_url.as_deref());
  let api_key = openproject_api::resolve_api_key(cli.api_key.as_deref());

  if !openproject_api::env_wants_mock() {
    if base_url.is_none() {
      bail!("Missing OpenProject base URL. Pass --base-url or set OPENPROJECT_URL");
    }
    if api_key.is_none() {
      bail!("Missing OpenProject API key. Pass --api-key or set OPENPROJECT_API_KEY");
    }
  }

  Ok(EffectiveConfig {
    project_id,
    window,
    sprint_goal: cli.sprint_goal,
    team_name: cli.team_name,
    format: cli.format,
    out: cli.out,
    base_url,
    api_key,
    relation_probe_limit: cli.relation_probe_limit,
    now_override: cli.now_override,
  })
}
