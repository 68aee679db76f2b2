use clap::Parser;

mod blockers;
mod classify;
mod cli;
mod ext;
mod fetch;
mod metrics;
mod model;
mod openproject_api;
mod relevance;
mod render;
mod report;
mod util;
mod window;

use crate::cli::{Cli, normalize};

fn main() {
  let cli = Cli::parse();

  if cli.gen_man {
    match util::render_man_page::<Cli>() {
      Ok(page) => print!("{}", page),
      Err(e) => {
        println!("{}", util::format_error(format!("{:#}", e)));
        std::process::exit(1);
      }
    }
    return;
  }

  // Phase 1: normalize CLI. Every failure surfaces as the single marker line.
  let cfg = match normalize(cli) {
    Ok(cfg) => cfg,
    Err(e) => {
      println!("{}", util::format_error(format!("{:#}", e)));
      std::process::exit(1);
    }
  };

  // Phase 2: resolve "now" and build the backend
  let now_opt = window::parse_now_override(cfg.now_override.as_deref());
  let api = openproject_api::make_default_api(cfg.base_url.as_deref(), cfg.api_key.as_deref());

  let params = report::ReportParams {
    project_id: cfg.project_id,
    window: cfg.window,
    sprint_goal: cfg.sprint_goal,
    team_name: cfg.team_name,
    format: cfg.format,
    relation_probe_limit: cfg.relation_probe_limit,
    now_override: now_opt,
  };

  // Phase 3: generate and emit
  match report::generate(api.as_ref(), &params) {
    Ok(payload) => {
      if cfg.out == "-" {
        println!("{}", payload);
      } else if let Err(e) = std::fs::write(&cfg.out, &payload) {
        println!("{}", util::format_error(format!("writing {}: {}", cfg.out, e)));
        std::process::exit(1);
      }
    }
    Err(line) => {
      println!("{}", line);
      std::process::exit(1);
    }
  }
}
