// === Module Header (agents-tooling) START ===
// purpose: Isolated OpenProject API seam: trait, HTTP backend (Basic auth), env-fixture backend, filter builders
// role: client/tracker-api
// inputs: base URL + API key (flags or OPENPROJECT_URL / OPENPROJECT_API_KEY); OPWR_TEST_* fixtures for the env backend
// outputs: HAL envelopes as serde_json::Value for the fetch layer
// invariants:
// - Required operations return Result; the caller decides fatality (relations are the only swallowed case)
// - Filter expressions are opaque serialized JSON predicates built here and nowhere else
// - The env backend applies offset/pageSize slicing so pagination is exercised without a server
// errors: HTTP and decode failures surface with the request URL as context
// === Module Header END ===

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::ext::serde_json::JsonFetch;
use crate::window::ReportWindow;

/// The tracker operations one report run consumes.
pub trait OpenProjectApi {
  fn get_project(&self, project_id: i64) -> Result<serde_json::Value>;
  fn list_work_packages(
    &self,
    project_id: i64,
    filters: &str,
    offset: usize,
    page_size: usize,
  ) -> Result<serde_json::Value>;
  fn list_memberships(&self, project_id: i64) -> Result<serde_json::Value>;
  fn list_time_entries(&self, filters: &str) -> Result<serde_json::Value>;
  fn list_relations(&self, work_package_id: i64) -> Result<serde_json::Value>;
}

// --- Filter expressions ---

/// Status operator "*": every status including closed. Without it the server
/// default returns only open work packages.
pub fn all_statuses_filter() -> String {
  serde_json::json!([{"status": {"operator": "*", "values": []}}]).to_string()
}

/// Time entries spent inside the window, scoped to the project.
pub fn time_entries_filter(project_id: i64, window: &ReportWindow) -> String {
  serde_json::json!([
    {"spentOn": {"operator": "<>d", "values": [window.from.to_string(), window.to.to_string()]}},
    {"project": {"operator": "=", "values": [project_id.to_string()]}}
  ])
  .to_string()
}

// --- Envelope helpers ---

/// Elements of a HAL collection envelope; empty when the shape is off.
pub fn elements(envelope: &serde_json::Value) -> Vec<serde_json::Value> {
  envelope.fetch("_embedded.elements").array_or_empty()
}

/// Server-reported total of a HAL collection envelope.
pub fn total(envelope: &serde_json::Value) -> usize {
  envelope.fetch("total").to_or_default::<usize>()
}

// --- Credential discovery: flag first, then environment ---

pub fn resolve_base_url(flag: Option<&str>) -> Option<String> {
  flag
    .map(str::to_string)
    .or_else(|| std::env::var("OPENPROJECT_URL").ok())
    .filter(|s| !s.trim().is_empty())
}

pub fn resolve_api_key(flag: Option<&str>) -> Option<String> {
  flag
    .map(str::to_string)
    .or_else(|| std::env::var("OPENPROJECT_API_KEY").ok())
    .filter(|s| !s.trim().is_empty())
}

// --- HTTP backend ---

pub struct HttpApi {
  agent: ureq::Agent,
  base_url: String,
  auth_header: String,
}

impl HttpApi {
  pub fn new(base_url: &str, api_key: &str) -> Self {
    // OpenProject API v3 authenticates as Basic with the literal user "apikey"
    let token = BASE64.encode(format!("apikey:{}", api_key));

    Self {
      agent: ureq::AgentBuilder::new().build(),
      base_url: base_url.trim_end_matches('/').to_string(),
      auth_header: format!("Basic {}", token),
    }
  }

  fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
    let url = format!("{}{}", self.base_url, path);
    let mut req = self
      .agent
      .get(&url)
      .set("Accept", "application/hal+json")
      .set("User-Agent", "openproject-weekly-report")
      .set("Authorization", &self.auth_header);

    for (name, value) in query {
      req = req.query(name, value);
    }

    let resp = req.call().with_context(|| format!("GET {}", url))?;

    resp
      .into_json::<serde_json::Value>()
      .with_context(|| format!("decoding response from {}", url))
  }
}

impl OpenProjectApi for HttpApi {
  fn get_project(&self, project_id: i64) -> Result<serde_json::Value> {
    self.get_json(&format!("/api/v3/projects/{}", project_id), &[])
  }

  fn list_work_packages(
    &self,
    project_id: i64,
    filters: &str,
    offset: usize,
    page_size: usize,
  ) -> Result<serde_json::Value> {
    self.get_json(
      &format!("/api/v3/projects/{}/work_packages", project_id),
      &[
        ("filters", filters.to_string()),
        ("offset", offset.to_string()),
        ("pageSize", page_size.to_string()),
      ],
    )
  }

  fn list_memberships(&self, project_id: i64) -> Result<serde_json::Value> {
    self.get_json(&format!("/api/v3/projects/{}/memberships", project_id), &[])
  }

  fn list_time_entries(&self, filters: &str) -> Result<serde_json::Value> {
    self.get_json("/api/v3/time_entries", &[("filters", filters.to_string())])
  }

  fn list_relations(&self, work_package_id: i64) -> Result<serde_json::Value> {
    self.get_json(&format!("/api/v3/work_packages/{}/relations", work_package_id), &[])
  }
}

// --- Env-fixture backend ---
// Serves JSON from OPWR_TEST_* variables so the binary can run end-to-end in
// tests without a tracker. Work packages are sliced per offset/pageSize, which
// keeps the pagination loop honest.

pub struct EnvApi;

fn env_json(key: &str) -> Result<serde_json::Value> {
  let raw = std::env::var(key).map_err(|_| anyhow!("missing {} fixture", key))?;
  serde_json::from_str::<serde_json::Value>(&raw).with_context(|| format!("parsing {} fixture", key))
}

fn envelope_of(all: Vec<serde_json::Value>) -> serde_json::Value {
  serde_json::json!({
    "total": all.len(),
    "count": all.len(),
    "_embedded": { "elements": all }
  })
}

impl OpenProjectApi for EnvApi {
  fn get_project(&self, _project_id: i64) -> Result<serde_json::Value> {
    env_json("OPWR_TEST_PROJECT_JSON")
  }

  fn list_work_packages(
    &self,
    _project_id: i64,
    _filters: &str,
    offset: usize,
    page_size: usize,
  ) -> Result<serde_json::Value> {
    let all = env_json("OPWR_TEST_WORK_PACKAGES_JSON")?;
    let items = all.as_array().cloned().unwrap_or_default();

    let upper = (offset + page_size).min(items.len());
    let page: Vec<serde_json::Value> = if offset < items.len() { items[offset..upper].to_vec() } else { Vec::new() };

    Ok(serde_json::json!({
      "total": items.len(),
      "count": page.len(),
      "offset": offset,
      "pageSize": page_size,
      "_embedded": { "elements": page }
    }))
  }

  fn list_memberships(&self, _project_id: i64) -> Result<serde_json::Value> {
    let all = env_json("OPWR_TEST_MEMBERSHIPS_JSON")?;
    Ok(envelope_of(all.as_array().cloned().unwrap_or_default()))
  }

  fn list_time_entries(&self, _filters: &str) -> Result<serde_json::Value> {
    let all = env_json("OPWR_TEST_TIME_ENTRIES_JSON")?;
    Ok(envelope_of(all.as_array().cloned().unwrap_or_default()))
  }

  fn list_relations(&self, work_package_id: i64) -> Result<serde_json::Value> {
    // Fixture shape: { "<work package id>": [relation, ...], ... }
    let map = env_json("OPWR_TEST_RELATIONS_JSON")?;
    let rels = map.fetch(&work_package_id.to_string()).array_or_empty();
    Ok(envelope_of(rels))
  }
}

/// Detect fixture-backed runs: any OPWR_TEST_* variable selects the env backend.
pub fn env_wants_mock() -> bool {
  std::env::vars().any(|(k, _)| k.starts_with("OPWR_TEST_"))
}

/// Default backend selection: env fixtures when present, HTTP otherwise.
pub fn make_default_api(base_url: Option<&str>, api_key: Option<&str>) -> Box<dyn OpenProjectApi> {
  if env_wants_mock() {
    return Box::new(EnvApi);
  }

  Box::new(HttpApi::new(base_url.unwrap_or(""), api_key.unwrap_or("")))
}

/// Env-fixture backend, for tests that inject fixtures explicitly.
pub fn make_env_api() -> Box<dyn OpenProjectApi> {
  Box::new(EnvApi)
}
