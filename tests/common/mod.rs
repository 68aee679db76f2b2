use assert_cmd::Command;

/// Fixture variables consumed by the env-backed tracker API.
pub const FIXTURE_VARS: [&str; 5] = [
  "OPWR_TEST_PROJECT_JSON",
  "OPWR_TEST_WORK_PACKAGES_JSON",
  "OPWR_TEST_MEMBERSHIPS_JSON",
  "OPWR_TEST_TIME_ENTRIES_JSON",
  "OPWR_TEST_RELATIONS_JSON",
];

/// A command with a clean tracker environment: no fixtures, no credentials.
pub fn bare_bin() -> Command {
  let mut cmd = Command::cargo_bin("openproject-weekly-report").unwrap();
  for var in FIXTURE_VARS {
    cmd.env_remove(var);
  }
  cmd.env_remove("OPENPROJECT_URL");
  cmd.env_remove("OPENPROJECT_API_KEY");
  cmd
}

#[allow(dead_code)]
pub fn project_json() -> serde_json::Value {
  serde_json::json!({
    "id": 5,
    "name": "Payments",
    "description": { "format": "markdown", "raw": "Core payments platform" }
  })
}

/// HAL work package with embedded status/type and optional extras.
#[allow(dead_code)]
pub fn wp(id: i64, subject: &str, status: &str, kind: &str, created: &str, updated: &str) -> serde_json::Value {
  serde_json::json!({
    "id": id,
    "subject": subject,
    "createdAt": created,
    "updatedAt": updated,
    "_embedded": {
      "status": { "name": status },
      "type": { "name": kind }
    }
  })
}

#[allow(dead_code)]
pub fn with_assignee(mut v: serde_json::Value, name: &str) -> serde_json::Value {
  v["_embedded"]["assignee"] = serde_json::json!({ "name": name });
  v
}

#[allow(dead_code)]
pub fn with_closed_on(mut v: serde_json::Value, closed_on: &str) -> serde_json::Value {
  v["closedOn"] = serde_json::json!(closed_on);
  v
}

#[allow(dead_code)]
pub fn member(name: &str, role: &str) -> serde_json::Value {
  serde_json::json!({
    "_links": {
      "principal": { "href": "/api/v3/users/1", "title": name },
      "roles": [{ "href": "/api/v3/roles/3", "title": role }]
    }
  })
}

#[allow(dead_code)]
pub fn time_entry(hours: f64, activity: &str, spent_on: &str) -> serde_json::Value {
  serde_json::json!({
    "hours": hours,
    "spentOn": spent_on,
    "_embedded": { "activity": { "name": activity } },
    "_links": { "project": { "href": "/api/v3/projects/5" } }
  })
}

/// Env fixtures for one binary invocation.
#[allow(dead_code)]
pub struct Fixtures {
  pub project: serde_json::Value,
  pub work_packages: Vec<serde_json::Value>,
  pub memberships: Vec<serde_json::Value>,
  pub time_entries: Vec<serde_json::Value>,
  pub relations: serde_json::Value,
}

#[allow(dead_code)]
impl Fixtures {
  pub fn empty() -> Self {
    Self {
      project: project_json(),
      work_packages: Vec::new(),
      memberships: Vec::new(),
      time_entries: Vec::new(),
      relations: serde_json::json!({}),
    }
  }

  /// The canonical three-item scenario: one updated in-window, one closed
  /// in-window without a recent touch, one untouched for 60 days.
  pub fn scenario() -> Self {
    let mut f = Self::empty();
    f.work_packages = vec![
      with_assignee(
        wp(1, "Implement OAuth flow", "In Progress", "Feature", "2025-11-20T09:00:00Z", "2025-12-03T10:00:00Z"),
        "Alice",
      ),
      with_closed_on(
        wp(2, "Fix rounding bug", "Closed", "Bug", "2025-10-01T09:00:00Z", "2025-10-02T10:00:00Z"),
        "2025-12-05T16:00:00Z",
      ),
      wp(3, "Old backlog idea", "New", "Task", "2025-09-01T09:00:00Z", "2025-10-09T10:00:00Z"),
    ];
    f.memberships = vec![member("Alice", "Developer"), member("Bob", "Project manager")];
    f
  }

  pub fn cmd(&self, args: &[&str]) -> Command {
    let mut cmd = bare_bin();
    cmd.env("OPWR_TEST_PROJECT_JSON", self.project.to_string());
    cmd.env("OPWR_TEST_WORK_PACKAGES_JSON", serde_json::Value::Array(self.work_packages.clone()).to_string());
    cmd.env("OPWR_TEST_MEMBERSHIPS_JSON", serde_json::Value::Array(self.memberships.clone()).to_string());
    cmd.env("OPWR_TEST_TIME_ENTRIES_JSON", serde_json::Value::Array(self.time_entries.clone()).to_string());
    cmd.env("OPWR_TEST_RELATIONS_JSON", self.relations.to_string());
    cmd.args(args);
    cmd
  }
}
