// === Module Header (agents-tooling) START ===
// purpose: Group extension traits for third-party crates under a single `ext` namespace
// role: module/aggregation
// outputs: Re-exported submodules providing utility traits (JsonFetch)
// invariants: No side effects; pure extensions only
// === Module Header END ===

pub mod serde_json;
