use crate::types::plan::RunMode;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

/// Fact fields that may carry a secret; always masked on redaction.
const SECRET_KEYS: &[&str] = &["password", "credential", "db_password"];

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission based on mode.
/// - DryRun: constant zero timestamp for determinism.
/// - Commit: real, current timestamp in RFC3339.
pub fn ts_for_mode(mode: &RunMode) -> String {
    match mode {
        RunMode::DryRun => TS_ZERO.to_string(),
        RunMode::Commit => now_iso(),
    }
}

/// Apply redactions to a fact event for comparison and safe logging.
/// Zeroes timestamps, removes volatile timings, and masks any
/// credential-bearing fields.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("lock_wait_ms");
        for key in SECRET_KEYS {
            if obj.contains_key(*key) {
                obj.insert((*key).to_string(), Value::String("***".into()));
            }
        }
    }
    v
}
