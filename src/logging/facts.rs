use log::Level;
use serde_json::Value;

/// Receives one structured JSON fact per engine event (plan rows, action
/// attempts/results, run summary). Must not affect control flow.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives classified human-readable lines for an operator.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Silent default sink; real bindings (console, JSONL file) live with the
/// caller. Tests substitute collecting doubles.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
