//! Audit helpers that emit structured facts across engine stages.
//!
//! Side-effects:
//! - Emits JSON facts via `FactsEmitter` for `plan`, `run.start`,
//!   `action.attempt`, `action.result`, and `run.summary`.
//! - Ensures a minimal envelope is present on every fact: `schema_version`,
//!   `ts`, `run_id`, `dry_run`.
//! - Applies redaction in dry-run to zero timestamps and mask secret fields.
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};

pub(crate) const SCHEMA_VERSION: i64 = 1;

const SUBSYSTEM: &str = "groundwork";

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        run_id: String,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self { facts, run_id, ts, mode }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Plan,
    RunStart,
    ActionAttempt,
    ActionResult,
    RunSummary,
}

impl Stage {
    fn as_event(&self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::RunStart => "run.start",
            Stage::ActionAttempt => "action.attempt",
            Stage::ActionResult => "action.result",
            Stage::RunSummary => "run.summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn plan(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Plan)
    }
    pub fn run_start(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RunStart)
    }
    pub fn action_attempt(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ActionAttempt)
    }
    pub fn action_result(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ActionResult)
    }
    pub fn run_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::RunSummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn action(mut self, action_id: impl Into<String>) -> Self {
        self.fields.insert("action_id".into(), json!(action_id.into()));
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.fields.insert("step".into(), json!(step.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: &Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj.iter() {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
            obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
            obj.entry("ts").or_insert(json!(self.ctx.ts));
            obj.entry("run_id").or_insert(json!(self.ctx.run_id));
            obj.entry("dry_run").or_insert(json!(self.ctx.mode.dry_run));
        }
        let out = if self.ctx.mode.redact {
            redact_event(fields)
        } else {
            fields
        };
        self.ctx
            .facts
            .emit(SUBSYSTEM, self.stage.as_event(), decision.as_str(), out);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success)
    }
    pub fn emit_failure(self) {
        self.emit(Decision::Failure)
    }
    pub fn emit_warn(self) {
        self.emit(Decision::Warn)
    }
}
