//! Run stage: executes a plan sequentially with probe-gated mutations.
//!
//! Side-effects:
//! - Emits facts for `run.start`, one `plan` row per action,
//!   `action.attempt`/`action.result` around execution, and a `run.summary`.
//! - Acquires the run lock with bounded wait when a manager is configured.
//! - Halts on the first failed action (fail-fast at step and run level);
//!   no retries, no rollback; every target is re-probed on the next run.

use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::probe::Prober;
use crate::types::ids::{action_id, run_id};
use crate::types::{Action, ActionRecord, Outcome, Plan, RunMode, RunReport};

use super::{execute, Engine};

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    eng: &Engine<E, A>,
    plan: &Plan,
    mode: RunMode,
) -> RunReport {
    let t0 = Instant::now();
    let dry = matches!(mode, RunMode::DryRun);
    let rid = run_id(plan);
    let ctx = AuditCtx::new(
        &eng.facts,
        rid.to_string(),
        ts_for_mode(&mode),
        AuditMode { dry_run: dry, redact: dry },
    );
    let slog = StageLogger::new(&ctx);

    let mut records: Vec<ActionRecord> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut failed_step: Option<String> = None;

    eng.audit.log(Level::Info, "run: starting");

    // Run lock: bounded wait when a manager is configured. A host without
    // one relies on external mutual exclusion; the facts record which.
    let lock_backend = if eng.lock.is_some() { "file" } else { "none" };
    let mut _lock_guard = None;
    if let Some(mgr) = &eng.lock {
        let lt0 = Instant::now();
        match mgr.acquire(eng.lock_timeout_ms) {
            Ok(guard) => {
                _lock_guard = Some(guard);
                slog.run_start()
                    .merge(&json!({
                        "lock_backend": lock_backend,
                        "lock_wait_ms": elapsed_ms(lt0),
                        "steps": plan.steps.len(),
                        "actions": plan.action_count(),
                    }))
                    .emit_success();
            }
            Err(e) => {
                slog.run_start()
                    .merge(&json!({ "lock_backend": lock_backend, "error": e.to_string() }))
                    .emit_failure();
                eng.audit.log(Level::Error, &format!("run: {e}"));
                errors.push(e.to_string());
                return RunReport {
                    records,
                    errors,
                    failed_step,
                    duration_ms: elapsed_ms(t0),
                    run_uuid: Some(rid),
                };
            }
        }
    } else {
        slog.run_start()
            .merge(&json!({
                "lock_backend": lock_backend,
                "steps": plan.steps.len(),
                "actions": plan.action_count(),
            }))
            .emit_success();
    }

    // One plan row per action, in declared order.
    let mut idx = 0usize;
    for step in &plan.steps {
        for action in &step.actions {
            slog.plan()
                .action(action_id(&rid, action, idx).to_string())
                .step(&step.name)
                .field("target", json!(action.target.key()))
                .field("description", json!(action.describe()))
                .emit_success();
            idx += 1;
        }
    }

    let prober = Prober::new(&eng.adapters);
    let mut idx = 0usize;
    'steps: for step in &plan.steps {
        eng.audit.log(Level::Info, &format!("step: {}", step.name));
        for action in &step.actions {
            let aid = action_id(&rid, action, idx).to_string();
            idx += 1;
            let desc = action.describe();
            slog.action_attempt()
                .action(aid.clone())
                .step(&step.name)
                .field("description", json!(desc))
                .emit_success();

            let outcome = converge(eng, &prober, action, dry);
            match &outcome {
                Outcome::AlreadySatisfied => {
                    slog.action_result()
                        .action(aid)
                        .step(&step.name)
                        .field("outcome", json!("already_satisfied"))
                        .emit_success();
                    eng.audit.log(Level::Info, &format!("unchanged: {desc}"));
                }
                Outcome::Changed => {
                    slog.action_result()
                        .action(aid)
                        .step(&step.name)
                        .field("outcome", json!("changed"))
                        .emit_success();
                    eng.audit.log(Level::Info, &format!("changed: {desc}"));
                }
                Outcome::Failed(reason) => {
                    slog.action_result()
                        .action(aid)
                        .step(&step.name)
                        .merge(&json!({ "outcome": "failed", "error": reason }))
                        .emit_failure();
                    eng.audit.log(Level::Error, &format!("failed: {desc}: {reason}"));
                    errors.push(format!("{}: {desc}: {reason}", step.name));
                    failed_step = Some(step.name.clone());
                }
            }
            let halt = outcome.is_failed();
            records.push(ActionRecord {
                step: step.name.clone(),
                description: desc,
                outcome,
            });
            if halt {
                break 'steps;
            }
        }
    }

    let changed = records
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Changed))
        .count();
    let satisfied = records
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::AlreadySatisfied))
        .count();
    let duration_ms = elapsed_ms(t0);
    let mut summary = json!({
        "steps": plan.steps.len(),
        "actions": plan.action_count(),
        "executed": records.len(),
        "changed": changed,
        "already_satisfied": satisfied,
        "duration_ms": duration_ms,
    });
    if let Some(step) = &failed_step {
        summary["failed_step"] = json!(step);
        summary["errors"] = json!(errors);
    }
    if errors.is_empty() {
        slog.run_summary().merge(&summary).emit_success();
        eng.audit.log(Level::Info, "run: finished");
    } else {
        slog.run_summary().merge(&summary).emit_failure();
        eng.audit.log(Level::Error, "run: failed");
    }

    RunReport { records, errors, failed_step, duration_ms, run_uuid: Some(rid) }
}

/// One action's convergence: probe, then gate the mutation on the answer.
/// A probe error is a hard failure; unreadable state is never treated as
/// "unsatisfied".
fn converge<E: FactsEmitter, A: AuditSink>(
    eng: &Engine<E, A>,
    prober: &Prober<'_>,
    action: &Action,
    dry: bool,
) -> Outcome {
    match prober.satisfied(&action.target) {
        Err(e) => Outcome::Failed(e.to_string()),
        Ok(true) => Outcome::AlreadySatisfied,
        // Dry-run reports the delta without applying it.
        Ok(false) if dry => Outcome::Changed,
        Ok(false) => match execute::execute(eng, &action.op) {
            Ok(()) => Outcome::Changed,
            Err(e) => Outcome::Failed(e.to_string()),
        },
    }
}
