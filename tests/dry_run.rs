//! Dry-run mode: probe everything, mutate nothing.

mod helpers;

use groundwork::config::Config;
use groundwork::types::{Outcome, RunMode};
use helpers::{engine_with, FakeHost};

#[test]
fn dry_run_on_a_fresh_host_reports_the_full_delta_without_mutating() {
    let host = FakeHost::new();
    let (engine, _) = engine_with(&host, Config::default());
    let plan = engine.plan();

    let report = engine.run(&plan, RunMode::DryRun);

    assert!(report.ok());
    assert_eq!(report.records.len(), plan.action_count());
    assert!(report.records.iter().all(|r| r.outcome == Outcome::Changed));
    assert!(host.mutations().is_empty(), "dry-run must not mutate");
    assert!(host.state().announcements.is_empty());
}

#[test]
fn dry_run_after_convergence_reports_no_drift() {
    let host = FakeHost::new();
    let (engine, _) = engine_with(&host, Config::default());
    let plan = engine.plan();

    assert!(engine.run(&plan, RunMode::Commit).ok());
    host.clear_mutations();

    let report = engine.run(&plan, RunMode::DryRun);

    assert!(report.ok());
    assert!(report
        .records
        .iter()
        .all(|r| r.outcome == Outcome::AlreadySatisfied));
    assert!(host.mutations().is_empty());
}
