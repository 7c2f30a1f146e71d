//! Fail-fast semantics at step and pipeline level, plus the
//! mid-pipeline-failure-and-resume scenario.

mod helpers;

use groundwork::config::Config;
use groundwork::types::{Action, Op, Outcome, Plan, RunMode, Step, Target};
use helpers::{engine_with, FakeHost};

fn install_action(name: &str) -> Action {
    Action {
        target: Target::PackageInstalled { name: name.to_string() },
        op: Op::InstallPackage { name: name.to_string() },
    }
}

#[test]
fn step_stops_at_first_failed_action() {
    let host = FakeHost::new();
    host.fail_on("ddl");
    let (engine, _) = engine_with(&host, Config::default());

    let plan = Plan {
        steps: vec![Step {
            name: "mixed".to_string(),
            actions: vec![
                install_action("alpha"),
                Action {
                    target: Target::DatabaseExists { name: "app".to_string() },
                    op: Op::EnsureDatabase { name: "app".to_string() },
                },
                install_action("omega"),
            ],
        }],
    };

    let report = engine.run(&plan, RunMode::Commit);

    assert!(!report.ok());
    assert_eq!(report.failed_step.as_deref(), Some("mixed"));
    assert_eq!(report.records.len(), 2, "third action never runs");
    assert_eq!(report.records[0].outcome, Outcome::Changed);
    assert!(report.records[1].outcome.is_failed());
    let mutations = host.mutations();
    assert!(mutations.contains(&"install:alpha".to_string()));
    assert!(
        !mutations.contains(&"install:omega".to_string()),
        "unreached action must record zero invocations"
    );
}

#[test]
fn pipeline_halts_at_the_failing_step() {
    let host = FakeHost::new();
    host.fail_on("ddl");
    let (engine, _) = engine_with(&host, Config::default());
    let plan = engine.plan();

    let report = engine.run(&plan, RunMode::Commit);

    assert!(!report.ok());
    assert_eq!(report.failed_step.as_deref(), Some("configure database"));
    assert_eq!(
        report.records.last().map(|r| r.step.as_str()),
        Some("configure database"),
        "audit trail ends at the failing step"
    );
    assert!(report.errors[0].contains("injected ddl failure"));

    // Steps after the failure never run and record zero invocations.
    let later_steps = ["issue tls certificate", "configure https virtual host", "post-install notification"];
    for step in later_steps {
        assert!(report.records.iter().all(|r| r.step != step));
    }
    let mutations = host.mutations();
    for verb in ["genkey:", "gencert:", "announce:"] {
        assert!(
            !mutations.iter().any(|m| m.starts_with(verb)),
            "unexpected {verb} mutation after halt"
        );
    }
}

#[test]
fn fixing_the_cause_and_rerunning_resumes_where_it_failed() {
    let host = FakeHost::new();
    host.fail_on("ddl");
    let (engine, _) = engine_with(&host, Config::default());
    let plan = engine.plan();

    assert!(!engine.run(&plan, RunMode::Commit).ok());

    host.clear_failure("ddl");
    host.clear_mutations();
    let resumed = engine.run(&plan, RunMode::Commit);

    assert!(resumed.ok(), "errors: {:?}", resumed.errors);
    assert_eq!(resumed.records.len(), plan.action_count());

    for record in &resumed.records {
        match record.step.as_str() {
            // Everything the first run converged is skipped.
            "system update" | "install dependencies" | "install application"
            | "configure http virtual host" | "harden session cookie policy" => {
                assert_eq!(record.outcome, Outcome::AlreadySatisfied, "{record:?}");
            }
            // The database step resumes: only the pre-failure service
            // activation survives from the first attempt.
            "configure database" => {
                if record.description.contains("enable and start") {
                    assert_eq!(record.outcome, Outcome::AlreadySatisfied, "{record:?}");
                } else {
                    assert_eq!(record.outcome, Outcome::Changed, "{record:?}");
                }
            }
            // Steps the first run never reached all converge now.
            _ => assert_eq!(record.outcome, Outcome::Changed, "{record:?}"),
        }
    }
}

#[test]
fn probe_failure_is_a_hard_failure_not_a_silent_no() {
    let host = FakeHost::new();
    host.fail_on("probe-files");
    let (engine, _) = engine_with(&host, Config::default());
    let plan = engine.plan();

    let report = engine.run(&plan, RunMode::Commit);

    assert!(!report.ok());
    // First file-backed probe sits in the application install step.
    assert_eq!(report.failed_step.as_deref(), Some("install application"));
    let failed = report.records.last().unwrap();
    assert!(matches!(&failed.outcome, Outcome::Failed(reason)
        if reason.contains("precondition check failed")));
    assert!(
        !host.mutations().iter().any(|m| m.starts_with("deploy:")),
        "an unprobeable target must not be mutated"
    );
}
