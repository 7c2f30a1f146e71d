//! Operator-facing command: one linear run, no subcommands.
//!
//! Reads the named configuration values, builds the plan, converges the
//! host, and prints every action's outcome. Exits nonzero on the first
//! failed step with the step's name and full diagnostic.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::Level;
use serde_json::Value;

use groundwork::adapters::FileLockManager;
use groundwork::config::Config;
use groundwork::constants::{DEFAULT_LOCK_PATH, DEFAULT_TLS_DAYS};
use groundwork::logging::{now_iso, AuditSink, FactsEmitter};
use groundwork::types::RunMode;
use groundwork::{Adapters, Engine};

#[derive(Parser)]
#[command(
    name = "groundwork",
    version,
    about = "Converge this host onto a web application stack, idempotently"
)]
struct Cli {
    /// Fully-qualified domain the site is served under.
    #[arg(long)]
    domain: String,

    /// Application release to deploy (e.g. 2.4.1).
    #[arg(long = "app-version")]
    app_version: String,

    /// Document root the application is installed into.
    #[arg(long, default_value = "/var/www/app")]
    install_dir: PathBuf,

    #[arg(long, default_value = "app")]
    db_name: String,

    #[arg(long, default_value = "app")]
    db_user: String,

    /// Database credential; generated (and written into the application
    /// config only) when omitted.
    #[arg(long)]
    db_password: Option<String>,

    /// Self-signed certificate validity in days.
    #[arg(long, default_value_t = DEFAULT_TLS_DAYS)]
    tls_days: u32,

    /// Run lock path guarding against concurrent runs.
    #[arg(long, default_value = DEFAULT_LOCK_PATH)]
    lock_file: PathBuf,

    /// Probe everything, mutate nothing.
    #[arg(long)]
    dry_run: bool,

    /// Stream structured JSON facts to stderr.
    #[arg(long)]
    facts: bool,
}

/// Leveled operator lines on stdout/stderr.
struct ConsoleAudit;

impl AuditSink for ConsoleAudit {
    fn log(&self, level: Level, msg: &str) {
        match level {
            Level::Error | Level::Warn => eprintln!("[{level}] {msg}"),
            _ => println!("[{level}] {msg}"),
        }
    }
}

/// JSONL facts on stderr, one object per line, enabled by `--facts`.
struct ConsoleFacts {
    enabled: bool,
}

impl FactsEmitter for ConsoleFacts {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, mut fields: Value) {
        if !self.enabled {
            return;
        }
        if let Some(obj) = fields.as_object_mut() {
            obj.insert("subsystem".into(), Value::String(subsystem.to_string()));
            obj.insert("event".into(), Value::String(event.to_string()));
            obj.insert("decision".into(), Value::String(decision.to_string()));
            obj.entry("ts").or_insert(Value::String(now_iso()));
        }
        eprintln!("{fields}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config {
        domain: cli.domain,
        app_version: cli.app_version,
        install_dir: cli.install_dir,
        db_name: cli.db_name,
        db_user: cli.db_user,
        db_password: cli.db_password.unwrap_or_else(Config::generated_password),
        tls_days: cli.tls_days,
        ..Config::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let adapters = Adapters::host(&config);
    let engine = Engine::new(
        ConsoleFacts { enabled: cli.facts },
        ConsoleAudit,
        config.clone(),
        adapters,
    )
    .with_lock_manager(Box::new(FileLockManager::new(cli.lock_file)));

    let plan = engine.plan();
    let mode = if cli.dry_run { RunMode::DryRun } else { RunMode::Commit };
    let report = engine.run(&plan, mode);

    println!(
        "{} actions: {} changed, {} already satisfied",
        report.records.len(),
        report.changed_count(),
        report.satisfied_count()
    );
    if let Some(step) = &report.failed_step {
        eprintln!("provisioning failed at step '{step}'");
        for err in &report.errors {
            eprintln!("  {err}");
        }
        return ExitCode::FAILURE;
    }
    if !report.ok() {
        // Lock acquisition failures arrive without a failed step.
        for err in &report.errors {
            eprintln!("{err}");
        }
        return ExitCode::FAILURE;
    }
    if !cli.dry_run {
        println!("site available at https://{}/", engine.config().domain);
    }
    ExitCode::SUCCESS
}
