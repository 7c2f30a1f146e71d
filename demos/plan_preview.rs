use groundwork::config::Config;
use groundwork::logging::JsonlSink;
use groundwork::types::RunMode;
use groundwork::{Adapters, Engine};

fn main() {
    let config = Config { domain: "demo.test".to_string(), ..Config::default() };
    let engine = Engine::new(
        JsonlSink::default(),
        JsonlSink::default(),
        config.clone(),
        Adapters::host(&config),
    );

    let plan = engine.plan();
    let report = engine.run(&plan, RunMode::DryRun);
    for rec in &report.records {
        println!("{:?}: {}: {}", rec.outcome, rec.step, rec.description);
    }
}
