#![forbid(unsafe_code)]
//! Groundwork: idempotent single-host provisioning for a web application stack.
//!
//! Convergence model highlights:
//! - Every mutation is gated by a state probe (`probe::Prober`); a satisfied
//!   target is never touched, so re-running a plan is safe and cheap.
//! - External systems (package manager, filesystem, database, services,
//!   certificate issuance, the application installer) sit behind adapter
//!   traits so fakes can stand in during tests.
//! - Runs are sequential and fail-fast: the first failed action halts the run
//!   and the report carries everything executed up to that point. Recovery is
//!   "fix the cause and re-run"; already-converged targets are skipped.

pub mod adapters;
pub mod config;
pub mod constants;
pub mod engine;
pub mod logging;
pub mod probe;
pub mod types;

pub use engine::{Adapters, Engine};
