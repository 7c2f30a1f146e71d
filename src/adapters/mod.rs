//! Trait seams for the external systems the engine drives.
//!
//! Host implementations shell out to the real tools (`apt-get`, `mysql`,
//! `systemctl`, `openssl`, …); tests substitute in-memory fakes. Probing
//! methods return `ErrorKind::Probe` on undeterminable state, mutating
//! methods return `ErrorKind::Mutation` with the captured diagnostic.

pub mod cert;
pub mod database;
pub mod fstree;
pub mod installer;
pub mod lock;
pub mod notify;
pub mod package;
pub mod service;

pub use cert::{CertIssuer, OpensslIssuer};
pub use database::{DatabaseAdmin, MysqlAdmin};
pub use fstree::{FileTree, HostFileTree};
pub use installer::{AppInstaller, ReleaseInstaller};
pub use lock::{FileLockManager, LockGuard, LockManager};
pub use notify::{BrowserNotifier, Notifier};
pub use package::{AptPackageManager, PackageManager};
pub use service::{ServiceControl, SystemdControl};

use crate::types::errors::{Error, Result};
use std::process::{Command, Output};

/// Run a command to completion, capturing output. Spawn failures and nonzero
/// exits become mutation errors carrying the command line and stderr.
pub(crate) fn run_checked(cmd: &mut Command) -> Result<Output> {
    let rendered = render(cmd);
    let out = cmd
        .output()
        .map_err(|e| Error::mutation(format!("{rendered}: {e}")))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(Error::mutation(format!(
            "{rendered} exited with {}: {}",
            out.status,
            stderr.trim()
        )));
    }
    Ok(out)
}

/// Run a query command where a nonzero exit is still a readable answer;
/// only spawn failures are errors (probe-kind).
pub(crate) fn run_query(cmd: &mut Command) -> Result<Output> {
    let rendered = render(cmd);
    cmd.output()
        .map_err(|e| Error::probe(format!("{rendered}: {e}")))
}

fn render(cmd: &Command) -> String {
    let mut s = cmd.get_program().to_string_lossy().into_owned();
    for a in cmd.get_args() {
        s.push(' ');
        s.push_str(&a.to_string_lossy());
    }
    s
}
