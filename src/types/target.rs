//! Declarative descriptions of desired host state.

use serde::Serialize;
use std::path::PathBuf;

/// A single piece of host state a provisioning action wants to hold.
///
/// Targets are immutable, constructed once per action at plan-build time, and
/// probed, never mutated, by `probe::Prober`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Target {
    /// Package index is fresh and no upgradable packages remain.
    SystemCurrent,
    /// The named package is installed.
    PackageInstalled { name: String },
    /// The file (or symlink) exists.
    FileExists { path: PathBuf },
    /// The file exists and contains `needle` as a substring. A missing file
    /// is an ordinary "no", not an error.
    FileContains { path: PathBuf, needle: String },
    /// The database exists on the local server.
    DatabaseExists { name: String },
    /// The database user exists on the local server.
    DatabaseUserExists { name: String },
    /// The service unit is currently active.
    ServiceActive { name: String },
}

impl Target {
    /// Stable serialized form used for deterministic IDs and fact payloads.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Target::SystemCurrent => "system".to_string(),
            Target::PackageInstalled { name } => format!("pkg:{name}"),
            Target::FileExists { path } => format!("file:{}", path.display()),
            Target::FileContains { path, needle } => {
                format!("grep:{}:{needle}", path.display())
            }
            Target::DatabaseExists { name } => format!("db:{name}"),
            Target::DatabaseUserExists { name } => format!("dbuser:{name}"),
            Target::ServiceActive { name } => format!("svc:{name}"),
        }
    }
}
