//! Plan data: actions, steps, and run modes.

use std::path::PathBuf;

use super::target::Target;

/// How a run treats unsatisfied targets.
#[derive(Clone, Debug)]
pub enum RunMode {
    /// Probe everything, mutate nothing; unsatisfied targets are reported as
    /// the change they would make.
    DryRun,
    /// Probe and converge.
    Commit,
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::DryRun
    }
}

/// A concrete mutation. Ops never carry credentials; executors pull secrets
/// from the run configuration so serialized plans and facts stay secret-free.
#[derive(Clone, Debug)]
pub enum Op {
    /// Refresh the package index and apply pending upgrades.
    RefreshSystem,
    InstallPackage {
        name: String,
    },
    /// Drive the application's own installer to populate `install_dir`,
    /// then hand the tree to the web server account.
    DeployApplication {
        version: String,
        install_dir: PathBuf,
        owner: String,
    },
    /// Render a configuration file in place; optionally tighten its mode
    /// (credential-bearing files) and reload a service so a changed file
    /// takes effect.
    WriteConfigFile {
        path: PathBuf,
        contents: String,
        mode: Option<u32>,
        reload: Option<String>,
    },
    /// Link an available site into the enabled set and reload the server.
    EnableSite {
        available: PathBuf,
        enabled: PathBuf,
        service: String,
    },
    /// Link an available module into the enabled set and restart the server.
    EnableModule {
        module: String,
        available: PathBuf,
        enabled: PathBuf,
        service: String,
    },
    /// Enable the unit at boot and start it now.
    EnsureServiceActive {
        service: String,
    },
    /// Set one `key = value` line in a runtime configuration file. When the
    /// setting actually changes, stale session/cache directories are purged
    /// and the service restarted; an already-correct setting does neither.
    HardenRuntimeSetting {
        path: PathBuf,
        key: String,
        value: String,
        purge_dirs: Vec<PathBuf>,
        restart: String,
    },
    EnsureDatabase {
        name: String,
    },
    /// Create the database user and grant it the application database.
    /// The credential comes from `Config`, not from the op.
    EnsureDatabaseUser {
        name: String,
        database: String,
    },
    EnsureKeyPair {
        key_path: PathBuf,
    },
    EnsureCertificate {
        key_path: PathBuf,
        cert_path: PathBuf,
        subject: String,
        days: u32,
    },
    /// Announce the final URL once and drop a stamp file so re-runs stay
    /// quiet.
    AnnounceCompletion {
        url: String,
        stamp: PathBuf,
    },
}

impl Op {
    /// Short stable mnemonic used in deterministic IDs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Op::RefreshSystem => "refresh",
            Op::InstallPackage { .. } => "install",
            Op::DeployApplication { .. } => "deploy",
            Op::WriteConfigFile { .. } => "write",
            Op::EnableSite { .. } => "ensite",
            Op::EnableModule { .. } => "enmod",
            Op::EnsureServiceActive { .. } => "service",
            Op::HardenRuntimeSetting { .. } => "harden",
            Op::EnsureDatabase { .. } => "createdb",
            Op::EnsureDatabaseUser { .. } => "createuser",
            Op::EnsureKeyPair { .. } => "genkey",
            Op::EnsureCertificate { .. } => "gencert",
            Op::AnnounceCompletion { .. } => "announce",
        }
    }
}

/// One idempotent unit of work: a desired target plus the mutation that
/// establishes it when probing says it does not hold yet.
#[derive(Clone, Debug)]
pub struct Action {
    pub target: Target,
    pub op: Op,
}

impl Action {
    /// Operator-facing description of the mutation.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.op {
            Op::RefreshSystem => {
                "refresh package index and apply pending upgrades".to_string()
            }
            Op::InstallPackage { name } => format!("install package {name}"),
            Op::DeployApplication { version, install_dir, .. } => {
                format!("deploy application {version} into {}", install_dir.display())
            }
            Op::WriteConfigFile { path, .. } => format!("render {}", path.display()),
            Op::EnableSite { enabled, .. } => {
                format!("enable site {}", enabled.display())
            }
            Op::EnableModule { module, .. } => format!("enable module {module}"),
            Op::EnsureServiceActive { service } => {
                format!("enable and start {service}")
            }
            Op::HardenRuntimeSetting { path, key, value, .. } => {
                format!("set {key} = {value} in {}", path.display())
            }
            Op::EnsureDatabase { name } => format!("create database {name}"),
            Op::EnsureDatabaseUser { name, .. } => {
                format!("create database user {name}")
            }
            Op::EnsureKeyPair { key_path } => {
                format!("generate private key {}", key_path.display())
            }
            Op::EnsureCertificate { cert_path, .. } => {
                format!("issue self-signed certificate {}", cert_path.display())
            }
            Op::AnnounceCompletion { url, .. } => {
                format!("announce completion at {url}")
            }
        }
    }
}

/// A named, ordered sequence of actions covering one provisioning concern.
/// Ordering inside a step matters: later actions may assume earlier ones
/// succeeded.
#[derive(Clone, Debug)]
pub struct Step {
    pub name: String,
    pub actions: Vec<Action>,
}

/// An ordered list of steps, executed sequentially with fail-fast semantics.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    /// Total number of actions across all steps.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.steps.iter().map(|s| s.actions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.action_count() == 0
    }
}
