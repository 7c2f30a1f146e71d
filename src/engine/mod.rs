// Facade for the engine; stage logic delegates to submodules.

use crate::adapters::{
    AppInstaller, AptPackageManager, BrowserNotifier, CertIssuer, DatabaseAdmin, FileTree,
    HostFileTree, LockManager, MysqlAdmin, Notifier, OpensslIssuer, PackageManager,
    ReleaseInstaller, ServiceControl, SystemdControl,
};
use crate::config::Config;
use crate::constants::DEFAULT_LOCK_TIMEOUT_MS;
use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{Plan, RunMode, RunReport};

mod execute;
pub mod plan;
mod run;
mod templates;

/// The external collaborators a run drives. Bundled so hosts and tests can
/// swap the whole set at once.
pub struct Adapters {
    pub packages: Box<dyn PackageManager>,
    pub files: Box<dyn FileTree>,
    pub database: Box<dyn DatabaseAdmin>,
    pub services: Box<dyn ServiceControl>,
    pub installer: Box<dyn AppInstaller>,
    pub certificates: Box<dyn CertIssuer>,
    pub notifier: Box<dyn Notifier>,
}

impl Adapters {
    /// Real-host adapter set: apt, std fs, mysql client, systemctl, openssl,
    /// release-archive installer, console/browser notifier.
    #[must_use]
    pub fn host(config: &Config) -> Self {
        Self {
            packages: Box::new(AptPackageManager),
            files: Box::new(HostFileTree),
            database: Box::new(MysqlAdmin),
            services: Box::new(SystemdControl),
            installer: Box::new(ReleaseInstaller::new(config.release_base_url.clone())),
            certificates: Box::new(OpensslIssuer),
            notifier: Box::new(BrowserNotifier),
        }
    }
}

/// The provisioning engine: a configuration, an adapter set, and the
/// reporter pair. One engine value serves any number of runs.
pub struct Engine<E: FactsEmitter, A: AuditSink> {
    pub(crate) facts: E,
    pub(crate) audit: A,
    pub(crate) config: Config,
    pub(crate) adapters: Adapters,
    pub(crate) lock: Option<Box<dyn LockManager>>, // None in dev/test
    pub(crate) lock_timeout_ms: u64,
}

impl<E: FactsEmitter, A: AuditSink> Engine<E, A> {
    pub fn new(facts: E, audit: A, config: Config, adapters: Adapters) -> Self {
        Self {
            facts,
            audit,
            config,
            adapters,
            lock: None,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_lock_manager(mut self, lock: Box<dyn LockManager>) -> Self {
        self.lock = Some(lock);
        self
    }

    #[must_use]
    pub fn with_lock_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the full provisioning plan for this engine's configuration.
    #[must_use]
    pub fn plan(&self) -> Plan {
        plan::build(&self.config)
    }

    /// Execute a plan. Sequential, fail-fast; see `types::RunReport`.
    pub fn run(&self, plan: &Plan, mode: RunMode) -> RunReport {
        run::run(self, plan, mode)
    }
}
