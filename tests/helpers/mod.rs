#![allow(dead_code)]
// Shared fakes for engine scenario tests: one in-memory host behind every
// adapter trait, with a recorded mutation log and per-verb failure injection.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::Level;
use serde_json::Value;

use groundwork::adapters::{
    AppInstaller, CertIssuer, DatabaseAdmin, FileTree, Notifier, PackageManager, ServiceControl,
};
use groundwork::config::Config;
use groundwork::logging::{AuditSink, FactsEmitter};
use groundwork::types::errors::{Error, Result};
use groundwork::{Adapters, Engine};

#[derive(Default)]
pub struct HostState {
    pub system_current: bool,
    pub packages: BTreeSet<String>,
    pub files: BTreeMap<PathBuf, String>,
    pub databases: BTreeSet<String>,
    pub db_users: BTreeSet<String>,
    pub active_services: BTreeSet<String>,
    pub enabled_services: BTreeSet<String>,
    pub announcements: Vec<String>,
    /// Every mutating call, in order. Probes never appear here.
    pub mutations: Vec<String>,
    /// Verbs whose next mutation (or probe, for `probe-*`) fails.
    pub fail_verbs: BTreeSet<String>,
}

/// One shared in-memory host; `adapters()` hands out handles implementing
/// every adapter trait against the same state.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    pub fn adapters(&self) -> Adapters {
        Adapters {
            packages: Box::new(self.clone()),
            files: Box::new(self.clone()),
            database: Box::new(self.clone()),
            services: Box::new(self.clone()),
            installer: Box::new(self.clone()),
            certificates: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
        }
    }

    pub fn mutations(&self) -> Vec<String> {
        self.state().mutations.clone()
    }

    pub fn clear_mutations(&self) {
        self.state().mutations.clear();
    }

    pub fn fail_on(&self, verb: &str) {
        self.state().fail_verbs.insert(verb.to_string());
    }

    pub fn clear_failure(&self, verb: &str) {
        self.state().fail_verbs.remove(verb);
    }

    /// Gate a mutation on injected failures and record it.
    fn begin(&self, verb: &str, entry: String) -> Result<MutexGuard<'_, HostState>> {
        let mut st = self.state.lock().unwrap();
        if st.fail_verbs.contains(verb) {
            return Err(Error::mutation(format!("injected {verb} failure")));
        }
        st.mutations.push(entry);
        Ok(st)
    }

    fn probe_gate(&self, verb: &str) -> Result<MutexGuard<'_, HostState>> {
        let st = self.state.lock().unwrap();
        if st.fail_verbs.contains(verb) {
            return Err(Error::probe(format!("injected {verb} failure")));
        }
        Ok(st)
    }
}

impl PackageManager for FakeHost {
    fn installed(&self, name: &str) -> Result<bool> {
        Ok(self.state().packages.contains(name))
    }

    fn install(&self, name: &str) -> Result<()> {
        self.begin("install", format!("install:{name}"))?
            .packages
            .insert(name.to_string());
        Ok(())
    }

    fn refresh_index(&self) -> Result<()> {
        self.begin("refresh", "refresh-index".to_string())?;
        Ok(())
    }

    fn upgrade_all(&self) -> Result<()> {
        self.begin("upgrade", "upgrade-all".to_string())?.system_current = true;
        Ok(())
    }

    fn up_to_date(&self) -> Result<bool> {
        Ok(self.state().system_current)
    }
}

impl FileTree for FakeHost {
    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.probe_gate("probe-files")?.files.contains_key(path))
    }

    fn contains(&self, path: &Path, needle: &str) -> Result<bool> {
        Ok(self
            .probe_gate("probe-files")?
            .files
            .get(path)
            .map(|c| c.contains(needle))
            .unwrap_or(false))
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.state().files.get(path).cloned())
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        self.begin("write", format!("write:{}", path.display()))?
            .files
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.begin("symlink", format!("symlink:{}", link.display()))?
            .files
            .insert(link.to_path_buf(), format!("-> {}", original.display()));
        Ok(())
    }

    fn set_owner_recursive(&self, path: &Path, owner: &str) -> Result<()> {
        self.begin("chown", format!("chown:{owner}:{}", path.display()))?;
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        self.begin("chmod", format!("chmod:{mode:o}:{}", path.display()))?;
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn purge_dir(&self, path: &Path) -> Result<()> {
        let mut st = self.begin("purge", format!("purge:{}", path.display()))?;
        let doomed: Vec<PathBuf> = st
            .files
            .keys()
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect();
        for p in doomed {
            st.files.remove(&p);
        }
        Ok(())
    }
}

impl DatabaseAdmin for FakeHost {
    fn database_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state().databases.contains(name))
    }

    fn user_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state().db_users.contains(name))
    }

    fn execute_ddl(&self, statements: &[String]) -> Result<()> {
        let mut st = self.begin("ddl", format!("ddl:{}", statements.len()))?;
        for stmt in statements {
            if let Some(rest) = stmt.strip_prefix("CREATE DATABASE IF NOT EXISTS `") {
                if let Some(name) = rest.split('`').next() {
                    st.databases.insert(name.to_string());
                }
            } else if let Some(rest) = stmt.strip_prefix("CREATE USER IF NOT EXISTS '") {
                if let Some(name) = rest.split('\'').next() {
                    st.db_users.insert(name.to_string());
                }
            }
        }
        Ok(())
    }
}

impl ServiceControl for FakeHost {
    fn is_active(&self, name: &str) -> Result<bool> {
        Ok(self.state().active_services.contains(name))
    }

    fn enable(&self, name: &str) -> Result<()> {
        self.begin("enable", format!("enable:{name}"))?
            .enabled_services
            .insert(name.to_string());
        Ok(())
    }

    fn restart(&self, name: &str) -> Result<()> {
        self.begin("restart", format!("restart:{name}"))?
            .active_services
            .insert(name.to_string());
        Ok(())
    }

    fn reload(&self, name: &str) -> Result<()> {
        self.begin("reload", format!("reload:{name}"))?;
        Ok(())
    }
}

impl AppInstaller for FakeHost {
    fn deploy(&self, version: &str, install_dir: &Path) -> Result<()> {
        self.begin("deploy", format!("deploy:{version}"))?
            .files
            .insert(install_dir.join("index.php"), format!("app {version}"));
        Ok(())
    }
}

impl CertIssuer for FakeHost {
    fn generate_key_pair(&self, key_path: &Path) -> Result<()> {
        self.begin("genkey", format!("genkey:{}", key_path.display()))?
            .files
            .insert(key_path.to_path_buf(), "PRIVATE KEY".to_string());
        Ok(())
    }

    fn generate_certificate(
        &self,
        _key_path: &Path,
        cert_path: &Path,
        subject: &str,
        _days: u32,
    ) -> Result<()> {
        self.begin("gencert", format!("gencert:{}", cert_path.display()))?
            .files
            .insert(cert_path.to_path_buf(), format!("CERT {subject}"));
        Ok(())
    }
}

impl Notifier for FakeHost {
    fn announce(&self, url: &str) -> Result<()> {
        self.begin("announce", format!("announce:{url}"))?
            .announcements
            .push(url.to_string());
        Ok(())
    }
}

/// Collecting facts double, one `(subsystem, event, decision, fields)` tuple
/// per emission.
#[derive(Clone, Default)]
pub struct CollectingFacts {
    events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl CollectingFacts {
    pub fn events(&self) -> Vec<(String, String, String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl FactsEmitter for CollectingFacts {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events.lock().unwrap().push((
            subsystem.to_string(),
            event.to_string(),
            decision.to_string(),
            fields,
        ));
    }
}

/// Collecting audit double for operator-line assertions.
#[derive(Clone, Default)]
pub struct CollectingAudit {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CollectingAudit {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl AuditSink for CollectingAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

/// Engine over the fake host with collecting reporter doubles.
pub fn engine_with(
    host: &FakeHost,
    config: Config,
) -> (Engine<CollectingFacts, CollectingAudit>, CollectingFacts) {
    let facts = CollectingFacts::default();
    let engine = Engine::new(
        facts.clone(),
        CollectingAudit::default(),
        config,
        host.adapters(),
    );
    (engine, facts)
}
