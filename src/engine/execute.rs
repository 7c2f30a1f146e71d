//! Op executor: maps each mutation onto the adapter set.
//!
//! Side effects live here and only here; the run loop gates every call with
//! a probe, and probes never reach this module.

use crate::logging::{AuditSink, FactsEmitter};
use crate::types::errors::Result;
use crate::types::Op;

use super::Engine;

pub(crate) fn execute<E: FactsEmitter, A: AuditSink>(
    eng: &Engine<E, A>,
    op: &Op,
) -> Result<()> {
    let ad = &eng.adapters;
    match op {
        Op::RefreshSystem => {
            ad.packages.refresh_index()?;
            ad.packages.upgrade_all()
        }
        Op::InstallPackage { name } => ad.packages.install(name),
        Op::DeployApplication { version, install_dir, owner } => {
            ad.installer.deploy(version, install_dir)?;
            ad.files.set_owner_recursive(install_dir, owner)
        }
        Op::WriteConfigFile { path, contents, mode, reload } => {
            ad.files.write_atomic(path, contents)?;
            if let Some(mode) = mode {
                ad.files.set_mode(path, *mode)?;
            }
            if let Some(service) = reload {
                ad.services.reload(service)?;
            }
            Ok(())
        }
        Op::EnableSite { available, enabled, service } => {
            ad.files.symlink(available, enabled)?;
            ad.services.reload(service)
        }
        Op::EnableModule { available, enabled, service, .. } => {
            ad.files.symlink(available, enabled)?;
            // Many modules ship a companion .conf next to the .load.
            let conf_available = available.with_extension("conf");
            if ad.files.exists(&conf_available)? {
                ad.files.symlink(&conf_available, &enabled.with_extension("conf"))?;
            }
            ad.services.restart(service)
        }
        Op::EnsureServiceActive { service } => {
            ad.services.enable(service)?;
            ad.services.restart(service)
        }
        Op::HardenRuntimeSetting { path, key, value, purge_dirs, restart } => {
            let current = ad.files.read_to_string(path)?.unwrap_or_default();
            ad.files.write_atomic(path, &set_ini_key(&current, key, value))?;
            // The purge and restart ride on the setting actually changing;
            // a satisfied target never reaches this op.
            for dir in purge_dirs {
                ad.files.purge_dir(dir)?;
            }
            ad.services.restart(restart)
        }
        Op::EnsureDatabase { name } => ad.database.execute_ddl(&[format!(
            "CREATE DATABASE IF NOT EXISTS `{name}` \
             CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        )]),
        Op::EnsureDatabaseUser { name, database } => {
            let password = &eng.config.db_password;
            ad.database.execute_ddl(&[
                format!(
                    "CREATE USER IF NOT EXISTS '{name}'@'localhost' \
                     IDENTIFIED BY '{password}'"
                ),
                format!("GRANT ALL PRIVILEGES ON `{database}`.* TO '{name}'@'localhost'"),
                "FLUSH PRIVILEGES".to_string(),
            ])
        }
        Op::EnsureKeyPair { key_path } => ad.certificates.generate_key_pair(key_path),
        Op::EnsureCertificate { key_path, cert_path, subject, days } => {
            ad.certificates.generate_certificate(key_path, cert_path, subject, *days)
        }
        Op::AnnounceCompletion { url, stamp } => {
            ad.notifier.announce(url)?;
            ad.files.write_atomic(stamp, &format!("provisioned for {url}\n"))
        }
    }
}

/// Set `key = value` in ini-style content, replacing an existing assignment
/// (commented or not) or appending when absent.
fn set_ini_key(content: &str, key: &str, value: &str) -> String {
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            let uncommented = line.trim_start().trim_start_matches(';').trim_start();
            let lhs = uncommented.split('=').next().unwrap_or("").trim();
            if lhs == key && !replaced {
                replaced = true;
                format!("{key} = {value}")
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(format!("{key} = {value}"));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::set_ini_key;

    #[test]
    fn replaces_existing_assignment() {
        let out = set_ini_key("session.cookie_httponly = 0\nmax_execution_time = 30", "session.cookie_httponly", "1");
        assert!(out.contains("session.cookie_httponly = 1"));
        assert!(out.contains("max_execution_time = 30"));
        assert!(!out.contains("= 0"));
    }

    #[test]
    fn uncomments_a_disabled_assignment() {
        let out = set_ini_key(";session.cookie_secure =", "session.cookie_secure", "1");
        assert_eq!(out, "session.cookie_secure = 1\n");
    }

    #[test]
    fn appends_when_absent() {
        let out = set_ini_key("", "session.cookie_secure", "1");
        assert_eq!(out, "session.cookie_secure = 1\n");
    }

    #[test]
    fn does_not_touch_longer_keys_sharing_a_prefix() {
        let out = set_ini_key("session.cookie_httponly_extra = 0", "session.cookie_httponly", "1");
        assert!(out.contains("session.cookie_httponly_extra = 0"));
        assert!(out.contains("session.cookie_httponly = 1"));
    }
}
