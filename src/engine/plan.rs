//! The step catalog: builds the provisioning plan from a configuration.
//!
//! Step order encodes the real dependency chain: packages before service
//! configuration, document root before virtual hosts, certificate before the
//! HTTPS host. The catalog is pure data construction; nothing here touches
//! the host.

use std::path::{Path, PathBuf};

use super::templates;
use crate::config::Config;
use crate::constants::{
    DB_SERVICE, MODS_AVAILABLE, MODS_ENABLED, PHP_SESSION_DIR, PROVISION_STAMP, SITES_AVAILABLE,
    SITES_ENABLED, TLS_CERT_DIR, TLS_KEY_DIR, WEB_OWNER, WEB_SERVICE,
};
use crate::types::{Action, Op, Plan, Step, Target};

pub(crate) fn tls_key_path(domain: &str) -> PathBuf {
    Path::new(TLS_KEY_DIR).join(format!("{domain}.key"))
}

pub(crate) fn tls_cert_path(domain: &str) -> PathBuf {
    Path::new(TLS_CERT_DIR).join(format!("{domain}.crt"))
}

fn step(name: &str, actions: Vec<Action>) -> Step {
    Step { name: name.to_string(), actions }
}

fn write_config(
    path: PathBuf,
    needle: String,
    contents: String,
    mode: Option<u32>,
    reload: Option<&str>,
) -> Action {
    Action {
        target: Target::FileContains { path: path.clone(), needle },
        op: Op::WriteConfigFile {
            path,
            contents,
            mode,
            reload: reload.map(str::to_string),
        },
    }
}

fn enable_site(conf_name: &str) -> Action {
    let available = Path::new(SITES_AVAILABLE).join(conf_name);
    let enabled = Path::new(SITES_ENABLED).join(conf_name);
    Action {
        target: Target::FileExists { path: enabled.clone() },
        op: Op::EnableSite {
            available,
            enabled,
            service: WEB_SERVICE.to_string(),
        },
    }
}

fn ensure_active(service: &str) -> Action {
    Action {
        target: Target::ServiceActive { name: service.to_string() },
        op: Op::EnsureServiceActive { service: service.to_string() },
    }
}

fn harden_setting(config: &Config, key: &str, value: &str) -> Action {
    Action {
        target: Target::FileContains {
            path: config.php_ini.clone(),
            needle: format!("{key} = {value}"),
        },
        op: Op::HardenRuntimeSetting {
            path: config.php_ini.clone(),
            key: key.to_string(),
            value: value.to_string(),
            purge_dirs: vec![PathBuf::from(PHP_SESSION_DIR)],
            restart: WEB_SERVICE.to_string(),
        },
    }
}

/// Build the full nine-step plan for `config`.
#[must_use]
pub fn build(config: &Config) -> Plan {
    let domain = &config.domain;
    let docroot = &config.install_dir;
    let key_path = tls_key_path(domain);
    let cert_path = tls_cert_path(domain);
    let http_conf = format!("{domain}.conf");
    let https_conf = format!("{domain}-ssl.conf");

    let steps = vec![
        step(
            "system update",
            vec![Action { target: Target::SystemCurrent, op: Op::RefreshSystem }],
        ),
        step(
            "install dependencies",
            templates::PACKAGES
                .iter()
                .map(|name| Action {
                    target: Target::PackageInstalled { name: (*name).to_string() },
                    op: Op::InstallPackage { name: (*name).to_string() },
                })
                .collect(),
        ),
        step(
            "install application",
            vec![Action {
                target: Target::FileExists { path: docroot.join("index.php") },
                op: Op::DeployApplication {
                    version: config.app_version.clone(),
                    install_dir: docroot.clone(),
                    owner: WEB_OWNER.to_string(),
                },
            }],
        ),
        step(
            "configure http virtual host",
            vec![
                ensure_active(WEB_SERVICE),
                write_config(
                    Path::new(SITES_AVAILABLE).join(&http_conf),
                    format!("ServerName {domain}"),
                    templates::http_vhost(domain, docroot),
                    None,
                    Some(WEB_SERVICE),
                ),
                enable_site(&http_conf),
            ],
        ),
        step(
            "harden session cookie policy",
            vec![
                harden_setting(config, "session.cookie_httponly", "1"),
                harden_setting(config, "session.cookie_secure", "1"),
            ],
        ),
        step(
            "configure database",
            vec![
                ensure_active(DB_SERVICE),
                Action {
                    target: Target::DatabaseExists { name: config.db_name.clone() },
                    op: Op::EnsureDatabase { name: config.db_name.clone() },
                },
                Action {
                    target: Target::DatabaseUserExists { name: config.db_user.clone() },
                    op: Op::EnsureDatabaseUser {
                        name: config.db_user.clone(),
                        database: config.db_name.clone(),
                    },
                },
                // The rendered file carries the credential; keep it out of
                // group/other hands.
                write_config(
                    docroot.join("config.php"),
                    templates::app_db_config_marker(config),
                    templates::app_db_config(config),
                    Some(0o640),
                    None,
                ),
            ],
        ),
        step(
            "issue tls certificate",
            vec![
                Action {
                    target: Target::FileExists { path: key_path.clone() },
                    op: Op::EnsureKeyPair { key_path: key_path.clone() },
                },
                Action {
                    target: Target::FileExists { path: cert_path.clone() },
                    op: Op::EnsureCertificate {
                        key_path: key_path.clone(),
                        cert_path: cert_path.clone(),
                        subject: format!("/CN={domain}"),
                        days: config.tls_days,
                    },
                },
            ],
        ),
        step(
            "configure https virtual host",
            vec![
                Action {
                    target: Target::FileExists {
                        path: Path::new(MODS_ENABLED).join("ssl.load"),
                    },
                    op: Op::EnableModule {
                        module: "ssl".to_string(),
                        available: Path::new(MODS_AVAILABLE).join("ssl.load"),
                        enabled: Path::new(MODS_ENABLED).join("ssl.load"),
                        service: WEB_SERVICE.to_string(),
                    },
                },
                write_config(
                    Path::new(SITES_AVAILABLE).join(&https_conf),
                    format!("ServerName {domain}"),
                    templates::https_vhost(domain, docroot, &cert_path, &key_path),
                    None,
                    Some(WEB_SERVICE),
                ),
                enable_site(&https_conf),
            ],
        ),
        step(
            "post-install notification",
            vec![Action {
                target: Target::FileExists { path: docroot.join(PROVISION_STAMP) },
                op: Op::AnnounceCompletion {
                    url: format!("https://{domain}/"),
                    stamp: docroot.join(PROVISION_STAMP),
                },
            }],
        ),
    ];

    Plan { steps }
}
