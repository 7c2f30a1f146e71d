//! Immutable run configuration, resolved once before plan construction.
//!
//! No ambient global state: every value the step catalog needs travels in
//! this struct. Validation happens up front so a malformed value surfaces as
//! `ErrorKind::Config` before any step runs.

use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::constants::{DEFAULT_PHP_INI, DEFAULT_RELEASE_BASE_URL, DEFAULT_TLS_DAYS};
use crate::types::errors::{Error, Result};

#[derive(Clone, Debug, Serialize)]
pub struct Config {
    /// Fully-qualified domain the virtual hosts serve.
    pub domain: String,
    /// Application release to deploy, `MAJOR.MINOR.PATCH`.
    pub app_version: String,
    /// Absolute document root the application is installed into.
    pub install_dir: PathBuf,
    pub db_name: String,
    pub db_user: String,
    /// Database credential. Never serialized into reports or facts.
    #[serde(skip_serializing)]
    pub db_password: String,
    pub tls_days: u32,
    /// Runtime configuration file mutated by the session-hardening step.
    pub php_ini: PathBuf,
    /// Base URL release archives are fetched from.
    pub release_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: "app.test".to_string(),
            app_version: "1.0.0".to_string(),
            install_dir: PathBuf::from("/var/www/app"),
            db_name: "app".to_string(),
            db_user: "app".to_string(),
            db_password: Config::generated_password(),
            tls_days: DEFAULT_TLS_DAYS,
            php_ini: PathBuf::from(DEFAULT_PHP_INI),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }
}

fn valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn valid_domain(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && !s.starts_with('.')
        && !s.ends_with('.')
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
}

impl Config {
    /// Generate a credential when the operator supplied none.
    #[must_use]
    pub fn generated_password() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Check every field; the first offending value is reported.
    pub fn validate(&self) -> Result<()> {
        if !valid_domain(&self.domain) {
            return Err(Error::config(format!("invalid domain: {:?}", self.domain)));
        }
        if self.app_version.is_empty()
            || !self
                .app_version
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(Error::config(format!(
                "invalid application version: {:?}",
                self.app_version
            )));
        }
        if !self.install_dir.is_absolute() {
            return Err(Error::config(format!(
                "install directory must be absolute: {}",
                self.install_dir.display()
            )));
        }
        if !valid_identifier(&self.db_name) {
            return Err(Error::config(format!("invalid database name: {:?}", self.db_name)));
        }
        if !valid_identifier(&self.db_user) {
            return Err(Error::config(format!("invalid database user: {:?}", self.db_user)));
        }
        if self.db_password.is_empty() || self.db_password.contains('\'') {
            return Err(Error::config("invalid database credential".to_string()));
        }
        if self.tls_days == 0 {
            return Err(Error::config("certificate validity must be at least one day".to_string()));
        }
        Ok(())
    }
}
