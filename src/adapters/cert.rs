//! Certificate issuance seam. The engine probes for existing artifacts
//! before calling, so implementations only ever generate.

use std::fs;
use std::path::Path;
use std::process::Command;

use super::run_checked;
use crate::types::errors::{Error, Result};

pub trait CertIssuer: Send + Sync {
    /// Generate a private key at `key_path` (mode 0600).
    fn generate_key_pair(&self, key_path: &Path) -> Result<()>;
    /// Issue a self-signed certificate for `subject`, valid `days` days.
    fn generate_certificate(
        &self,
        key_path: &Path,
        cert_path: &Path,
        subject: &str,
        days: u32,
    ) -> Result<()>;
}

/// Shell-out implementation over the `openssl` utility.
#[derive(Debug, Default)]
pub struct OpensslIssuer;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::mutation(format!("mkdir {}: {e}", parent.display())))?;
    }
    Ok(())
}

impl CertIssuer for OpensslIssuer {
    fn generate_key_pair(&self, key_path: &Path) -> Result<()> {
        ensure_parent(key_path)?;
        run_checked(
            Command::new("openssl")
                .args(["genrsa", "-out"])
                .arg(key_path)
                .arg("2048"),
        )?;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(key_path, fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::mutation(format!("chmod {}: {e}", key_path.display())))?;
        Ok(())
    }

    fn generate_certificate(
        &self,
        key_path: &Path,
        cert_path: &Path,
        subject: &str,
        days: u32,
    ) -> Result<()> {
        ensure_parent(cert_path)?;
        run_checked(
            Command::new("openssl")
                .args(["req", "-new", "-x509", "-key"])
                .arg(key_path)
                .arg("-out")
                .arg(cert_path)
                .arg("-days")
                .arg(days.to_string())
                .arg("-subj")
                .arg(subject),
        )?;
        Ok(())
    }
}
