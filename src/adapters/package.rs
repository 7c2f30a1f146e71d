//! Package manager seam: boolean install queries plus idempotent installs.

use std::process::Command;

use super::{run_checked, run_query};
use crate::types::errors::{Error, Result};

pub trait PackageManager: Send + Sync {
    /// Pure query: is the package currently installed?
    fn installed(&self, name: &str) -> Result<bool>;
    /// Install the package; must be a no-op-equivalent if raced.
    fn install(&self, name: &str) -> Result<()>;
    /// Refresh the package index.
    fn refresh_index(&self) -> Result<()>;
    /// Apply all pending upgrades.
    fn upgrade_all(&self) -> Result<()>;
    /// Pure query backing `Target::SystemCurrent`: nothing left to upgrade.
    fn up_to_date(&self) -> Result<bool>;
}

/// Debian/Ubuntu implementation over `dpkg-query` and non-interactive
/// `apt-get`.
#[derive(Debug, Default)]
pub struct AptPackageManager;

impl AptPackageManager {
    fn apt_get(&self) -> Command {
        let mut cmd = Command::new("apt-get");
        cmd.env("DEBIAN_FRONTEND", "noninteractive");
        cmd
    }
}

impl PackageManager for AptPackageManager {
    fn installed(&self, name: &str) -> Result<bool> {
        let out = run_query(
            Command::new("dpkg-query").args(["-W", "-f=${Status}", name]),
        )?;
        if !out.status.success() {
            // dpkg-query exits nonzero for unknown packages; that is an
            // ordinary "not installed", not a probe failure.
            return Ok(false);
        }
        Ok(String::from_utf8_lossy(&out.stdout).contains("install ok installed"))
    }

    fn install(&self, name: &str) -> Result<()> {
        run_checked(self.apt_get().args(["install", "-y", name]))?;
        Ok(())
    }

    fn refresh_index(&self) -> Result<()> {
        run_checked(self.apt_get().arg("update"))?;
        Ok(())
    }

    fn upgrade_all(&self) -> Result<()> {
        run_checked(self.apt_get().args(["upgrade", "-y"]))?;
        Ok(())
    }

    fn up_to_date(&self) -> Result<bool> {
        // Simulated upgrade; "0 upgraded" in the summary line means current.
        let out = run_query(self.apt_get().args(["-s", "upgrade"]))?;
        if !out.status.success() {
            return Err(Error::probe(format!(
                "apt-get -s upgrade exited with {}",
                out.status
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).contains("0 upgraded"))
    }
}
