//! Application installer seam: drives the release archive fetch/unpack
//! that populates the document root.

use std::path::Path;
use std::process::Command;

use super::run_checked;
use crate::types::errors::{Error, Result};

pub trait AppInstaller: Send + Sync {
    /// Populate `install_dir` with the given application version.
    fn deploy(&self, version: &str, install_dir: &Path) -> Result<()>;
}

/// Fetches `app-<version>.tar.gz` from a release mirror and unpacks it into
/// the install directory. Ownership of the tree is the caller's concern.
#[derive(Debug)]
pub struct ReleaseInstaller {
    base_url: String,
}

impl ReleaseInstaller {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

impl AppInstaller for ReleaseInstaller {
    fn deploy(&self, version: &str, install_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(install_dir)
            .map_err(|e| Error::mutation(format!("mkdir {}: {e}", install_dir.display())))?;
        let url = format!("{}/app-{version}.tar.gz", self.base_url);
        let archive = install_dir.join(".release.tar.gz");

        run_checked(
            Command::new("curl")
                .arg("-fsSL")
                .arg(&url)
                .arg("-o")
                .arg(&archive),
        )?;
        let unpack = run_checked(
            Command::new("tar")
                .arg("-xzf")
                .arg(&archive)
                .arg("-C")
                .arg(install_dir)
                .args(["--strip-components", "1"]),
        );
        let _ = std::fs::remove_file(&archive);
        unpack?;
        Ok(())
    }
}
