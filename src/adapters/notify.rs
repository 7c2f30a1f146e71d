//! Post-install notification seam.

use std::process::{Command, Stdio};

use crate::types::errors::Result;

pub trait Notifier: Send + Sync {
    /// Tell the operator the stack is live at `url`.
    fn announce(&self, url: &str) -> Result<()>;
}

/// Prints the URL and makes a best-effort browser launch; a missing or
/// failing browser never fails the run.
#[derive(Debug, Default)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn announce(&self, url: &str) -> Result<()> {
        println!("provisioning complete, site available at {url}");
        let _ = Command::new("xdg-open")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        Ok(())
    }
}
