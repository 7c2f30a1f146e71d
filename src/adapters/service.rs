//! Service control seam: fire-and-forget unit operations with a boolean
//! activity probe.

use std::process::Command;

use super::{run_checked, run_query};
use crate::types::errors::Result;

pub trait ServiceControl: Send + Sync {
    fn is_active(&self, name: &str) -> Result<bool>;
    fn enable(&self, name: &str) -> Result<()>;
    fn restart(&self, name: &str) -> Result<()>;
    fn reload(&self, name: &str) -> Result<()>;
}

/// systemd implementation over `systemctl`.
#[derive(Debug, Default)]
pub struct SystemdControl;

impl ServiceControl for SystemdControl {
    fn is_active(&self, name: &str) -> Result<bool> {
        // `is-active` exits 0 when active, nonzero otherwise; both are
        // readable answers.
        let out = run_query(Command::new("systemctl").args(["is-active", "--quiet", name]))?;
        Ok(out.status.success())
    }

    fn enable(&self, name: &str) -> Result<()> {
        run_checked(Command::new("systemctl").args(["enable", name]))?;
        Ok(())
    }

    fn restart(&self, name: &str) -> Result<()> {
        run_checked(Command::new("systemctl").args(["restart", name]))?;
        Ok(())
    }

    fn reload(&self, name: &str) -> Result<()> {
        run_checked(Command::new("systemctl").args(["reload", name]))?;
        Ok(())
    }
}
