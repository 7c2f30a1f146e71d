//! The state prober: answers "does this target already hold?" with pure
//! reads through the adapter set.
//!
//! Absence of the queried resource is an ordinary `Ok(false)`. Only an
//! undeterminable state (unreadable file, failing package query) is an
//! error, and that error is a hard failure for the action, never silently
//! treated as unsatisfied.

use crate::engine::Adapters;
use crate::types::errors::Result;
use crate::types::target::Target;

pub struct Prober<'a> {
    adapters: &'a Adapters,
}

impl<'a> Prober<'a> {
    #[must_use]
    pub fn new(adapters: &'a Adapters) -> Self {
        Self { adapters }
    }

    /// Pure read; safe to call repeatedly; performs no mutation.
    pub fn satisfied(&self, target: &Target) -> Result<bool> {
        match target {
            Target::SystemCurrent => self.adapters.packages.up_to_date(),
            Target::PackageInstalled { name } => self.adapters.packages.installed(name),
            Target::FileExists { path } => self.adapters.files.exists(path),
            Target::FileContains { path, needle } => {
                self.adapters.files.contains(path, needle)
            }
            Target::DatabaseExists { name } => self.adapters.database.database_exists(name),
            Target::DatabaseUserExists { name } => self.adapters.database.user_exists(name),
            Target::ServiceActive { name } => self.adapters.services.is_active(name),
        }
    }
}
