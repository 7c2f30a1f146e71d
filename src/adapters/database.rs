//! Database seam: existence probes plus idempotent DDL over the local
//! control channel.

use std::process::Command;

use super::{run_checked, run_query};
use crate::types::errors::{Error, Result};

pub trait DatabaseAdmin: Send + Sync {
    fn database_exists(&self, name: &str) -> Result<bool>;
    fn user_exists(&self, name: &str) -> Result<bool>;
    /// Execute DDL statements in order. Statements are expected to be
    /// `CREATE ... IF NOT EXISTS`-style so a raced re-run stays safe.
    fn execute_ddl(&self, statements: &[String]) -> Result<()>;
}

/// MySQL/MariaDB implementation over the `mysql` client on the local socket.
#[derive(Debug, Default)]
pub struct MysqlAdmin;

impl MysqlAdmin {
    fn client(&self) -> Command {
        let mut cmd = Command::new("mysql");
        cmd.args(["--batch", "--skip-column-names"]);
        cmd
    }

    fn query(&self, sql: &str) -> Result<String> {
        let out = run_query(self.client().arg("-e").arg(sql))?;
        if !out.status.success() {
            return Err(Error::probe(format!(
                "mysql query failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl DatabaseAdmin for MysqlAdmin {
    fn database_exists(&self, name: &str) -> Result<bool> {
        let rows = self.query(&format!("SHOW DATABASES LIKE '{name}'"))?;
        Ok(!rows.trim().is_empty())
    }

    fn user_exists(&self, name: &str) -> Result<bool> {
        let rows = self.query(&format!(
            "SELECT COUNT(*) FROM mysql.user WHERE user = '{name}' AND host = 'localhost'"
        ))?;
        Ok(rows.trim() != "0")
    }

    fn execute_ddl(&self, statements: &[String]) -> Result<()> {
        let script = statements.join(";\n");
        run_checked(self.client().arg("-e").arg(script))?;
        Ok(())
    }
}
