//! Filesystem seam: existence/content probes and atomic-enough writes.
//!
//! Writes stage a temporary file in the target directory and rename it into
//! place, so a rendered template either fully lands or the prior content is
//! visibly unmodified on failure.

use std::fs;
use std::io::{ErrorKind as IoKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::run_checked;
use crate::types::errors::{Error, Result};

pub trait FileTree: Send + Sync {
    fn exists(&self, path: &Path) -> Result<bool>;
    /// Substring probe; a missing file is `Ok(false)`.
    fn contains(&self, path: &Path, needle: &str) -> Result<bool>;
    /// Full content read; a missing file is `Ok(None)`.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;
    /// Atomic write: temp file in the target directory, then rename.
    /// Creates missing parent directories.
    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()>;
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn set_owner_recursive(&self, path: &Path, owner: &str) -> Result<()>;
    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a directory's contents, keeping the directory itself.
    /// A missing directory is a no-op.
    fn purge_dir(&self, path: &Path) -> Result<()>;
}

/// Real-host implementation over std; ownership changes shell out to
/// `chown` so name resolution stays with the system.
#[derive(Debug, Default)]
pub struct HostFileTree;

impl HostFileTree {
    fn tmp_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        path.with_file_name(format!(".{name}.groundwork.tmp"))
    }
}

impl FileTree for HostFileTree {
    fn exists(&self, path: &Path) -> Result<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == IoKind::NotFound => Ok(false),
            Err(e) => Err(Error::probe(format!("stat {}: {e}", path.display()))),
        }
    }

    fn contains(&self, path: &Path, needle: &str) -> Result<bool> {
        Ok(self
            .read_to_string(path)?
            .map(|c| c.contains(needle))
            .unwrap_or(false))
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(c) => Ok(Some(c)),
            Err(e) if e.kind() == IoKind::NotFound => Ok(None),
            Err(e) => Err(Error::probe(format!("read {}: {e}", path.display()))),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::mutation(format!("mkdir {}: {e}", parent.display())))?;
        }
        let tmp = Self::tmp_path(path);
        let write = |tmp: &Path| -> std::io::Result<()> {
            let mut f = fs::File::create(tmp)?;
            f.write_all(contents.as_bytes())?;
            f.sync_all()?;
            fs::rename(tmp, path)
        };
        write(&tmp).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::mutation(format!("write {}: {e}", path.display()))
        })
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::mutation(format!("mkdir {}: {e}", parent.display())))?;
        }
        match fs::symlink_metadata(link) {
            Ok(_) => {
                fs::remove_file(link)
                    .map_err(|e| Error::mutation(format!("unlink {}: {e}", link.display())))?;
            }
            Err(e) if e.kind() == IoKind::NotFound => {}
            Err(e) => return Err(Error::mutation(format!("stat {}: {e}", link.display()))),
        }
        std::os::unix::fs::symlink(original, link).map_err(|e| {
            Error::mutation(format!(
                "symlink {} -> {}: {e}",
                link.display(),
                original.display()
            ))
        })
    }

    fn set_owner_recursive(&self, path: &Path, owner: &str) -> Result<()> {
        run_checked(Command::new("chown").arg("-R").arg(owner).arg(path))?;
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| Error::mutation(format!("chmod {}: {e}", path.display())))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .map_err(|e| Error::mutation(format!("mkdir {}: {e}", path.display())))
    }

    fn purge_dir(&self, path: &Path) -> Result<()> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(Error::mutation(format!("readdir {}: {e}", path.display())))
            }
        };
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::mutation(format!("readdir {}: {e}", path.display())))?;
            let p = entry.path();
            let res = if entry
                .file_type()
                .map_err(|e| Error::mutation(format!("stat {}: {e}", p.display())))?
                .is_dir()
            {
                fs::remove_dir_all(&p)
            } else {
                fs::remove_file(&p)
            };
            res.map_err(|e| Error::mutation(format!("remove {}: {e}", p.display())))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_content_and_leaves_no_temp() {
        let td = tempfile::tempdir().unwrap();
        let fs_tree = HostFileTree;
        let path = td.path().join("conf/site.conf");

        fs_tree.write_atomic(&path, "first").unwrap();
        fs_tree.write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let names: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["site.conf".to_string()]);
    }

    #[test]
    fn contains_tolerates_missing_file() {
        let fs_tree = HostFileTree;
        let td = tempfile::tempdir().unwrap();
        assert!(!fs_tree
            .contains(&td.path().join("absent.conf"), "ServerName")
            .unwrap());
    }

    #[test]
    fn purge_dir_keeps_the_directory() {
        let td = tempfile::tempdir().unwrap();
        let dir = td.path().join("sessions");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("sess_a"), "x").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();

        HostFileTree.purge_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        // Missing directory is fine too.
        HostFileTree.purge_dir(&td.path().join("absent")).unwrap();
    }
}
