//! Advisory pass lock
//!
//! One pass at a time per vault. The lock file lives at the vault root and
//! is held with an exclusive `fs2` lock until the guard drops.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{PublishError, PublishResult};

pub const LOCK_FILE: &str = ".cartopub.lock";

#[derive(Debug)]
pub struct PassLock {
    file: File,
    path: PathBuf,
}

impl PassLock {
    /// Take the lock without waiting; a held lock is an error
    pub fn acquire(vault_root: &Path) -> PublishResult<Self> {
        let path = vault_root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.try_lock_exclusive().map_err(|_| PublishError::Locked {
            path: path.display().to_string(),
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PassLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
