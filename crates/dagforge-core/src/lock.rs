//! Advisory file locks that serialize `dagf` processes sharing a project.
//!
//! Writers hold [`ProjectLock`] for their whole load, mutate, save cycle.
//! Readers take [`ProjectReadLock`], which coexists with other readers but
//! not with a writer.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use crate::error::ErrorCode;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock timed out after {waited:?} at {}", path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LockError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::Io(_) => ErrorCode::SnapshotWriteFailed,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[derive(Clone, Copy)]
enum Mode {
    Shared,
    Exclusive,
}

#[derive(Debug)]
struct Held {
    file: File,
    path: PathBuf,
}

impl Held {
    fn acquire(path: &Path, timeout: Duration, mode: Mode) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        let start = Instant::now();
        loop {
            let attempt = match mode {
                Mode::Shared => FileExt::try_lock_shared(&file),
                Mode::Exclusive => FileExt::try_lock_exclusive(&file),
            };
            if attempt.is_ok() {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            let waited = start.elapsed();
            if waited >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Exclusive lock held while a process mutates the project.
#[derive(Debug)]
pub struct ProjectLock {
    held: Held,
}

impl ProjectLock {
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            held: Held::acquire(path, timeout, Mode::Exclusive)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.held.path
    }
}

/// Shared lock held while a process only reads the project.
#[derive(Debug)]
pub struct ProjectReadLock {
    held: Held,
}

impl ProjectReadLock {
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Ok(Self {
            held: Held::acquire(path, timeout, Mode::Shared)?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.held.path
    }
}
