//! Refresh lock (spec §5, §9): a PID-stamped advisory file lock serializing
//! concurrent refreshes. One refresh holds `<artifacts_dir>/.refresh.lock`
//! for its lifetime; a second refresh attempted while the first is still
//! running fails immediately with `RefreshInProgress` rather than waiting —
//! this is a one-shot batch tool, not a long-poller.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use sensor_core::errors::{SensorError, SensorResult};

const LOCK_FILE_NAME: &str = ".refresh.lock";

/// Held for the lifetime of one refresh. Dropping the guard releases the
/// lock unconditionally, including on panic unwind, so a crashed refresh
/// never wedges the next one behind a lock only a stale-PID check can clear.
pub struct RefreshLockGuard {
    path: PathBuf,
}

impl Drop for RefreshLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Attempts to acquire the refresh lock under `artifacts_dir`.
///
/// Fails fast with `SensorError::RefreshInProgress` if a live process holds
/// it. A lock file whose recorded PID is no longer running is treated as
/// stale and taken over without waiting.
pub fn acquire(artifacts_dir: &Path) -> SensorResult<RefreshLockGuard> {
    std::fs::create_dir_all(artifacts_dir).map_err(|e| SensorError::CorpusError {
        reason: format!(
            "failed to create artifacts directory {}: {e}",
            artifacts_dir.display()
        ),
    })?;
    let lock_path = artifacts_dir.join(LOCK_FILE_NAME);

    match try_create(&lock_path) {
        Ok(guard) => Ok(guard),
        Err(LockState::HeldBy(pid)) => Err(SensorError::RefreshInProgress { pid }),
        Err(LockState::Stale) => {
            let _ = std::fs::remove_file(&lock_path);
            try_create(&lock_path).map_err(|_| SensorError::RefreshInProgress { pid: 0 })
        }
        Err(LockState::Unreadable) => Err(SensorError::RefreshInProgress { pid: 0 }),
    }
}

enum LockState {
    HeldBy(u32),
    Stale,
    Unreadable,
}

fn try_create(lock_path: &Path) -> Result<RefreshLockGuard, LockState> {
    match OpenOptions::new().create_new(true).write(true).open(lock_path) {
        Ok(mut file) => {
            let pid = std::process::id();
            let _ = writeln!(file, "{pid}");
            Ok(RefreshLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut f| f.read_to_string(&mut contents))
                .is_err()
            {
                return Err(LockState::Unreadable);
            }
            match contents.trim().parse::<u32>() {
                Ok(pid) if process_is_running(pid) => Err(LockState::HeldBy(pid)),
                Ok(_) => Err(LockState::Stale),
                Err(_) => Err(LockState::Unreadable),
            }
        }
        Err(_) => Err(LockState::Unreadable),
    }
}

#[cfg(unix)]
fn process_is_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn process_is_running(_pid: u32) -> bool {
    // No portable liveness check off Unix; treat the holder as alive so a
    // concurrent refresh fails closed rather than clobbering a running one.
    true
}
