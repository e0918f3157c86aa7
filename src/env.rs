//! Scoped process-environment overlay
//!
//! The update call runs under Bundler-specific variables that must not
//! leak to the rest of the process. `EnvOverlay` snapshots the full
//! environment on construction, applies the overlay, and restores the
//! snapshot on drop. Restoration runs on every exit path, including
//! unwinding, so no caller needs a manual cleanup call.
//!
//! The process environment is global mutable state: at most one update
//! may be in flight per process, and callers must serialize.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;

/// RAII guard restoring the process environment on drop
pub struct EnvOverlay {
    snapshot: Vec<(OsString, OsString)>,
}

impl EnvOverlay {
    /// Snapshot the current environment and apply the overlay
    pub fn apply(overlay: &BTreeMap<String, String>) -> Self {
        let snapshot = env::vars_os().collect();
        for (key, value) in overlay {
            env::set_var(key, value);
        }
        Self { snapshot }
    }
}

impl Drop for EnvOverlay {
    fn drop(&mut self) {
        // Remove everything the snapshot does not know about, then put
        // every snapshotted variable back
        let current: Vec<OsString> = env::vars_os().map(|(key, _)| key).collect();
        for key in current {
            if !self.snapshot.iter().any(|(snap_key, _)| *snap_key == key) {
                env::remove_var(&key);
            }
        }
        for (key, value) in &self.snapshot {
            env::set_var(key, value);
        }
    }
}

/// Serializes env-mutating tests; the environment is process-global
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
