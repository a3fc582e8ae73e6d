//! Scoped environment-variable overrides for tests.
//!
//! Environment mutation is process-global, so every guard holds [`ENV_LOCK`]
//! for its lifetime and restores the previous value on drop.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serialises environment mutation across tests in one process.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Restores a set of environment variables when dropped.
///
/// # Examples
/// ```
/// use cfpq_data_test_support::env::EnvGuard;
///
/// {
///     let _guard = EnvGuard::new().set("CFPQ_EXAMPLE_VAR", "1");
///     assert_eq!(std::env::var("CFPQ_EXAMPLE_VAR").as_deref(), Ok("1"));
/// }
/// assert!(std::env::var("CFPQ_EXAMPLE_VAR").is_err());
/// ```
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Acquires the environment lock, recovering it if a previous test
    /// panicked while holding it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Sets `key` to `value` until the guard is dropped.
    #[must_use]
    pub fn set(mut self, key: &'static str, value: &str) -> Self {
        self.remember(key);
        // SAFETY: mutation is serialised by ENV_LOCK.
        unsafe { env::set_var(key, value) };
        self
    }

    /// Removes `key` until the guard is dropped.
    #[must_use]
    pub fn unset(mut self, key: &'static str) -> Self {
        self.remember(key);
        // SAFETY: mutation is serialised by ENV_LOCK.
        unsafe { env::remove_var(key) };
        self
    }

    fn remember(&mut self, key: &'static str) {
        if self.saved.iter().all(|(saved, _)| *saved != key) {
            self.saved.push((key, env::var(key).ok()));
        }
    }
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original) in self.saved.drain(..).rev() {
            match original {
                // SAFETY: mutation is serialised by ENV_LOCK.
                Some(value) => unsafe { env::set_var(key, value) },
                // SAFETY: mutation is serialised by ENV_LOCK.
                None => unsafe { env::remove_var(key) },
            }
        }
    }
}
