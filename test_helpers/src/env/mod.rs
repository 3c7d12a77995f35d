//! Helpers for mutating the process environment in tests.
//!
//! All mutations go through one global re-entrant mutex. Guards restore the
//! previous value on drop, removing the variable if it was absent. An
//! [`EnvScope`] additionally holds the mutex for its whole lifetime, so
//! code under test reads a stable environment.
//!
//! # Examples
//!
//! ```
//! use layered_cli_test_helpers::env;
//!
//! let _scope = env::scope([("APP_PORT", Some("8080")), ("APP_HOST", None)]);
//! assert_eq!(std::env::var("APP_PORT").as_deref(), Ok("8080"));
//! assert!(std::env::var("APP_HOST").is_err());
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

/// RAII guard restoring one variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

fn mutate(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    match value {
        // SAFETY: `ENV_MUTEX` is held.
        Some(text) => unsafe { env_set_var(&key, text) },
        // SAFETY: `ENV_MUTEX` is held.
        None => unsafe { env_remove_var(&key) },
    }
    EnvVarGuard { key, original }
}

/// Sets `key` and returns a guard restoring its prior value.
///
/// # Examples
///
/// ```
/// use layered_cli_test_helpers::env;
///
/// let _g = env::set_var("HELPERS_DOC_SET", "on");
/// assert_eq!(std::env::var("HELPERS_DOC_SET").as_deref(), Ok("on"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    mutate(key.into(), Some(value.as_ref()))
}

/// Removes `key` and returns a guard restoring its prior value.
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    mutate(key.into(), None)
}

/// Holds the environment lock and a set of guards.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores variables"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl EnvScope {
    /// Sets another variable for the remainder of the scope.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        self.guards.push(set_var(key, value));
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Restore in reverse while the lock is still held.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Applies `vars` under the lock: `Some` sets, `None` removes.
pub fn scope<'a, I>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let lock = ENV_MUTEX.lock();
    let guards = vars
        .into_iter()
        .map(|(key, value)| mutate(key.to_owned(), value.map(OsStr::new)))
        .collect();
    EnvScope {
        guards,
        _lock: lock,
    }
}

/// Runs `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}
