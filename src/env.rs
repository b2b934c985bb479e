//! Environment resolution for the prebuilt version pair.
//!
//! Two variables select the prebuilt: `LLVM_PREBUILTS_VERSION` names the
//! directory under the checkout and `LLVM_RELEASE_VERSION` names the release
//! inside the resource directory. Either may be unset or empty, in which case
//! the configured [`ClangDefaults`] apply. Values are never validated; a
//! strange version string simply produces a strange path.

use std::cell::RefCell;
use std::collections::BTreeMap;

use camino::Utf8PathBuf;

use crate::config::ClangDefaults;

/// Directory segment override for the prebuilt checkout.
pub const LLVM_PREBUILTS_VERSION: &str = "LLVM_PREBUILTS_VERSION";

/// Release version override used inside the resource directory.
pub const LLVM_RELEASE_VERSION: &str = "LLVM_RELEASE_VERSION";

/// Override for the prebuilts base directory.
pub const LLVM_PREBUILTS_BASE: &str = "LLVM_PREBUILTS_BASE";

/// When true, sanitizer shared runtimes are built from source.
pub const FORCE_BUILD_SANITIZER_SHARED_OBJECTS: &str = "FORCE_BUILD_SANITIZER_SHARED_OBJECTS";

/// Read access to environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource {
    /// Return the value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
///
/// Values that are not valid Unicode are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory [`EnvSource`], mainly for hosts that snapshot their
/// environment up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the environment with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Wraps an [`EnvSource`] and records which variables were read.
///
/// The host re-runs configuration when one of these variables changes, so
/// the recorded list is the module's environment dependency set.
#[derive(Debug)]
pub struct RecordingEnv<E> {
    inner: E,
    read: RefCell<Vec<String>>,
}

impl<E: EnvSource> RecordingEnv<E> {
    /// Start recording reads against `inner`.
    #[must_use]
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            read: RefCell::new(Vec::new()),
        }
    }

    /// Variable names read so far, in first-read order without duplicates.
    #[must_use]
    pub fn dependencies(&self) -> Vec<String> {
        self.read.borrow().clone()
    }
}

impl<E: EnvSource> EnvSource for RecordingEnv<E> {
    fn var(&self, name: &str) -> Option<String> {
        {
            let mut read = self.read.borrow_mut();
            if !read.iter().any(|seen| seen == name) {
                read.push(name.to_owned());
            }
        }
        self.inner.var(name)
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Return the value of `name` when it is set and non-empty.
#[must_use]
pub fn non_empty_var(env: &dyn EnvSource, name: &str) -> Option<String> {
    let value = env.var(name).filter(|value| !value.is_empty());
    log::trace!("env {name} = {value:?}");
    value
}

/// Whether `name` is set to one of the accepted truthy spellings.
///
/// Accepted values are `1`, `y`, `yes`, `on` and `true`. Anything else,
/// including an unset variable, is false.
///
/// # Examples
///
/// ```
/// use clang_prebuilts::env::{MapEnv, is_env_true};
///
/// let env = MapEnv::new().with("FLAG", "yes");
/// assert!(is_env_true(&env, "FLAG"));
/// assert!(!is_env_true(&env, "OTHER"));
/// ```
#[must_use]
pub fn is_env_true(env: &dyn EnvSource, name: &str) -> bool {
    matches!(
        non_empty_var(env, name).as_deref(),
        Some("1" | "y" | "yes" | "on" | "true")
    )
}

/// The resolved version pair for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    prebuilt_version_dir: String,
    release_version: String,
}

impl EnvConfig {
    /// Build a config from already-resolved values.
    #[must_use]
    pub fn new(prebuilt_version_dir: impl Into<String>, release_version: impl Into<String>) -> Self {
        Self {
            prebuilt_version_dir: prebuilt_version_dir.into(),
            release_version: release_version.into(),
        }
    }

    /// Directory segment of the prebuilt.
    #[must_use]
    pub fn prebuilt_version_dir(&self) -> &str {
        &self.prebuilt_version_dir
    }

    /// Release version inside the resource directory.
    #[must_use]
    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    /// The prebuilt base directory, relative to the module directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts::env::EnvConfig;
    ///
    /// let env = EnvConfig::new("clang-r383902b", "11.0.1");
    /// assert_eq!(env.prebuilt_dir(), "./clang-r383902b");
    /// ```
    #[must_use]
    pub fn prebuilt_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(".").join(&self.prebuilt_version_dir)
    }

    /// The runtime library directory:
    /// `<prebuilt_dir>/lib64/clang/<release_version>/lib/linux`.
    #[must_use]
    pub fn resource_dir(&self) -> Utf8PathBuf {
        self.prebuilt_dir()
            .join("lib64")
            .join("clang")
            .join(&self.release_version)
            .join("lib")
            .join("linux")
    }
}

/// Resolve the version pair from `env`, falling back to `defaults`.
///
/// # Examples
///
/// ```
/// use clang_prebuilts::config::ClangDefaults;
/// use clang_prebuilts::env::{MapEnv, resolve_env};
///
/// let env = MapEnv::new().with("LLVM_RELEASE_VERSION", "12.0.5");
/// let config = resolve_env(&env, &ClangDefaults::new("clang-r383902b", "11.0.1"));
/// assert_eq!(config.prebuilt_version_dir(), "clang-r383902b");
/// assert_eq!(config.release_version(), "12.0.5");
/// ```
#[must_use]
pub fn resolve_env(env: &dyn EnvSource, defaults: &ClangDefaults) -> EnvConfig {
    let config = EnvConfig {
        prebuilt_version_dir: non_empty_var(env, LLVM_PREBUILTS_VERSION)
            .unwrap_or_else(|| defaults.version.clone()),
        release_version: non_empty_var(env, LLVM_RELEASE_VERSION)
            .unwrap_or_else(|| defaults.short_version.clone()),
    };
    log::debug!(
        "resolved Clang prebuilt {} (release {})",
        config.prebuilt_version_dir,
        config.release_version
    );
    config
}
