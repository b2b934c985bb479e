//! Built-in default versions for the Clang prebuilts checkout.
//!
//! The environment may override both values at load time (see
//! [`crate::env`]). When it does not, the pair pinned here decides which
//! directory under the prebuilts checkout is used. Checkouts that track a
//! different toolchain can pin their own pair in a small TOML file:
//!
//! ```toml
//! version = "clang-r416183b"
//! short_version = "12.0.5"
//! ```

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::{PrebuiltsError, Result};

/// Directory name of the default Clang prebuilt under the checkout.
pub const DEFAULT_CLANG_VERSION: &str = "clang-r383902b";

/// Release version of the default Clang prebuilt.
pub const DEFAULT_CLANG_SHORT_VERSION: &str = "11.0.1";

/// Default version pair used when the environment is silent.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClangDefaults {
    /// Directory segment of the prebuilt, for example `clang-r383902b`.
    pub version: String,
    /// Release version used inside the resource directory, for example
    /// `11.0.1`.
    pub short_version: String,
}

impl ClangDefaults {
    /// Create a defaults pair from explicit values.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts::config::ClangDefaults;
    ///
    /// let defaults = ClangDefaults::new("11.0.1", "11.0.1");
    /// assert_eq!(defaults.version, "11.0.1");
    /// ```
    #[must_use]
    pub fn new(version: impl Into<String>, short_version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            short_version: short_version.into(),
        }
    }

    /// Parse a defaults pair from TOML.
    ///
    /// Omitted keys and whitespace-only values fall back to the built-in
    /// pair, so a templated `version = ""` does not produce an empty path
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns [`PrebuiltsError::Config`] when the document is not valid TOML
    /// or contains unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let parsed: Self = toml::from_str(source).map_err(|e| PrebuiltsError::Config {
            reason: e.to_string(),
        })?;
        Ok(parsed.normalised())
    }

    /// Read and parse a defaults file.
    ///
    /// # Errors
    ///
    /// Returns [`PrebuiltsError::ConfigRead`] when the file cannot be read and
    /// [`PrebuiltsError::Config`] when it cannot be parsed.
    pub fn load_from(path: &Utf8Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| PrebuiltsError::ConfigRead {
                path: path.to_owned(),
                source,
            })?;
        log::debug!("loading Clang defaults from {path}");
        Self::from_toml_str(&contents)
    }

    fn normalised(self) -> Self {
        let builtin = Self::default();
        Self {
            version: non_blank_or(self.version, builtin.version),
            short_version: non_blank_or(self.short_version, builtin.short_version),
        }
    }
}

impl Default for ClangDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_CLANG_VERSION, DEFAULT_CLANG_SHORT_VERSION)
    }
}

fn non_blank_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
