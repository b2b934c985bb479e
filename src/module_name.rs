//! Declared module names and the artefact filenames derived from them.
//!
//! Prebuilt modules are conventionally declared as `prebuilt_<library>`,
//! and the library filename is the declared name with that marker removed.
//! The multi-architecture archives only drop a leading marker; the sanitizer
//! runtimes drop the first occurrence wherever it appears.

use std::fmt;

use crate::error::{PrebuiltsError, Result};

/// Marker prefix carried by prebuilt module names.
pub const PREBUILT_PREFIX: &str = "prebuilt_";

/// Extension of static archives.
pub const STATIC_EXTENSION: &str = "a";

/// Extension of shared libraries.
pub const SHARED_EXTENSION: &str = "so";

/// A non-empty module name as declared to the host build system.
///
/// # Examples
///
/// ```
/// use clang_prebuilts::module_name::ModuleName;
///
/// let name = ModuleName::try_from("prebuilt_libFuzzer").expect("non-empty name");
/// assert_eq!(name.archive_stem(), "libFuzzer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// The name as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Library stem for multi-architecture archives: a leading
    /// [`PREBUILT_PREFIX`] is removed, nothing else.
    #[must_use]
    pub fn archive_stem(&self) -> &str {
        self.0.strip_prefix(PREBUILT_PREFIX).unwrap_or(&self.0)
    }

    /// Library stem for sanitizer runtimes: the first occurrence of
    /// [`PREBUILT_PREFIX`] is removed wherever it appears.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts::module_name::ModuleName;
    ///
    /// let name = ModuleName::try_from("libclang_rt.prebuilt_asan").expect("non-empty name");
    /// assert_eq!(name.runtime_stem(), "libclang_rt.asan");
    /// assert_eq!(name.archive_stem(), "libclang_rt.prebuilt_asan");
    /// ```
    #[must_use]
    pub fn runtime_stem(&self) -> String {
        self.0.replacen(PREBUILT_PREFIX, "", 1)
    }
}

/// Append `.ext` to a library stem.
#[must_use]
pub fn artefact_filename(stem: &str, extension: &str) -> String {
    format!("{stem}.{extension}")
}

impl TryFrom<&str> for ModuleName {
    type Error = PrebuiltsError;

    fn try_from(value: &str) -> Result<Self> {
        Self::try_from(value.to_owned())
    }
}

impl TryFrom<String> for ModuleName {
    type Error = PrebuiltsError;

    fn try_from(value: String) -> Result<Self> {
        if value.is_empty() {
            Err(PrebuiltsError::EmptyModuleName)
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
