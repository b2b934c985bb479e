//! Device architectures and their prebuilt subdirectory names.
//!
//! The prebuilt distribution lays libraries out under compiler-style
//! directory names (`aarch64`, `i386`) that do not match the build system's
//! own architecture identifiers. [`Arch::artifact_subdir`] is the single
//! place where one is translated into the other.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PrebuiltsError;

/// A supported device architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    /// 32-bit ARM.
    Arm,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit MIPS.
    Mips,
    /// 64-bit MIPS.
    Mips64,
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    X86_64,
}

impl Arch {
    /// Every supported architecture, in table order.
    pub const ALL: [Self; 6] = [
        Self::Arm,
        Self::Arm64,
        Self::Mips,
        Self::Mips64,
        Self::X86,
        Self::X86_64,
    ];

    /// The build system's identifier for this architecture.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        }
    }

    /// The directory holding this architecture's libraries in the prebuilt
    /// resource directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts::arch::Arch;
    ///
    /// assert_eq!(Arch::Arm64.artifact_subdir(), "aarch64");
    /// assert_eq!(Arch::X86.artifact_subdir(), "i386");
    /// ```
    #[must_use]
    pub const fn artifact_subdir(self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "aarch64",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
            Self::X86 => "i386",
            Self::X86_64 => "x86_64",
        }
    }

    /// Comma-separated list of supported identifiers, for error messages.
    #[must_use]
    pub fn supported() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for Arch {
    type Err = PrebuiltsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arch| arch.as_str() == value)
            .ok_or_else(|| PrebuiltsError::UnsupportedArch {
                value: value.to_owned(),
                expected: Self::supported(),
            })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
