//! Error types for prebuilt artefact resolution.
//!
//! Resolution itself is infallible: absent environment values fall back to
//! defaults and canonicalisation failures disable a module rather than abort
//! it. The variants here cover the edges of the crate instead: parsing
//! identifiers supplied by a host, loading the defaults file, and handing a
//! patch to the host's merge mechanism.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::applier::ApplyError;

/// Errors that can occur while configuring a prebuilt module.
#[derive(Debug, Error)]
pub enum PrebuiltsError {
    /// The architecture identifier is not one of the supported six.
    #[error("unsupported architecture \"{value}\"; expected one of: {expected}")]
    UnsupportedArch {
        /// The rejected identifier.
        value: String,
        /// Comma-separated list of accepted identifiers.
        expected: String,
    },

    /// The module type name is not registered by this crate.
    #[error("unknown module type \"{name}\"; expected one of: {expected}")]
    UnknownModuleType {
        /// The rejected module type name.
        name: String,
        /// Comma-separated list of registered module types.
        expected: String,
    },

    /// A module name was empty.
    #[error("module name must not be empty")]
    EmptyModuleName,

    /// The defaults file could not be parsed.
    #[error("invalid defaults configuration: {reason}")]
    Config {
        /// Description of the parse error.
        reason: String,
    },

    /// The defaults file could not be read.
    #[error("failed to read defaults configuration at {path}")]
    ConfigRead {
        /// Path of the file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The host rejected the property patch.
    #[error("failed to apply property patch: {0}")]
    Apply(#[from] ApplyError),
}

/// Result type alias using [`PrebuiltsError`].
pub type Result<T> = std::result::Result<T, PrebuiltsError>;
