//! Error types for the `clang-prebuilts` CLI.

use camino::Utf8PathBuf;
use clang_prebuilts::PrebuiltsError;
use thiserror::Error;

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolving or applying the module failed.
    #[error(transparent)]
    Prebuilts(#[from] PrebuiltsError),

    /// The existing properties file could not be read.
    #[error("failed to read module properties at {path}")]
    ReadProperties {
        /// Path of the properties file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The existing properties file is not valid JSON.
    #[error("invalid module properties in {path}: {source}")]
    ParseProperties {
        /// Path of the properties file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The merged property tree could not be rendered.
    #[error("failed to render module properties: {0}")]
    Render(#[source] serde_json::Error),

    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
