//! Text rendering for the CLI listings.

use clang_prebuilts::{Arch, ModuleType};
use std::fmt::Write as _;
use std::io::Write;

/// Write one line to stderr, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort; stderr may already be closed.
    }
}

/// Table of registered module types with their host library kind and the
/// patch kind they produce.
///
/// # Examples
///
/// ```
/// use clang_prebuilts_cli::output::module_types_table;
///
/// let table = module_types_table();
/// assert!(table.contains("libclang_rt_prebuilt_library_shared"));
/// assert_eq!(table.lines().count(), 3);
/// ```
#[must_use]
pub fn module_types_table() -> String {
    let width = ModuleType::ALL
        .iter()
        .map(|module_type| module_type.name().len())
        .max()
        .unwrap_or_default();
    ModuleType::ALL
        .iter()
        .fold(String::new(), |mut table, module_type| {
            if writeln!(
                table,
                "{:<width$}  {:<6}  {}",
                module_type.name(),
                module_type.host_kind(),
                module_type.patch_kind(),
            )
            .is_err()
            {
                // Writing to a String cannot fail.
            }
            table
        })
}

/// Table mapping each architecture to its prebuilt subdirectory.
#[must_use]
pub fn arch_table() -> String {
    Arch::ALL.iter().fold(String::new(), |mut table, arch| {
        if writeln!(table, "{:<7} {}", arch.as_str(), arch.artifact_subdir()).is_err() {
            // Writing to a String cannot fail.
        }
        table
    })
}

/// One-line summary of the environment variables a load depended on.
#[must_use]
pub fn dependency_line(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        "environment dependencies: none".to_owned()
    } else {
        format!("environment dependencies: {}", dependencies.join(", "))
    }
}
