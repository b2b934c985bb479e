//! CLI argument definitions for `clang-prebuilts`.
//!
//! Kept apart from the entrypoint so the parser can be exercised directly in
//! tests.

use camino::Utf8PathBuf;
use clang_prebuilts::ModuleType;
use clap::{Parser, Subcommand};
use log::LevelFilter;

/// Resolve prebuilt Clang runtime libraries for build modules.
#[derive(Parser, Debug)]
#[command(name = "clang-prebuilts")]
#[command(version, about)]
#[command(long_about = concat!(
    "Resolve prebuilt Clang runtime libraries for build modules.\n\n",
    "For a module of one of the three prebuilt module types, this tool reads ",
    "LLVM_PREBUILTS_VERSION, LLVM_RELEASE_VERSION, LLVM_PREBUILTS_BASE and ",
    "FORCE_BUILD_SANITIZER_SHARED_OBJECTS from the environment, derives the ",
    "library paths from the module name, and prints the properties the module ",
    "would be declared with.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Resolve a sanitizer shared runtime:\n",
    "    $ clang-prebuilts resolve --module-type libclang_rt_prebuilt_library_shared \\\n",
    "        --name prebuilt_libclang_rt.asan-aarch64-android\n\n",
    "  Merge into an existing declaration:\n",
    "    $ clang-prebuilts resolve --module-type llvm_prebuilt_library_static \\\n",
    "        --name prebuilt_libFuzzer --module-dir prebuilts/clang/host \\\n",
    "        --properties module.json\n\n",
    "  List the module types:\n",
    "    $ clang-prebuilts module-types",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress notes and dependency listings (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load one module and print its merged properties as JSON.
    Resolve(ResolveArgs),
    /// List the registered module types.
    ModuleTypes,
    /// Print the architecture to prebuilt subdirectory table.
    ArchTable,
}

/// Arguments for the resolve command.
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Registered module type, e.g. `libclang_rt_prebuilt_library_static`.
    #[arg(long, value_name = "TYPE")]
    pub module_type: ModuleType,

    /// Declared module name, e.g. `prebuilt_libclang_rt.asan-arm-android`.
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Directory the module is declared in.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub module_dir: Utf8PathBuf,

    /// TOML file overriding the built-in default Clang versions.
    #[arg(long, value_name = "FILE")]
    pub defaults: Option<Utf8PathBuf>,

    /// JSON file holding the module's existing declared properties.
    #[arg(long, value_name = "FILE")]
    pub properties: Option<Utf8PathBuf>,
}

impl Cli {
    /// The log level implied by `--quiet` and `--verbose`.
    ///
    /// Warnings are shown by default so disabled modules are visible.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts_cli::cli::Cli;
    /// use clap::Parser;
    /// use log::LevelFilter;
    ///
    /// let cli = Cli::parse_from(["clang-prebuilts", "-vv", "module-types"]);
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
