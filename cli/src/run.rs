//! Command implementations.
//!
//! Every command writes through the supplied writers and reads the
//! environment through an [`EnvSource`], so the binary passes the real
//! process handles while tests pass buffers and a [`MapEnv`].
//!
//! [`MapEnv`]: clang_prebuilts::env::MapEnv

use std::io::Write;

use camino::Utf8Path;
use clang_prebuilts::env::FORCE_BUILD_SANITIZER_SHARED_OBJECTS;
use clang_prebuilts::{
    ClangDefaults, EnvSource, LoadContext, ModuleName, PrebuiltsError, PropertyTree,
};

use crate::cli::{Cli, Command, ResolveArgs};
use crate::error::{CliError, Result};
use crate::output::{arch_table, dependency_line, module_types_table, write_stderr_line};

/// Execute the parsed command.
///
/// # Errors
///
/// Returns a [`CliError`] when the defaults or properties files cannot be
/// loaded, the module name is empty, the patch conflicts with the existing
/// properties, or stdout cannot be written.
pub fn run(
    cli: &Cli,
    env: &dyn EnvSource,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Command::Resolve(args) => resolve(args, cli.quiet, env, stdout, stderr),
        Command::ModuleTypes => Ok(stdout.write_all(module_types_table().as_bytes())?),
        Command::ArchTable => Ok(stdout.write_all(arch_table().as_bytes())?),
    }
}

fn resolve(
    args: &ResolveArgs,
    quiet: bool,
    env: &dyn EnvSource,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let defaults = match &args.defaults {
        Some(path) => ClangDefaults::load_from(path)?,
        None => ClangDefaults::default(),
    };
    let mut tree = match &args.properties {
        Some(path) => load_properties(path)?,
        None => PropertyTree::new(),
    };
    let name = ModuleName::try_from(args.name.as_str())?;
    let ctx = LoadContext::new(&name, &args.module_dir, env, &defaults);
    log::debug!(
        "loading {} module {} from {}",
        args.module_type,
        ctx.module_name(),
        ctx.module_dir()
    );

    let outcome = args.module_type.load(&ctx, &mut tree)?;

    if outcome.applied().is_some() {
        let rendered = serde_json::to_string_pretty(&tree.to_value()).map_err(CliError::Render)?;
        writeln!(stdout, "{rendered}")?;
    } else if !quiet {
        write_stderr_line(
            stderr,
            format_args!(
                "{name}: {FORCE_BUILD_SANITIZER_SHARED_OBJECTS} is set; \
                 building from source, no prebuilt properties applied"
            ),
        );
    }
    if !quiet {
        write_stderr_line(stderr, dependency_line(outcome.env_dependencies()));
    }
    Ok(())
}

fn load_properties(path: &Utf8Path) -> Result<PropertyTree> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadProperties {
        path: path.to_owned(),
        source,
    })?;
    let value = serde_json::from_str(&contents).map_err(|source| CliError::ParseProperties {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("loaded existing properties from {path}");
    PropertyTree::from_value(value).map_err(|err| CliError::Prebuilts(PrebuiltsError::from(err)))
}

/// Map a command result to a process exit code, reporting any error.
///
/// # Examples
///
/// ```
/// use clang_prebuilts_cli::run::exit_code_for_run_result;
///
/// let mut stderr = Vec::new();
/// assert_eq!(exit_code_for_run_result(Ok(()), &mut stderr), 0);
/// assert!(stderr.is_empty());
/// ```
pub fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
