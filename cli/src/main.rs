//! `clang-prebuilts` entrypoint.
//!
//! Parses arguments, installs the logger at the requested level, and runs
//! the command against the process environment.

use clang_prebuilts::ProcessEnv;
use clang_prebuilts_cli::cli::Cli;
use clang_prebuilts_cli::run::{exit_code_for_run_result, run};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &ProcessEnv, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
