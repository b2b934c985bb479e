//! Tests for CLI parsing.

use super::*;
use rstest::rstest;

#[test]
fn resolve_parses_required_arguments() {
    let cli = Cli::parse_from([
        "clang-prebuilts",
        "resolve",
        "--module-type",
        "libclang_rt_prebuilt_library_shared",
        "--name",
        "prebuilt_libclang_rt.asan-arm-android",
    ]);

    let Command::Resolve(args) = cli.command else {
        panic!("expected Resolve command");
    };
    assert_eq!(args.module_type, ModuleType::LibclangRtPrebuiltLibraryShared);
    assert_eq!(args.name, "prebuilt_libclang_rt.asan-arm-android");
    assert_eq!(args.module_dir, Utf8PathBuf::from("."));
    assert!(args.defaults.is_none());
    assert!(args.properties.is_none());
}

#[test]
fn resolve_rejects_unknown_module_type() {
    let result = Cli::try_parse_from([
        "clang-prebuilts",
        "resolve",
        "--module-type",
        "cc_prebuilt_library_static",
        "--name",
        "prebuilt_libomp",
    ]);

    assert!(result.is_err());
}

#[test]
fn resolve_requires_a_name() {
    let result = Cli::try_parse_from([
        "clang-prebuilts",
        "resolve",
        "--module-type",
        "llvm_prebuilt_library_static",
    ]);

    assert!(result.is_err());
}

#[rstest]
#[case::module_types("module-types")]
#[case::arch_table("arch-table")]
fn parses_listing_subcommands(#[case] subcommand: &str) {
    let cli = Cli::parse_from(["clang-prebuilts", subcommand]);
    assert!(matches!(
        cli.command,
        Command::ModuleTypes | Command::ArchTable
    ));
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["clang-prebuilts", "-q", "-v", "module-types"]);
    assert!(result.is_err());
}

#[rstest]
#[case::default(&["clang-prebuilts", "arch-table"], LevelFilter::Warn)]
#[case::quiet(&["clang-prebuilts", "-q", "arch-table"], LevelFilter::Error)]
#[case::verbose(&["clang-prebuilts", "-v", "arch-table"], LevelFilter::Info)]
#[case::trace(&["clang-prebuilts", "arch-table", "-vvvv"], LevelFilter::Trace)]
fn log_level_follows_flags(#[case] args: &[&str], #[case] expected: LevelFilter) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.log_level(), expected);
}
