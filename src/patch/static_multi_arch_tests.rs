//! Unit tests for the per-architecture static archive builder.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn env() -> EnvConfig {
    EnvConfig::new("11.0.1", "11.0.1")
}

fn name(value: &str) -> ModuleName {
    ModuleName::try_from(value).expect("non-empty module name")
}

fn unwrap_multi(patch: ModulePropertyPatch) -> StaticMultiArchPatch {
    match patch {
        ModulePropertyPatch::StaticMultiArch(inner) => inner,
        other => panic!("expected multi-arch patch, got {other:?}"),
    }
}

/// A prebuilts checkout: `<root>/prebuilts` holding `<root>/prebuilts/clang`.
struct Checkout {
    _temp: TempDir,
    base: Utf8PathBuf,
    module_dir: Utf8PathBuf,
}

#[fixture]
fn checkout() -> Checkout {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 temp path");
    let base = root.join("prebuilts");
    let module_dir = base.join("clang");
    std::fs::create_dir_all(&module_dir).expect("create module dir");
    Checkout {
        _temp: temp,
        base,
        module_dir,
    }
}

#[rstest]
fn fuzzer_archive_exports_headers(env: EnvConfig) {
    let patch = unwrap_multi(build_static(
        &env,
        &name("prebuilt_libFuzzer"),
        None,
        Utf8Path::new("."),
    ));

    assert_eq!(
        patch.export_include_dirs(),
        [Utf8PathBuf::from("./11.0.1/prebuilt_include/llvm/lib/Fuzzer")]
    );
    assert_eq!(
        patch.target().get(Arch::Arm64),
        [Utf8PathBuf::from(
            "./11.0.1/lib64/clang/11.0.1/lib/linux/aarch64/libFuzzer.a"
        )]
    );
}

#[rstest]
#[case::omp("prebuilt_libomp")]
#[case::unprefixed("libFuzzer_other")]
#[case::case_differs("prebuilt_libfuzzer")]
#[case::fuzzer_without_prefix_stripping("libprebuilt_libFuzzer")]
fn other_archives_export_nothing(env: EnvConfig, #[case] module: &str) {
    let patch = unwrap_multi(build_static(&env, &name(module), None, Utf8Path::new(".")));

    assert!(patch.export_include_dirs().is_empty());
}

#[rstest]
fn unprefixed_fuzzer_name_still_exports_headers(env: EnvConfig) {
    let patch = unwrap_multi(build_static(&env, &name("libFuzzer"), None, Utf8Path::new(".")));

    assert_eq!(patch.export_include_dirs().len(), 1);
}

#[rstest]
fn every_arch_gets_its_subdir(env: EnvConfig) {
    let patch = unwrap_multi(build_static(
        &env,
        &name("prebuilt_libomp"),
        None,
        Utf8Path::new("."),
    ));

    for (arch, srcs) in patch.target().iter() {
        let expected = env
            .resource_dir()
            .join(arch.artifact_subdir())
            .join("libomp.a");
        assert_eq!(srcs, [expected], "sources for {arch}");
    }
}

#[rstest]
fn enabled_without_override(env: EnvConfig) {
    let patch = unwrap_multi(build_static(
        &env,
        &name("prebuilt_libomp"),
        None,
        Utf8Path::new("/does/not/exist"),
    ));

    assert!(patch.enabled());
}

#[rstest]
fn empty_override_counts_as_unset() {
    assert!(prebuilts_enabled(
        Some(Utf8Path::new("")),
        Utf8Path::new("/does/not/exist")
    ));
}

#[rstest]
fn enabled_when_override_is_module_parent(checkout: Checkout) {
    assert!(prebuilts_enabled(Some(&checkout.base), &checkout.module_dir));
}

#[rstest]
fn trailing_slash_and_dot_segments_do_not_matter(checkout: Checkout) {
    let spelled_oddly = Utf8PathBuf::from(format!("{}/./clang/../", checkout.base));

    assert!(prebuilts_enabled(Some(&spelled_oddly), &checkout.module_dir));
}

#[rstest]
fn disabled_when_override_points_elsewhere(env: EnvConfig, checkout: Checkout) {
    let elsewhere = checkout.base.join("clang");

    let patch = unwrap_multi(build_static(
        &env,
        &name("prebuilt_libFuzzer"),
        Some(&elsewhere),
        &checkout.module_dir,
    ));

    assert!(!patch.enabled());
    // Paths are still declared so the host can report them.
    assert_eq!(patch.target().iter().count(), Arch::ALL.len());
}

#[rstest]
fn missing_override_directory_disables(checkout: Checkout) {
    let missing = checkout.base.join("nope");

    assert!(!prebuilts_enabled(Some(&missing), &checkout.module_dir));
}

#[rstest]
fn missing_module_directory_disables(checkout: Checkout) {
    let missing_module = checkout.base.join("gone").join("deeper");

    assert!(!prebuilts_enabled(Some(&checkout.base), &missing_module));
}

#[cfg(unix)]
#[rstest]
fn symlinked_override_matches_its_target(checkout: Checkout) {
    let link = checkout.base.join("..").join("prebuilts-link");
    std::os::unix::fs::symlink(&checkout.base, &link).expect("create symlink");

    assert!(prebuilts_enabled(Some(&link), &checkout.module_dir));
}
