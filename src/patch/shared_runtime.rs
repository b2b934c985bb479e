//! Sanitizer shared runtimes (`libclang_rt.*.so`).
//!
//! The runtime must stay exactly as shipped: it is never instrumented by a
//! sanitizer, never stripped (interceptors are resolved by symbol), never
//! relocation-packed, and links no STL or system copy of itself.

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::env::EnvConfig;
use crate::module_name::{ModuleName, SHARED_EXTENSION, artefact_filename};
use crate::patch::ModulePropertyPatch;

/// STL selection that links no C++ standard library.
pub const STL_NONE: &str = "none";

/// `sanitize` property block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sanitize {
    /// Never apply sanitizers to this module.
    pub never: bool,
}

/// `strip` property block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strip {
    /// Do not strip the installed library.
    pub none: bool,
}

/// Properties for a sanitizer shared runtime module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedRuntimePatch {
    srcs: Vec<Utf8PathBuf>,
    system_shared_libs: Vec<String>,
    sanitize: Sanitize,
    strip: Strip,
    pack_relocations: bool,
    stl: &'static str,
}

impl SharedRuntimePatch {
    /// The library path.
    #[must_use]
    pub fn srcs(&self) -> &[Utf8PathBuf] {
        &self.srcs
    }

    /// System libraries linked implicitly; always empty.
    #[must_use]
    pub fn system_shared_libs(&self) -> &[String] {
        &self.system_shared_libs
    }

    /// Whether sanitizers are excluded from this module.
    #[must_use]
    pub const fn sanitize_never(&self) -> bool {
        self.sanitize.never
    }

    /// Whether stripping is suppressed.
    #[must_use]
    pub const fn strip_none(&self) -> bool {
        self.strip.none
    }

    /// Whether relocation packing is enabled.
    #[must_use]
    pub const fn pack_relocations(&self) -> bool {
        self.pack_relocations
    }

    /// The STL selection.
    #[must_use]
    pub const fn stl(&self) -> &'static str {
        self.stl
    }
}

/// Build the patch for a sanitizer shared runtime module.
///
/// Returns `None` when `force_build` is set: the runtime is then built from
/// source and the module declares nothing prebuilt.
///
/// # Examples
///
/// ```
/// use clang_prebuilts::env::EnvConfig;
/// use clang_prebuilts::module_name::ModuleName;
/// use clang_prebuilts::patch::build_shared;
///
/// let env = EnvConfig::new("11.0.1", "11.0.1");
/// let name = ModuleName::try_from("prebuilt_libclang_rt.asan-aarch64-android")
///     .expect("non-empty name");
///
/// let patch = build_shared(&env, &name, false).expect("not forced to build");
/// assert_eq!(
///     patch.artefact_paths()[0],
///     "./11.0.1/lib64/clang/11.0.1/lib/linux/libclang_rt.asan-aarch64-android.so"
/// );
/// assert!(build_shared(&env, &name, true).is_none());
/// ```
#[must_use]
pub fn build_shared(
    env: &EnvConfig,
    module_name: &ModuleName,
    force_build: bool,
) -> Option<ModulePropertyPatch> {
    if force_build {
        log::debug!("{module_name}: built from source; no prebuilt declared");
        return None;
    }

    let filename = artefact_filename(&module_name.runtime_stem(), SHARED_EXTENSION);
    let src = env.resource_dir().join(filename);
    log::debug!("{module_name}: shared runtime {src}");

    Some(ModulePropertyPatch::SharedRuntime(SharedRuntimePatch {
        srcs: vec![src],
        system_shared_libs: Vec::new(),
        sanitize: Sanitize { never: true },
        strip: Strip { none: true },
        pack_relocations: false,
        stl: STL_NONE,
    }))
}
