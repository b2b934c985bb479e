//! Property patches for the three prebuilt module kinds.
//!
//! A patch is the set of properties appended to a module's declaration once
//! the prebuilt location is known. Each module kind has its own builder:
//!
//! - [`static_multi_arch`]: per-architecture static archives such as
//!   `libFuzzer` and `libomp`.
//! - [`shared_runtime`]: sanitizer shared runtimes (`libclang_rt.*.so`).
//! - [`static_runtime`]: sanitizer static runtimes (`libclang_rt.*.a`).
//!
//! Patches serialise to the host's property spelling, so
//! `serde_json::to_value(&patch)` is the property tree handed to the host.

pub mod shared_runtime;
pub mod static_multi_arch;
pub mod static_runtime;

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

pub use shared_runtime::{SharedRuntimePatch, build_shared};
pub use static_multi_arch::{ArchSrcs, StaticMultiArchPatch, build_static};
pub use static_runtime::{StaticRuntimePatch, build_static_runtime};

/// The module kind a patch was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    /// Per-architecture static archives.
    StaticMultiArch,
    /// Sanitizer shared runtime.
    SharedRuntime,
    /// Sanitizer static runtime.
    StaticRuntime,
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StaticMultiArch => "static multi-arch",
            Self::SharedRuntime => "shared runtime",
            Self::StaticRuntime => "static runtime",
        })
    }
}

/// Properties to append to a prebuilt module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModulePropertyPatch {
    /// Patch for a per-architecture static archive module.
    StaticMultiArch(StaticMultiArchPatch),
    /// Patch for a sanitizer shared runtime module.
    SharedRuntime(SharedRuntimePatch),
    /// Patch for a sanitizer static runtime module.
    StaticRuntime(StaticRuntimePatch),
}

impl ModulePropertyPatch {
    /// Which module kind this patch belongs to.
    #[must_use]
    pub const fn kind(&self) -> PatchKind {
        match self {
            Self::StaticMultiArch(_) => PatchKind::StaticMultiArch,
            Self::SharedRuntime(_) => PatchKind::SharedRuntime,
            Self::StaticRuntime(_) => PatchKind::StaticRuntime,
        }
    }

    /// Every artefact path the patch declares, in declaration order.
    #[must_use]
    pub fn artefact_paths(&self) -> Vec<&Utf8PathBuf> {
        match self {
            Self::StaticMultiArch(patch) => patch.target().iter().flat_map(|(_, s)| s).collect(),
            Self::SharedRuntime(patch) => patch.srcs().iter().collect(),
            Self::StaticRuntime(patch) => patch.srcs().iter().collect(),
        }
    }

    /// The patch as a host property tree.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error; none of the patch types can produce one
    /// in practice since all keys are strings.
    pub fn to_properties(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl From<StaticMultiArchPatch> for ModulePropertyPatch {
    fn from(patch: StaticMultiArchPatch) -> Self {
        Self::StaticMultiArch(patch)
    }
}

impl From<SharedRuntimePatch> for ModulePropertyPatch {
    fn from(patch: SharedRuntimePatch) -> Self {
        Self::SharedRuntime(patch)
    }
}

impl From<StaticRuntimePatch> for ModulePropertyPatch {
    fn from(patch: StaticRuntimePatch) -> Self {
        Self::StaticRuntime(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvConfig;
    use crate::module_name::ModuleName;
    use rstest::{fixture, rstest};

    #[fixture]
    fn env() -> EnvConfig {
        EnvConfig::new("11.0.1", "11.0.1")
    }

    fn name(value: &str) -> ModuleName {
        ModuleName::try_from(value).expect("non-empty module name")
    }

    #[rstest]
    fn kinds_follow_variants(env: EnvConfig) {
        let shared = build_shared(&env, &name("prebuilt_libclang_rt.asan"), false)
            .expect("shared patch");
        let runtime = build_static_runtime(&env, &name("prebuilt_libclang_rt.asan"));
        let multi = build_static(&env, &name("prebuilt_libomp"), None, camino::Utf8Path::new("."));

        assert_eq!(shared.kind(), PatchKind::SharedRuntime);
        assert_eq!(runtime.kind(), PatchKind::StaticRuntime);
        assert_eq!(multi.kind(), PatchKind::StaticMultiArch);
    }

    #[rstest]
    fn multi_arch_declares_one_path_per_arch(env: EnvConfig) {
        let patch = build_static(&env, &name("prebuilt_libomp"), None, camino::Utf8Path::new("."));

        assert_eq!(patch.artefact_paths().len(), crate::arch::Arch::ALL.len());
    }

    #[rstest]
    fn shared_runtime_properties_use_host_spelling(env: EnvConfig) {
        let patch = build_shared(&env, &name("prebuilt_libclang_rt.ubsan_standalone"), false)
            .expect("shared patch");

        let properties = patch.to_properties().expect("serialisable patch");

        assert_eq!(
            properties,
            serde_json::json!({
                "srcs": ["./11.0.1/lib64/clang/11.0.1/lib/linux/libclang_rt.ubsan_standalone.so"],
                "system_shared_libs": [],
                "sanitize": { "never": true },
                "strip": { "none": true },
                "pack_relocations": false,
                "stl": "none",
            })
        );
    }

    #[rstest]
    fn static_runtime_properties_hold_only_srcs(env: EnvConfig) {
        let patch = build_static_runtime(&env, &name("prebuilt_libclang_rt.builtins-arm"));

        assert_eq!(
            patch.to_properties().expect("serialisable patch"),
            serde_json::json!({
                "srcs": ["./11.0.1/lib64/clang/11.0.1/lib/linux/libclang_rt.builtins-arm.a"],
            })
        );
    }
}
