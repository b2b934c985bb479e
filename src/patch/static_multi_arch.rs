//! Per-architecture static archives from the Clang prebuilt.
//!
//! These archives (`libFuzzer`, `libomp`) are pinned to the canonical
//! prebuilts base directory, the parent of the module's own directory. When
//! `LLVM_PREBUILTS_BASE` points anywhere else the archives are declared but
//! disabled: their layout is only known to be right in the canonical
//! location. This only affects stage-two toolchain builds, which do not
//! consume them.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::arch::Arch;
use crate::env::EnvConfig;
use crate::module_name::{ModuleName, STATIC_EXTENSION, artefact_filename};
use crate::patch::ModulePropertyPatch;

/// The one archive that also exports headers.
pub const FUZZER_ARCHIVE: &str = "libFuzzer.a";

/// Source list for a single architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSrcs {
    /// Archive paths for this architecture.
    pub srcs: Vec<Utf8PathBuf>,
}

/// One source list per supported architecture.
///
/// Every architecture has a field, so adding one to [`Arch`] fails to compile
/// until it is handled here as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchSrcs {
    #[serde(rename = "android_arm")]
    arm: TargetSrcs,
    #[serde(rename = "android_arm64")]
    arm64: TargetSrcs,
    #[serde(rename = "android_mips")]
    mips: TargetSrcs,
    #[serde(rename = "android_mips64")]
    mips64: TargetSrcs,
    #[serde(rename = "android_x86")]
    x86: TargetSrcs,
    #[serde(rename = "android_x86_64")]
    x86_64: TargetSrcs,
}

impl ArchSrcs {
    /// Build the table by calling `srcs_for` once per architecture.
    #[must_use]
    pub fn from_fn(mut srcs_for: impl FnMut(Arch) -> Vec<Utf8PathBuf>) -> Self {
        let mut table = Self::default();
        for arch in Arch::ALL {
            table.slot_mut(arch).srcs = srcs_for(arch);
        }
        table
    }

    /// Sources declared for `arch`.
    #[must_use]
    pub fn get(&self, arch: Arch) -> &[Utf8PathBuf] {
        &self.slot(arch).srcs
    }

    /// Iterate over every architecture and its sources, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Arch, &[Utf8PathBuf])> {
        Arch::ALL.into_iter().map(|arch| (arch, self.get(arch)))
    }

    const fn slot(&self, arch: Arch) -> &TargetSrcs {
        match arch {
            Arch::Arm => &self.arm,
            Arch::Arm64 => &self.arm64,
            Arch::Mips => &self.mips,
            Arch::Mips64 => &self.mips64,
            Arch::X86 => &self.x86,
            Arch::X86_64 => &self.x86_64,
        }
    }

    fn slot_mut(&mut self, arch: Arch) -> &mut TargetSrcs {
        match arch {
            Arch::Arm => &mut self.arm,
            Arch::Arm64 => &mut self.arm64,
            Arch::Mips => &mut self.mips,
            Arch::Mips64 => &mut self.mips64,
            Arch::X86 => &mut self.x86,
            Arch::X86_64 => &mut self.x86_64,
        }
    }
}

/// Properties for a per-architecture static archive module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticMultiArchPatch {
    enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    export_include_dirs: Vec<Utf8PathBuf>,
    target: ArchSrcs,
}

impl StaticMultiArchPatch {
    /// Whether the module is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Header directories exported to dependants; empty unless the module is
    /// the fuzzer archive.
    #[must_use]
    pub fn export_include_dirs(&self) -> &[Utf8PathBuf] {
        &self.export_include_dirs
    }

    /// Per-architecture archive paths.
    #[must_use]
    pub const fn target(&self) -> &ArchSrcs {
        &self.target
    }
}

/// Build the patch for a per-architecture static archive module.
///
/// `module_base_dir` is the directory the module is declared in; its parent
/// is the canonical prebuilts base directory.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use clang_prebuilts::arch::Arch;
/// use clang_prebuilts::env::EnvConfig;
/// use clang_prebuilts::module_name::ModuleName;
/// use clang_prebuilts::patch::{ModulePropertyPatch, build_static};
///
/// let env = EnvConfig::new("clang-r383902b", "11.0.1");
/// let name = ModuleName::try_from("prebuilt_libomp").expect("non-empty name");
/// let ModulePropertyPatch::StaticMultiArch(patch) =
///     build_static(&env, &name, None, Utf8Path::new("."))
/// else {
///     unreachable!("multi-arch builder returns a multi-arch patch");
/// };
/// assert!(patch.enabled());
/// assert_eq!(
///     patch.target().get(Arch::X86),
///     ["./clang-r383902b/lib64/clang/11.0.1/lib/linux/i386/libomp.a"]
/// );
/// ```
#[must_use]
pub fn build_static(
    env: &EnvConfig,
    module_name: &ModuleName,
    prebuilts_base_override: Option<&Utf8Path>,
    module_base_dir: &Utf8Path,
) -> ModulePropertyPatch {
    let enabled = prebuilts_enabled(prebuilts_base_override, module_base_dir);
    if !enabled {
        log::warn!("{module_name}: prebuilts base directory overridden; module disabled");
    }

    let filename = artefact_filename(module_name.archive_stem(), STATIC_EXTENSION);
    let export_include_dirs = if filename == FUZZER_ARCHIVE {
        vec![fuzzer_header_dir(env)]
    } else {
        Vec::new()
    };

    let lib_dir = env.resource_dir();
    let target = ArchSrcs::from_fn(|arch| vec![lib_dir.join(arch.artifact_subdir()).join(&filename)]);
    log::debug!("{module_name}: {filename} under {lib_dir} (enabled: {enabled})");

    ModulePropertyPatch::StaticMultiArch(StaticMultiArchPatch {
        enabled,
        export_include_dirs,
        target,
    })
}

/// Header directory exported by the fuzzer archive.
#[must_use]
pub fn fuzzer_header_dir(env: &EnvConfig) -> Utf8PathBuf {
    env.prebuilt_dir()
        .join("prebuilt_include")
        .join("llvm")
        .join("lib")
        .join("Fuzzer")
}

/// Whether prebuilt archives may be used with the given base override.
///
/// Without an override, or with an empty one, they always may. Otherwise the
/// override and the parent of `module_base_dir` are canonicalised and
/// compared; if either cannot be canonicalised they are taken to differ.
#[must_use]
pub fn prebuilts_enabled(prebuilts_base_override: Option<&Utf8Path>, module_base_dir: &Utf8Path) -> bool {
    let Some(base) = prebuilts_base_override.filter(|base| !base.as_str().is_empty()) else {
        return true;
    };
    let module_parent = module_base_dir.join("..");

    match (base.canonicalize_utf8(), module_parent.canonicalize_utf8()) {
        (Ok(base_abs), Ok(parent_abs)) => {
            log::debug!("prebuilts base {base_abs}, module base {parent_abs}");
            base_abs == parent_abs
        }
        (Err(e), _) => {
            log::warn!("cannot canonicalise prebuilts base {base}: {e}");
            false
        }
        (_, Err(e)) => {
            log::warn!("cannot canonicalise module base {module_parent}: {e}");
            false
        }
    }
}

#[cfg(test)]
#[path = "static_multi_arch_tests.rs"]
mod tests;
