//! Module types registered with the host and their load-time protocol.
//!
//! Loading a module is split in two. [`ModuleType::configure`] is pure: it
//! reads the environment through the [`LoadContext`] and returns the patch,
//! if any. [`ModuleType::load`] runs `configure` and hands the result to a
//! [`PatchApplier`] exactly once. Hosts that defer configuration to a
//! load hook call `load` from that hook.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};

use crate::applier::PatchApplier;
use crate::config::ClangDefaults;
use crate::env::{
    EnvSource, FORCE_BUILD_SANITIZER_SHARED_OBJECTS, LLVM_PREBUILTS_BASE, RecordingEnv,
    is_env_true, non_empty_var, resolve_env,
};
use crate::error::{PrebuiltsError, Result};
use crate::module_name::ModuleName;
use crate::patch::{ModulePropertyPatch, PatchKind, build_shared, build_static, build_static_runtime};

/// The host's generic prebuilt library kind a module type is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrebuiltLibraryKind {
    /// A prebuilt static library.
    Static,
    /// A prebuilt shared library.
    Shared,
}

impl fmt::Display for PrebuiltLibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Static => "static",
            Self::Shared => "shared",
        })
    }
}

/// A module type provided by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleType {
    /// `llvm_prebuilt_library_static`: per-architecture archives such as
    /// `libFuzzer` and `libomp`.
    LlvmPrebuiltLibraryStatic,
    /// `libclang_rt_prebuilt_library_shared`: sanitizer shared runtimes.
    LibclangRtPrebuiltLibraryShared,
    /// `libclang_rt_prebuilt_library_static`: sanitizer static runtimes.
    LibclangRtPrebuiltLibraryStatic,
}

impl ModuleType {
    /// Every module type, in registration order.
    pub const ALL: [Self; 3] = [
        Self::LlvmPrebuiltLibraryStatic,
        Self::LibclangRtPrebuiltLibraryShared,
        Self::LibclangRtPrebuiltLibraryStatic,
    ];

    /// The name the module type is registered under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LlvmPrebuiltLibraryStatic => "llvm_prebuilt_library_static",
            Self::LibclangRtPrebuiltLibraryShared => "libclang_rt_prebuilt_library_shared",
            Self::LibclangRtPrebuiltLibraryStatic => "libclang_rt_prebuilt_library_static",
        }
    }

    /// The host library kind instantiated for this module type.
    #[must_use]
    pub const fn host_kind(self) -> PrebuiltLibraryKind {
        match self {
            Self::LibclangRtPrebuiltLibraryShared => PrebuiltLibraryKind::Shared,
            Self::LlvmPrebuiltLibraryStatic | Self::LibclangRtPrebuiltLibraryStatic => {
                PrebuiltLibraryKind::Static
            }
        }
    }

    /// The patch kind this module type produces.
    #[must_use]
    pub const fn patch_kind(self) -> PatchKind {
        match self {
            Self::LlvmPrebuiltLibraryStatic => PatchKind::StaticMultiArch,
            Self::LibclangRtPrebuiltLibraryShared => PatchKind::SharedRuntime,
            Self::LibclangRtPrebuiltLibraryStatic => PatchKind::StaticRuntime,
        }
    }

    /// Compute the module's property patch.
    ///
    /// Returns `None` only for the shared runtime when
    /// `FORCE_BUILD_SANITIZER_SHARED_OBJECTS` is true; nothing else is read
    /// in that case.
    #[must_use]
    pub fn configure(self, ctx: &LoadContext<'_>) -> Option<ModulePropertyPatch> {
        match self {
            Self::LlvmPrebuiltLibraryStatic => {
                let base_override =
                    non_empty_var(ctx.env, LLVM_PREBUILTS_BASE).map(Utf8PathBuf::from);
                let env = resolve_env(ctx.env, ctx.defaults);
                Some(build_static(
                    &env,
                    ctx.module_name,
                    base_override.as_deref(),
                    ctx.module_dir,
                ))
            }
            Self::LibclangRtPrebuiltLibraryShared => {
                if is_env_true(ctx.env, FORCE_BUILD_SANITIZER_SHARED_OBJECTS) {
                    log::info!("{}: building sanitizer runtime from source", ctx.module_name);
                    return None;
                }
                build_shared(&resolve_env(ctx.env, ctx.defaults), ctx.module_name, false)
            }
            Self::LibclangRtPrebuiltLibraryStatic => Some(build_static_runtime(
                &resolve_env(ctx.env, ctx.defaults),
                ctx.module_name,
            )),
        }
    }

    /// Configure the module and hand the patch to `applier`.
    ///
    /// The returned outcome lists the environment variables the
    /// configuration depended on.
    ///
    /// # Errors
    ///
    /// Returns [`PrebuiltsError::Apply`] when the applier rejects the patch.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use clang_prebuilts::applier::PropertyTree;
    /// use clang_prebuilts::config::ClangDefaults;
    /// use clang_prebuilts::env::MapEnv;
    /// use clang_prebuilts::module_name::ModuleName;
    /// use clang_prebuilts::module_type::{LoadContext, ModuleType};
    ///
    /// let name = ModuleName::try_from("prebuilt_libclang_rt.asan-aarch64-android")
    ///     .expect("non-empty name");
    /// let env = MapEnv::new();
    /// let defaults = ClangDefaults::new("11.0.1", "11.0.1");
    /// let ctx = LoadContext::new(&name, Utf8Path::new("."), &env, &defaults);
    ///
    /// let mut tree = PropertyTree::new();
    /// let outcome = ModuleType::LibclangRtPrebuiltLibraryShared
    ///     .load(&ctx, &mut tree)
    ///     .expect("empty tree accepts any patch");
    ///
    /// assert!(outcome.applied().is_some());
    /// assert_eq!(
    ///     tree.get("srcs").and_then(|v| v.get(0)).and_then(|v| v.as_str()),
    ///     Some("./11.0.1/lib64/clang/11.0.1/lib/linux/libclang_rt.asan-aarch64-android.so"),
    /// );
    /// ```
    pub fn load(
        self,
        ctx: &LoadContext<'_>,
        applier: &mut dyn PatchApplier,
    ) -> Result<LoadOutcome> {
        let recording = RecordingEnv::new(ctx.env);
        let tracked = LoadContext {
            env: &recording,
            ..*ctx
        };
        let patch = self.configure(&tracked);
        let applied = match patch {
            Some(patch) => {
                applier.append_properties(&patch)?;
                Some(patch.kind())
            }
            None => None,
        };
        Ok(LoadOutcome {
            applied,
            env_dependencies: recording.dependencies(),
        })
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleType {
    type Err = PrebuiltsError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|module_type| module_type.name() == name)
            .ok_or_else(|| PrebuiltsError::UnknownModuleType {
                name: name.to_owned(),
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Inputs available to a module at load time.
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    module_name: &'a ModuleName,
    module_dir: &'a Utf8Path,
    env: &'a dyn EnvSource,
    defaults: &'a ClangDefaults,
}

impl<'a> LoadContext<'a> {
    /// Bundle the inputs for one module load.
    ///
    /// `module_dir` is the directory the module is declared in.
    #[must_use]
    pub fn new(
        module_name: &'a ModuleName,
        module_dir: &'a Utf8Path,
        env: &'a dyn EnvSource,
        defaults: &'a ClangDefaults,
    ) -> Self {
        Self {
            module_name,
            module_dir,
            env,
            defaults,
        }
    }

    /// The module's declared name.
    #[must_use]
    pub const fn module_name(&self) -> &ModuleName {
        self.module_name
    }

    /// The directory the module is declared in.
    #[must_use]
    pub const fn module_dir(&self) -> &Utf8Path {
        self.module_dir
    }
}

impl fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext")
            .field("module_name", self.module_name)
            .field("module_dir", &self.module_dir)
            .field("defaults", self.defaults)
            .finish_non_exhaustive()
    }
}

/// What happened during [`ModuleType::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    applied: Option<PatchKind>,
    env_dependencies: Vec<String>,
}

impl LoadOutcome {
    /// The kind of patch applied, or `None` when the module declared nothing.
    #[must_use]
    pub const fn applied(&self) -> Option<PatchKind> {
        self.applied
    }

    /// Environment variables read while configuring, in read order.
    #[must_use]
    pub fn env_dependencies(&self) -> &[String] {
        &self.env_dependencies
    }
}

/// The host's module type registry.
pub trait ModuleRegistry {
    /// Register `module_type` under `name`.
    fn register_module_type(&mut self, name: &'static str, module_type: ModuleType);
}

impl ModuleRegistry for BTreeMap<&'static str, ModuleType> {
    fn register_module_type(&mut self, name: &'static str, module_type: ModuleType) {
        self.insert(name, module_type);
    }
}

/// Register every module type provided by this crate.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use clang_prebuilts::module_type::{ModuleType, register_module_types};
///
/// let mut registry: BTreeMap<&'static str, ModuleType> = BTreeMap::new();
/// register_module_types(&mut registry);
/// assert_eq!(
///     registry.get("libclang_rt_prebuilt_library_static"),
///     Some(&ModuleType::LibclangRtPrebuiltLibraryStatic)
/// );
/// ```
pub fn register_module_types(registry: &mut dyn ModuleRegistry) {
    for module_type in ModuleType::ALL {
        log::trace!("registering module type {module_type}");
        registry.register_module_type(module_type.name(), module_type);
    }
}

#[cfg(test)]
#[path = "module_type_tests.rs"]
mod tests;
