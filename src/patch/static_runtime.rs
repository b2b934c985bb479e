//! Sanitizer static runtimes (`libclang_rt.*.a`).
//!
//! Only the archive path is declared. Everything else comes from the host's
//! static library kind.

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::env::EnvConfig;
use crate::module_name::{ModuleName, STATIC_EXTENSION, artefact_filename};
use crate::patch::ModulePropertyPatch;

/// Properties for a sanitizer static runtime module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticRuntimePatch {
    srcs: Vec<Utf8PathBuf>,
}

impl StaticRuntimePatch {
    /// The archive path.
    #[must_use]
    pub fn srcs(&self) -> &[Utf8PathBuf] {
        &self.srcs
    }
}

/// Build the patch for a sanitizer static runtime module.
#[must_use]
pub fn build_static_runtime(env: &EnvConfig, module_name: &ModuleName) -> ModulePropertyPatch {
    let filename = artefact_filename(&module_name.runtime_stem(), STATIC_EXTENSION);
    let src = env.resource_dir().join(filename);
    log::debug!("{module_name}: static runtime {src}");

    ModulePropertyPatch::StaticRuntime(StaticRuntimePatch { srcs: vec![src] })
}
