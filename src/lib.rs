//! Prebuilt Clang runtime libraries for the platform build.
//!
//! This crate decides where the precompiled compiler-runtime libraries of a
//! Clang prebuilt live and which properties a build module needs to use
//! them. It provides three module types (see [`module_type`]); for each
//! module it resolves the prebuilt version from the environment, derives
//! the library path from the module name, and appends the resulting
//! property patch to the module's declaration.
//!
//! # Modules
//!
//! - [`applier`] - Boundary to the host property merge, plus an in-memory
//!   implementation
//! - [`arch`] - Supported architectures and their prebuilt subdirectories
//! - [`config`] - Built-in default versions
//! - [`env`] - Environment access and version resolution
//! - [`error`] - Error types
//! - [`module_name`] - Module names and derived library filenames
//! - [`module_type`] - Registered module types and the load protocol
//! - [`patch`] - Property patches for each module kind

pub mod applier;
pub mod arch;
pub mod config;
pub mod env;
pub mod error;
pub mod module_name;
pub mod module_type;
pub mod patch;

pub use applier::{ApplyError, PatchApplier, PropertyTree};
pub use arch::Arch;
pub use config::ClangDefaults;
pub use env::{EnvConfig, EnvSource, MapEnv, ProcessEnv, RecordingEnv, resolve_env};
pub use error::{PrebuiltsError, Result};
pub use module_name::ModuleName;
pub use module_type::{LoadContext, LoadOutcome, ModuleType, register_module_types};
pub use patch::{ModulePropertyPatch, PatchKind};
