//! Handing patches to the host's property merge.
//!
//! [`PatchApplier`] is the boundary to the host build system. The crate ships
//! one implementation, [`PropertyTree`], an in-memory module declaration that
//! follows the host's append rules:
//!
//! - nested blocks merge key by key;
//! - lists append;
//! - scalars in the patch replace scalars of the same kind;
//! - `null` in the patch leaves the declaration untouched.
//!
//! Anything else, such as a list appended onto a string, is rejected with
//! the dotted path of the offending property.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::patch::ModulePropertyPatch;

/// Errors raised while merging a patch into a module declaration.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A patch property has a different kind from the declared one.
    #[error("property {path}: cannot merge {incoming} into {existing}")]
    TypeMismatch {
        /// Dotted path of the property.
        path: String,
        /// Kind of the declared value.
        existing: &'static str,
        /// Kind of the patch value.
        incoming: &'static str,
    },

    /// A declaration or patch was not a property block at the top level.
    #[error("module properties must be a block, found {kind}")]
    NotABlock {
        /// Kind of the value found instead.
        kind: &'static str,
    },

    /// The patch could not be converted to properties.
    #[error("failed to serialise patch: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Receives a module's property patch.
#[cfg_attr(test, mockall::automock)]
pub trait PatchApplier {
    /// Append `patch` to the module's declared properties.
    ///
    /// # Errors
    ///
    /// Returns an error when the patch cannot be merged; the host treats
    /// this as a fatal configuration error for the module.
    fn append_properties(&mut self, patch: &ModulePropertyPatch) -> Result<(), ApplyError>;
}

/// An in-memory module declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTree {
    root: Map<String, Value>,
}

impl PropertyTree {
    /// An empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::NotABlock`] unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ApplyError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ApplyError::NotABlock {
                kind: kind_name(&other),
            }),
        }
    }

    /// Look up a property by dotted path, for example `sanitize.never`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clang_prebuilts::applier::PropertyTree;
    /// use serde_json::json;
    ///
    /// let tree = PropertyTree::from_value(json!({"strip": {"none": true}}))
    ///     .expect("declaration is a block");
    /// assert_eq!(tree.get("strip.none"), Some(&json!(true)));
    /// assert_eq!(tree.get("strip.all"), None);
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.root.get(segments.next()?)?;
        segments.try_fold(first, |value, key| value.get(key))
    }

    /// The declaration as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Consume the tree and return the declaration.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Merge an arbitrary property block.
    ///
    /// # Errors
    ///
    /// See the module documentation for the merge rules.
    pub fn merge(&mut self, incoming: Value) -> Result<(), ApplyError> {
        match incoming {
            Value::Object(block) => merge_block(&mut self.root, block, ""),
            other => Err(ApplyError::NotABlock {
                kind: kind_name(&other),
            }),
        }
    }
}

impl PatchApplier for PropertyTree {
    fn append_properties(&mut self, patch: &ModulePropertyPatch) -> Result<(), ApplyError> {
        self.merge(patch.to_properties()?)
    }
}

fn merge_block(
    existing: &mut Map<String, Value>,
    incoming: Map<String, Value>,
    prefix: &str,
) -> Result<(), ApplyError> {
    for (key, value) in incoming {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match existing.get_mut(&key) {
            Some(slot) => merge_value(slot, value, &path)?,
            None => {
                if !value.is_null() {
                    existing.insert(key, value);
                }
            }
        }
    }
    Ok(())
}

fn merge_value(existing: &mut Value, incoming: Value, path: &str) -> Result<(), ApplyError> {
    if incoming.is_null() {
        return Ok(());
    }
    if existing.is_null() {
        *existing = incoming;
        return Ok(());
    }

    let current_kind = kind_name(existing);
    let offered_kind = kind_name(&incoming);
    match (existing, incoming) {
        (Value::Object(block), Value::Object(patch)) => merge_block(block, patch, path),
        (Value::Array(items), Value::Array(appended)) => {
            items.extend(appended);
            Ok(())
        }
        (scalar, replacement) if current_kind == offered_kind => {
            *scalar = replacement;
            Ok(())
        }
        _ => Err(ApplyError::TypeMismatch {
            path: path.to_owned(),
            existing: current_kind,
            incoming: offered_kind,
        }),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "block",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvConfig;
    use crate::module_name::ModuleName;
    use crate::patch::build_shared;
    use rstest::rstest;
    use serde_json::json;

    fn shared_patch() -> ModulePropertyPatch {
        let env = EnvConfig::new("11.0.1", "11.0.1");
        let name = ModuleName::try_from("prebuilt_libclang_rt.asan-aarch64-android")
            .expect("non-empty module name");
        build_shared(&env, &name, false).expect("shared patch")
    }

    #[test]
    fn empty_tree_takes_patch_verbatim() {
        let patch = shared_patch();
        let mut tree = PropertyTree::new();

        tree.append_properties(&patch).expect("merge into empty tree");

        assert_eq!(tree.into_value(), patch.to_properties().expect("properties"));
    }

    #[test]
    fn lists_append_to_declared_values() {
        let mut tree = PropertyTree::from_value(json!({
            "name": "prebuilt_libclang_rt.asan-aarch64-android",
            "srcs": ["declared.so"],
            "sanitize": { "address": false },
        }))
        .expect("block");

        tree.append_properties(&shared_patch()).expect("merge");

        assert_eq!(
            tree.get("srcs"),
            Some(&json!([
                "declared.so",
                "./11.0.1/lib64/clang/11.0.1/lib/linux/libclang_rt.asan-aarch64-android.so"
            ]))
        );
        assert_eq!(tree.get("sanitize.address"), Some(&json!(false)));
        assert_eq!(tree.get("sanitize.never"), Some(&json!(true)));
        assert_eq!(
            tree.get("name"),
            Some(&json!("prebuilt_libclang_rt.asan-aarch64-android"))
        );
    }

    #[test]
    fn scalars_are_replaced() {
        let mut tree =
            PropertyTree::from_value(json!({"stl": "c++_shared", "pack_relocations": true}))
                .expect("block");

        tree.append_properties(&shared_patch()).expect("merge");

        assert_eq!(tree.get("stl"), Some(&json!("none")));
        assert_eq!(tree.get("pack_relocations"), Some(&json!(false)));
    }

    #[rstest]
    #[case::list_onto_string(json!({"srcs": "one.so"}), "srcs", "string", "list")]
    #[case::block_onto_bool(json!({"strip": true}), "strip", "bool", "block")]
    #[case::nested(json!({"sanitize": {"never": "yes"}}), "sanitize.never", "string", "bool")]
    fn kind_mismatch_names_the_property(
        #[case] declared: Value,
        #[case] expected_path: &str,
        #[case] expected_existing: &str,
        #[case] expected_incoming: &str,
    ) {
        let mut tree = PropertyTree::from_value(declared).expect("block");

        let err = tree
            .append_properties(&shared_patch())
            .expect_err("mismatch should be rejected");

        match err {
            ApplyError::TypeMismatch {
                path,
                existing,
                incoming,
            } => {
                assert_eq!(path, expected_path);
                assert_eq!(existing, expected_existing);
                assert_eq!(incoming, expected_incoming);
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn null_values_leave_declaration_alone() {
        let mut tree = PropertyTree::from_value(json!({"stl": "libc++"})).expect("block");

        tree.merge(json!({"stl": null, "enabled": null}))
            .expect("merge nulls");

        assert_eq!(tree.into_value(), json!({"stl": "libc++"}));
    }

    #[rstest]
    #[case::list(json!([]), "list")]
    #[case::string(json!("srcs"), "string")]
    fn top_level_must_be_a_block(#[case] value: Value, #[case] kind: &str) {
        let err = PropertyTree::from_value(value).expect_err("non-block rejected");

        assert!(
            matches!(err, ApplyError::NotABlock { kind: k } if k == kind),
            "got {err:?}"
        );
    }
}
