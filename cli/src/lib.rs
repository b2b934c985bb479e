//! Command-line front end for the prebuilt Clang module types.
//!
//! The binary in `main.rs` stays small: argument definitions live in
//! [`cli`], the command implementations in [`run`], and rendering helpers in
//! [`output`]. Keeping them in a library lets the tests drive every command
//! against in-memory writers and environments.

pub mod cli;
pub mod error;
pub mod output;
pub mod run;
