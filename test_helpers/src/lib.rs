//! Test helpers shared across the `layered_cli` workspace.
//!
//! - [`env`]: serialised, self-restoring process environment mutation.
//! - [`files`]: temporary environment files.
//! - [`output`]: an in-memory writer for capturing help text.

pub mod env;
pub mod files;
pub mod output;
