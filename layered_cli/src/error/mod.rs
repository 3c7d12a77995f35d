//! Error types produced while declaring options and resolving values.

mod constructors;
mod types;

pub use types::{BoxError, CliError, CliResult, ValueError};
