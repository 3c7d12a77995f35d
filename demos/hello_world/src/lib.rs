//! Library facade for the `hello_world` demo so integration tests can reuse
//! the command tree and message builders.

pub mod cli;
pub mod error;
pub mod message;
