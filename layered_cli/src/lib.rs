//! Layered command-line, environment and default value resolution.
//!
//! Values are bound to caller-owned [`Slot`]s. For every option the
//! precedence is: command line, then environment variables (environment
//! files before the process environment, later names before earlier ones),
//! then the declared default. A default never clobbers a slot the caller
//! pre-populated when that default is the zero value.
//!
//! Commands form a tree. Each level parses its own options, then hands the
//! remaining arguments to the child named by the first operand. Children
//! may share parent options through [`Command::inherit`].
//!
//! ```
//! use layered_cli::{App, Arity, Flag};
//!
//! let mut app = App::new("copy", "Copy files.");
//! let force = app.opt(Flag::long("force").with_short('f'), false)?;
//! app.add_operand("src", Arity::Required)?;
//! app.add_operand("dst", Arity::Required)?;
//! app.run_args(["-f", "a.txt", "b.txt"])?;
//! assert!(force.get());
//! assert_eq!(app.args(), ["a.txt", "b.txt"]);
//! # Ok::<(), layered_cli::CliError>(())
//! ```

mod app;
mod command;
mod entry;
mod env;
mod error;
pub mod help;
mod options;
mod parse;
mod token;
mod variant;

pub use app::App;
pub use command::{Arity, Command, Operand};
pub use entry::{Flag, OptEntry};
pub use env::{EnvBinding, EnvSource, ProcessEnv};
pub use error::{BoxError, CliError, CliResult, ValueError};
pub use options::{HelpOutput, HelpRenderer, Options};
pub use variant::{Binding, Choice, CustomBinding, CustomValue, Kind, Slot, Value, Variant};
