//! Root of a command tree.

use std::ops::{Deref, DerefMut};

use crate::command::Command;
use crate::error::CliResult;

/// A program: the root [`Command`] plus entry points that feed it
/// arguments.
///
/// `App` dereferences to its root command, so options, operands and
/// subcommands are declared on it directly.
///
/// # Examples
///
/// ```
/// use layered_cli::{App, Flag};
///
/// let mut app = App::new("todo", "Track things to do.");
/// let verbose = app.opt(Flag::long("verbose").with_short('v'), false)?;
/// app.command_run("list", "List open items.", |_| Ok(()))?;
/// app.run_args(["-v", "list"])?;
/// assert!(verbose.get());
/// assert!(app.subcommand("list").is_some_and(|list| list.used()));
/// # Ok::<(), layered_cli::CliError>(())
/// ```
#[derive(Debug)]
pub struct App {
    root: Command,
}

impl App {
    /// Creates an application whose root command is called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            root: Command::new(name.into(), brief.into(), None),
        }
    }

    /// Runs against the process arguments, skipping the program name.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily.
    ///
    /// An `App` is meant to run once. Values written by a run stay in their
    /// slots and still count as set, so a second run starts from them
    /// instead of from the declared defaults.
    ///
    /// # Errors
    ///
    /// Returns the first unhandled [`crate::CliError`] raised along the
    /// dispatch path.
    pub fn run(&mut self) -> CliResult<()> {
        let tokens: Vec<String> = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.root.execute(&tokens)
    }

    /// Runs against explicit arguments, excluding the program name.
    ///
    /// Like [`App::run`], this is meant to be called once per `App`.
    ///
    /// # Errors
    ///
    /// As for [`App::run`].
    pub fn run_args<I, S>(&mut self, args: I) -> CliResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        self.root.execute(&tokens)
    }
}

impl Deref for App {
    type Target = Command;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl DerefMut for App {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.root
    }
}
