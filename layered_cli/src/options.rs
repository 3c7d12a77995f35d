//! Per-command behaviour switches.
//!
//! A child command starts from a copy of its parent's [`Options`] and may
//! override them from its construction callback.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::command::Command;
use crate::env::{EnvSource, ProcessEnv};

/// Shared writer receiving help output.
pub type HelpOutput = Rc<RefCell<dyn Write>>;

/// Replacement help renderer.
pub type HelpRenderer = Rc<dyn Fn(&Command, &mut dyn Write) -> io::Result<()>>;

/// Parsing, dispatch and help behaviour for a command.
///
/// # Examples
///
/// ```
/// use layered_cli::Options;
///
/// let options = Options {
///     greedy: true,
///     strict_operands: true,
///     ..Options::default()
/// };
/// assert!(!options.files_only);
/// ```
#[derive(Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent switches mirror the command-line behaviours they toggle"
)]
pub struct Options {
    /// Consult only environment files, never the process environment.
    pub files_only: bool,
    /// Reject leftover arguments that no operand can absorb.
    pub strict_parsing: bool,
    /// Enforce declared operand arity before running.
    pub strict_operands: bool,
    /// Keep parsing options after operands, stopping only at a child
    /// command name.
    pub greedy: bool,
    /// Do not add the automatic `-h, --help` flag.
    pub suppress_help_flag: bool,
    /// Run the command even when the help flag is set.
    pub suppress_print_help_when_set: bool,
    /// Do not print help when a command with children is invoked without
    /// naming one.
    pub suppress_print_help_partial_command: bool,
    /// Where help is written; standard output when `None`.
    pub help_output: Option<HelpOutput>,
    /// Custom help renderer; the built-in layout when `None`.
    pub help_renderer: Option<HelpRenderer>,
    /// Process environment stand-in.
    pub env_source: Rc<dyn EnvSource>,
}

impl Options {
    /// Routes help output to `writer`.
    #[must_use]
    pub fn with_help_output<W: Write + 'static>(mut self, writer: Rc<RefCell<W>>) -> Self {
        let output: HelpOutput = writer;
        self.help_output = Some(output);
        self
    }

    /// Reads environment variables from `source` instead of the process.
    #[must_use]
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Rc::new(source);
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            files_only: false,
            strict_parsing: false,
            strict_operands: false,
            greedy: false,
            suppress_help_flag: false,
            suppress_print_help_when_set: false,
            suppress_print_help_partial_command: false,
            help_output: None,
            help_renderer: None,
            env_source: Rc::new(ProcessEnv),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("files_only", &self.files_only)
            .field("strict_parsing", &self.strict_parsing)
            .field("strict_operands", &self.strict_operands)
            .field("greedy", &self.greedy)
            .field("suppress_help_flag", &self.suppress_help_flag)
            .field("suppress_print_help_when_set", &self.suppress_print_help_when_set)
            .field(
                "suppress_print_help_partial_command",
                &self.suppress_print_help_partial_command,
            )
            .field("help_output", &self.help_output.is_some())
            .field("help_renderer", &self.help_renderer.is_some())
            .finish_non_exhaustive()
    }
}
