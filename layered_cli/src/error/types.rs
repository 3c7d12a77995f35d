//! Primary error enums for declaration, parsing and dispatch flows.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::variant::Kind;

/// Boxed error returned by run callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type CliResult<T> = Result<T, CliError>;

/// Failure converting text into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The text does not describe a value of the expected kind.
    #[error("'{value}' is not a valid {kind} value")]
    Invalid {
        /// Offending text.
        value: String,
        /// Kind the text was parsed as.
        kind: Kind,
    },

    /// The text is numeric but does not fit the target width.
    #[error("'{value}' is out of range for {kind}")]
    OutOfRange {
        /// Offending text.
        value: String,
        /// Kind the text was parsed as.
        kind: Kind,
    },

    /// A custom value refused the text.
    #[error("{message}")]
    Rejected {
        /// Offending text.
        value: String,
        /// Explanation supplied by the custom value.
        message: String,
    },
}

/// Errors that can occur while declaring, parsing or running commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// A flag token that matches no declared option, or a leftover argument
    /// rejected by strict parsing.
    #[error("unknown argument: {argument}")]
    UnknownArgument {
        /// Token as it appeared on the command line.
        argument: String,
    },

    /// A non-boolean flag without a value.
    #[error("no value for argument: {argument}")]
    MissingValue {
        /// Flag that expected a value.
        argument: String,
    },

    /// A value that could not be converted to the bound kind.
    #[error("invalid value for argument {argument}: {source}")]
    Type {
        /// Flag or environment variable that supplied the value.
        argument: String,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },

    /// Operand count outside the declared arity.
    #[error("{}", describe_operand_count(.required, .maximum, .got))]
    OperandCount {
        /// Number of required operands.
        required: usize,
        /// Largest accepted number of operands, `None` when unbounded.
        maximum: Option<usize>,
        /// Number of operands supplied.
        got: usize,
    },

    /// Option declaration or typed lookup misuse.
    #[error("cannot bind '{name}': {reason}")]
    Bind {
        /// Option, variable or command name involved.
        name: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An environment file could not be read.
    #[error("cannot read environment file '{path}': {source}")]
    EnvFile {
        /// Path of the file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A run callback failed.
    #[error("command '{command}' failed: {source}")]
    Run {
        /// Full path of the command that failed.
        command: String,
        /// Error returned by the callback.
        #[source]
        source: BoxError,
    },

    /// Writing help text failed.
    #[error("failed to write help: {source}")]
    Help {
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

fn describe_operand_count(required: &usize, maximum: &Option<usize>, got: &usize) -> String {
    match *maximum {
        Some(max) if max == *required => {
            format!("expected {required} operand(s), got {got}")
        }
        Some(max) => format!("expected {required} to {max} operand(s), got {got}"),
        None => format!("expected at least {required} operand(s), got {got}"),
    }
}
