//! Convenience constructors and accessors for `CliError`.

use camino::Utf8Path;

use super::{BoxError, CliError, ValueError};

impl CliError {
    /// Builds [`CliError::UnknownArgument`].
    #[must_use]
    pub fn unknown_argument(argument: impl Into<String>) -> Self {
        Self::UnknownArgument {
            argument: argument.into(),
        }
    }

    /// Builds [`CliError::MissingValue`].
    #[must_use]
    pub fn missing_value(argument: impl Into<String>) -> Self {
        Self::MissingValue {
            argument: argument.into(),
        }
    }

    /// Builds [`CliError::Type`] naming the flag or variable that supplied
    /// the offending text.
    #[must_use]
    pub fn type_error(argument: impl Into<String>, source: ValueError) -> Self {
        Self::Type {
            argument: argument.into(),
            source,
        }
    }

    /// Builds [`CliError::Bind`].
    #[must_use]
    pub fn bind(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Bind {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Builds [`CliError::EnvFile`].
    #[must_use]
    pub fn env_file(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::EnvFile {
            path: path.to_owned(),
            source,
        }
    }

    /// Builds [`CliError::Run`].
    #[must_use]
    pub fn run(command: impl Into<String>, source: BoxError) -> Self {
        Self::Run {
            command: command.into(),
            source,
        }
    }

    /// Builds [`CliError::Help`].
    #[must_use]
    pub const fn help(source: std::io::Error) -> Self {
        Self::Help { source }
    }

    /// Returns the command-line token or variable name the error refers to,
    /// when there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_cli::CliError;
    ///
    /// let err = CliError::unknown_argument("--colour");
    /// assert_eq!(err.argument(), Some("--colour"));
    /// ```
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::UnknownArgument { argument }
            | Self::MissingValue { argument }
            | Self::Type { argument, .. } => Some(argument),
            _ => None,
        }
    }
}
