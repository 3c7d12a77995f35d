//! Error types for the `hello_world` demo.
//!
//! `HelloWorldError` wraps command-line failures alongside local validation
//! issues so the binary renders concise diagnostics.

use thiserror::Error;

/// Errors raised by the hello world demo.
#[derive(Debug, Error)]
pub enum HelloWorldError {
    /// Declaring or parsing the command line failed.
    #[error(transparent)]
    Cli(#[from] layered_cli::CliError),
    /// Option values were inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Writing the message failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Validation issues detected before printing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The salutation collapsed to nothing after trimming.
    #[error("the salutation must contain visible characters")]
    BlankSalutation,
    /// The recipient collapsed to nothing after trimming.
    #[error("the recipient must contain visible characters")]
    BlankRecipient,
    /// Mutually exclusive delivery modes were enabled together.
    #[error("cannot combine --excited with --quiet")]
    ConflictingDeliveryModes,
    /// Farewell phrase collapsed to nothing after trimming.
    #[error("farewell messages must contain visible characters")]
    BlankFarewell,
    /// Reminder duration above one day.
    #[error("reminders must be scheduled within 1440 minutes, got {0}")]
    ReminderOutOfRange(u16),
}

/// Convenience alias for results returned by the demo.
pub type Result<T> = std::result::Result<T, HelloWorldError>;
