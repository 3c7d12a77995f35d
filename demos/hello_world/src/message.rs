//! Greeting and farewell composition for the `hello_world` demo.

use crate::error::ValidationError;

/// How loudly the greeting is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Salutation as written.
    Standard,
    /// Upper-cased salutation.
    Enthusiastic,
    /// Trailing ellipsis instead of punctuation.
    Quiet,
}

/// Values shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Globals {
    /// Who is being greeted.
    pub recipient: String,
    /// Greeting word or phrase.
    pub salutation: String,
    /// Shout the greeting.
    pub excited: bool,
    /// Whisper the greeting.
    pub quiet: bool,
}

impl Globals {
    /// Resolves the delivery mode.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConflictingDeliveryModes`] when both
    /// `excited` and `quiet` are set.
    pub const fn delivery_mode(&self) -> Result<DeliveryMode, ValidationError> {
        match (self.excited, self.quiet) {
            (true, true) => Err(ValidationError::ConflictingDeliveryModes),
            (true, false) => Ok(DeliveryMode::Enthusiastic),
            (false, true) => Ok(DeliveryMode::Quiet),
            (false, false) => Ok(DeliveryMode::Standard),
        }
    }

    fn address(&self) -> Result<(&str, &str), ValidationError> {
        let salutation = self.salutation.trim();
        if salutation.is_empty() {
            return Err(ValidationError::BlankSalutation);
        }
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(ValidationError::BlankRecipient);
        }
        Ok((salutation, recipient))
    }
}

/// Options for `greet`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GreetOptions {
    /// Line printed before the greeting, skipped when blank.
    pub preamble: String,
    /// Punctuation closing the greeting.
    pub punctuation: String,
}

/// Options for `take-leave`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakeLeaveOptions {
    /// Farewell phrase.
    pub parting: String,
    /// Reminder channel; empty means none.
    pub channel: String,
    /// Minutes until the reminder; zero means none.
    pub remind_in: u16,
    /// Add a wave.
    pub wave: bool,
}

const MAX_REMINDER_MINUTES: u16 = 1440;

/// Builds the lines printed by `greet`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the salutation or recipient is blank
/// or the delivery modes conflict.
///
/// # Examples
///
/// ```
/// use hello_world::message::{Globals, GreetOptions, greeting};
///
/// let globals = Globals {
///     recipient: "Ada".into(),
///     salutation: "Hello".into(),
///     ..Globals::default()
/// };
/// let options = GreetOptions { punctuation: "!".into(), ..GreetOptions::default() };
/// assert_eq!(greeting(&globals, &options)?, ["Hello, Ada!"]);
/// # Ok::<(), hello_world::error::ValidationError>(())
/// ```
pub fn greeting(globals: &Globals, options: &GreetOptions) -> Result<Vec<String>, ValidationError> {
    let mode = globals.delivery_mode()?;
    let (salutation, recipient) = globals.address()?;
    let base = format!("{salutation}, {recipient}");
    let punctuation = options.punctuation.trim();
    let message = match mode {
        DeliveryMode::Standard => format!("{base}{punctuation}"),
        DeliveryMode::Enthusiastic => format!("{}{punctuation}", base.to_uppercase()),
        DeliveryMode::Quiet => format!("{base}..."),
    };
    let preamble = options.preamble.trim();
    Ok(std::iter::once(preamble)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .chain(std::iter::once(message))
        .collect())
}

/// Builds the lines printed by `take-leave`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the farewell or addressing is blank
/// or the reminder is too far away.
pub fn farewell(globals: &Globals, options: &TakeLeaveOptions) -> Result<Vec<String>, ValidationError> {
    let (_, recipient) = globals.address()?;
    let parting = options.parting.trim();
    if parting.is_empty() {
        return Err(ValidationError::BlankFarewell);
    }
    if options.remind_in > MAX_REMINDER_MINUTES {
        return Err(ValidationError::ReminderOutOfRange(options.remind_in));
    }
    let mut lines = vec![match globals.delivery_mode()? {
        DeliveryMode::Quiet => format!("{parting}, {recipient}..."),
        DeliveryMode::Enthusiastic => format!("{}!", format!("{parting}, {recipient}").to_uppercase()),
        DeliveryMode::Standard => format!("{parting}, {recipient}."),
    }];
    if options.wave {
        lines.push("*waves*".to_owned());
    }
    if options.remind_in > 0 && !options.channel.is_empty() {
        lines.push(format!(
            "Reminder by {} in {} minute(s).",
            options.channel, options.remind_in
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn globals(excited: bool, quiet: bool) -> Globals {
        Globals {
            recipient: " Ada ".into(),
            salutation: "Hello".into(),
            excited,
            quiet,
        }
    }

    #[rstest]
    #[case(false, false, "Hello, Ada!")]
    #[case(true, false, "HELLO, ADA!")]
    #[case(false, true, "Hello, Ada...")]
    fn greets_in_each_mode(#[case] excited: bool, #[case] quiet: bool, #[case] expected: &str) {
        let options = GreetOptions {
            punctuation: "!".into(),
            ..GreetOptions::default()
        };
        assert_eq!(greeting(&globals(excited, quiet), &options), Ok(vec![expected.to_owned()]));
    }

    #[test]
    fn preamble_precedes_greeting() {
        let options = GreetOptions {
            preamble: "Good news".into(),
            punctuation: "?".into(),
        };
        let lines = greeting(&globals(false, false), &options);
        assert_eq!(lines, Ok(vec!["Good news".to_owned(), "Hello, Ada?".to_owned()]));
    }

    #[rstest]
    #[case(Globals { salutation: " ".into(), ..globals(false, false) }, ValidationError::BlankSalutation)]
    #[case(Globals { recipient: String::new(), ..globals(false, false) }, ValidationError::BlankRecipient)]
    #[case(globals(true, true), ValidationError::ConflictingDeliveryModes)]
    fn rejects_invalid_globals(#[case] input: Globals, #[case] expected: ValidationError) {
        assert_eq!(greeting(&input, &GreetOptions::default()), Err(expected));
    }

    #[test]
    fn farewell_adds_wave_and_reminder() {
        let options = TakeLeaveOptions {
            parting: "Goodbye".into(),
            channel: "call".into(),
            remind_in: 5,
            wave: true,
        };
        assert_eq!(
            farewell(&globals(false, false), &options),
            Ok(vec![
                "Goodbye, Ada.".to_owned(),
                "*waves*".to_owned(),
                "Reminder by call in 5 minute(s).".to_owned(),
            ])
        );
    }

    #[rstest]
    #[case(TakeLeaveOptions { parting: " ".into(), ..TakeLeaveOptions::default() }, ValidationError::BlankFarewell)]
    #[case(TakeLeaveOptions { parting: "Bye".into(), remind_in: 2000, ..TakeLeaveOptions::default() }, ValidationError::ReminderOutOfRange(2000))]
    fn rejects_invalid_farewells(#[case] options: TakeLeaveOptions, #[case] expected: ValidationError) {
        assert_eq!(farewell(&globals(false, false), &options), Err(expected));
    }
}
