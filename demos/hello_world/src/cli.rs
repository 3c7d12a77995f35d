//! Command tree for the `hello_world` demo.
//!
//! Global options live on the root and are shared with every subcommand via
//! inheritance. Values come from the command line, then `.hello_world.env`
//! in the working directory, then `HELLO_WORLD_*` variables, then the
//! defaults below.

use std::io::Write;
use std::rc::Rc;

use camino::Utf8Path;
use layered_cli::{App, BoxError, CliResult, Command, Flag, HelpOutput, Options, Slot};
use tracing::debug;

use crate::error::Result;
use crate::message::{GreetOptions, Globals, TakeLeaveOptions, farewell, greeting};

/// Environment file read from the working directory when present.
pub const ENV_FILE: &str = ".hello_world.env";

/// Reminder channels accepted by `take-leave --channel`.
pub const CHANNELS: [&str; 3] = ["message", "call", "email"];

#[derive(Debug, Clone)]
struct GlobalSlots {
    recipient: Slot<String>,
    salutation: Slot<String>,
    excited: Slot<bool>,
    quiet: Slot<bool>,
}

impl GlobalSlots {
    fn declare(root: &mut Command) -> CliResult<Self> {
        Ok(Self {
            recipient: root.opt(
                Flag::long("recipient")
                    .with_short('r')
                    .help("Who to greet.")
                    .env(["HELLO_WORLD_RECIPIENT"]),
                "World".to_owned(),
            )?,
            salutation: root.opt(
                Flag::long("salutation")
                    .with_short('s')
                    .help("Greeting word or phrase.")
                    .env(["HELLO_WORLD_SALUTATION"]),
                "Hello".to_owned(),
            )?,
            excited: root.opt(
                Flag::long("excited")
                    .with_short('e')
                    .help("Shout the greeting.")
                    .env(["HELLO_WORLD_EXCITED"]),
                false,
            )?,
            quiet: root.opt(
                Flag::long("quiet").with_short('q').help("Whisper the greeting."),
                false,
            )?,
        })
    }

    fn snapshot(&self) -> Globals {
        Globals {
            recipient: self.recipient.get(),
            salutation: self.salutation.get(),
            excited: self.excited.get(),
            quiet: self.quiet.get(),
        }
    }
}

/// Declares the demo's command tree, writing messages and help to
/// `output`.
///
/// # Errors
///
/// Returns an error when an option declaration is rejected.
pub fn build(output: HelpOutput) -> Result<App> {
    let mut app = App::new("hello-world", "Greets people from the command line.");
    app.set_long_description(
        "Values come from flags, then .hello_world.env, then HELLO_WORLD_* variables.",
    );
    app.set_options(Options {
        help_output: Some(Rc::clone(&output)),
        ..Options::default()
    });
    let env_file = Utf8Path::new(ENV_FILE);
    if env_file.is_file() {
        app.use_file(env_file)?;
    }
    let globals = GlobalSlots::declare(&mut app)?;

    let greet_globals = globals.clone();
    let greet_output = Rc::clone(&output);
    app.command("greet", "Print a greeting.", move |cmd| {
        configure_greet(cmd, greet_globals, greet_output)
    })?;
    app.command("take-leave", "Say goodbye.", move |cmd| {
        configure_take_leave(cmd, globals, output)
    })?;
    app.on_run(|cmd| cmd.help().map_err(BoxError::from));
    debug!(commands = app.subcommands().count(), "declared command tree");
    Ok(app)
}

fn configure_greet(cmd: &mut Command, globals: GlobalSlots, output: HelpOutput) -> CliResult<()> {
    let preamble = cmd.opt(
        Flag::long("preamble").help("Line printed before the greeting."),
        String::new(),
    )?;
    let punctuation = cmd.opt(
        Flag::long("punctuation")
            .with_short('p')
            .help("Punctuation closing the greeting.")
            .env(["HELLO_WORLD_PUNCTUATION"]),
        "!".to_owned(),
    )?;
    cmd.inherit_all()?;
    cmd.on_run(move |_| {
        let options = GreetOptions {
            preamble: preamble.get(),
            punctuation: punctuation.get(),
        };
        let lines = greeting(&globals.snapshot(), &options)?;
        write_lines(&output, &lines)
    });
    Ok(())
}

fn configure_take_leave(cmd: &mut Command, globals: GlobalSlots, output: HelpOutput) -> CliResult<()> {
    let parting = cmd.opt(
        Flag::long("parting").help("Farewell phrase."),
        "Goodbye".to_owned(),
    )?;
    let channel = cmd.choice(
        Flag::long("channel").with_short('c').help("Reminder channel."),
        &CHANNELS,
        "message",
    )?;
    let remind_in = cmd.opt(
        Flag::long("remind-in").help("Minutes until a reminder."),
        0_u16,
    )?;
    let wave = cmd.opt(Flag::long("wave").with_short('w').help("Wave goodbye."), false)?;
    cmd.inherit_all()?;
    cmd.on_run(move |_| {
        let options = TakeLeaveOptions {
            parting: parting.get(),
            channel: channel.get(),
            remind_in: remind_in.get(),
            wave: wave.get(),
        };
        let lines = farewell(&globals.snapshot(), &options)?;
        write_lines(&output, &lines)
    });
    Ok(())
}

fn write_lines(output: &HelpOutput, lines: &[String]) -> std::result::Result<(), BoxError> {
    let mut out = output.borrow_mut();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use anyhow::{Result, ensure};
    use rstest::rstest;

    use super::*;

    fn run(args: &[&str]) -> Result<String> {
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let output: HelpOutput = Rc::clone(&buffer) as HelpOutput;
        let mut app = build(output)?;
        let options = app
            .options()
            .clone()
            .with_env_source(HashMap::<String, String>::new());
        app.set_options(options);
        app.run_args(args.iter().copied())?;
        let bytes = buffer.borrow().clone();
        Ok(String::from_utf8(bytes)?)
    }

    #[rstest]
    #[case(&["greet"], "Hello, World!\n")]
    #[case(&["-r", "Ada", "greet", "-p", "?"], "Hello, Ada?\n")]
    #[case(&["greet", "--recipient", "Grace", "-e"], "HELLO, GRACE!\n")]
    #[case(&["greet", "--preamble", "News"], "News\nHello, World!\n")]
    #[case(
        &["take-leave", "-w", "--remind-in", "3", "-c", "call"],
        "Goodbye, World.\n*waves*\nReminder by call in 3 minute(s).\n"
    )]
    fn prints_messages(#[case] args: &[&str], #[case] expected: &str) -> Result<()> {
        let printed = run(args)?;
        ensure!(printed == expected, "expected {expected:?}, got {printed:?}");
        Ok(())
    }

    #[test]
    fn root_without_command_prints_help() -> Result<()> {
        let printed = run(&[])?;
        ensure!(printed.contains("Usage: hello-world [options] <command>"), "got {printed:?}");
        Ok(())
    }

    #[test]
    fn conflicting_modes_fail() {
        let result = run(&["-e", "-q", "greet"]);
        assert!(result.is_err_and(|err| err.to_string().contains("cannot combine")));
    }
}
