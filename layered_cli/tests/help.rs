//! Help output: automatic flag, layout and suppression switches.

use std::cell::Cell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Result, ensure};
use layered_cli::{App, Arity, CliError, Command, Flag, HelpRenderer, Options};
use layered_cli_test_helpers::output::Captured;
use rstest::rstest;

fn captured_app(captured: &Captured, tweak: impl FnOnce(&mut Options)) -> App {
    let mut options = Options::default()
        .with_env_source(HashMap::<String, String>::new())
        .with_help_output(captured.handle());
    tweak(&mut options);
    let mut app = App::new("tool", "Does things.");
    app.set_options(options);
    app
}

fn populated(app: &mut App, ran: &Rc<Cell<bool>>) -> Result<()> {
    app.set_long_description("A longer description.");
    app.opt(
        Flag::long("port")
            .with_short('p')
            .help("Port to use.")
            .env(["TOOL_PORT"]),
        8080_u16,
    )?;
    app.opt(Flag::long("verbose").help("Chatty output."), false)?;
    app.choice(Flag::long("mode").help("Speed."), &["fast", "slow"], "fast")?;
    app.env_var(String::new(), &["TOOL_TOKEN"])?;
    app.add_operand("target", Arity::Optional)?;
    let flag = Rc::clone(ran);
    app.on_run(move |_| {
        flag.set(true);
        Ok(())
    });
    app.command("group", "Grouped commands.", |group| {
        group.command_run("inner", "Inner command.", |_| Ok(()))
    })?;
    Ok(())
}

#[test]
fn help_flag_prints_layout_instead_of_running() -> Result<()> {
    let captured = Captured::default();
    let ran = Rc::new(Cell::new(false));
    let mut app = captured_app(&captured, |_| {});
    populated(&mut app, &ran)?;
    app.run_args(["-h"])?;

    let text = captured.text();
    ensure!(!ran.get(), "run callback fired despite -h");
    for expected in [
        "tool - Does things.",
        "Usage: tool [options] <command> [target]",
        "A longer description.",
        "-h, --help",
        "Show this help message.",
        "-p, --port <u16>",
        "Port to use. (default: 8080) (env: TOOL_PORT)",
        "--mode <value>",
        "Speed. (values: fast,slow) (default: fast)",
        "Environment:",
        "TOOL_TOKEN",
        "group  Grouped commands.",
    ] {
        ensure!(text.contains(expected), "missing {expected:?} in:\n{text}");
    }
    let help_at = text.find("--help");
    let port_at = text.find("--port");
    ensure!(help_at < port_at, "options are not sorted:\n{text}");
    Ok(())
}

#[test]
fn partial_commands_print_their_help() -> Result<()> {
    let captured = Captured::default();
    let ran = Rc::new(Cell::new(false));
    let mut app = captured_app(&captured, |_| {});
    populated(&mut app, &ran)?;
    app.run_args(["group"])?;
    let text = captured.text();
    ensure!(text.starts_with("tool group - Grouped commands."), "got:\n{text}");
    ensure!(text.contains("inner  Inner command."), "got:\n{text}");
    Ok(())
}

#[test]
fn partial_command_help_can_be_suppressed() -> Result<()> {
    let captured = Captured::default();
    let ran = Rc::new(Cell::new(false));
    let mut app = captured_app(&captured, |options| {
        options.suppress_print_help_partial_command = true;
    });
    populated(&mut app, &ran)?;
    app.run_args(["group"])?;
    ensure!(captured.is_empty(), "unexpected help:\n{}", captured.text());
    Ok(())
}

#[test]
fn help_flag_can_be_suppressed() -> Result<()> {
    let captured = Captured::default();
    let ran = Rc::new(Cell::new(false));
    let mut app = captured_app(&captured, |options| options.suppress_help_flag = true);
    populated(&mut app, &ran)?;
    let err = app.run_args(["-h"]).err();
    ensure!(
        matches!(err, Some(CliError::UnknownArgument { ref argument }) if argument == "-h"),
        "unexpected result: {err:?}"
    );
    Ok(())
}

#[test]
fn printing_on_help_flag_can_be_suppressed() -> Result<()> {
    let captured = Captured::default();
    let ran = Rc::new(Cell::new(false));
    let mut app = captured_app(&captured, |options| {
        options.suppress_print_help_when_set = true;
    });
    populated(&mut app, &ran)?;
    app.run_args(["--help"])?;
    ensure!(ran.get(), "run callback did not fire");
    ensure!(captured.is_empty(), "unexpected help:\n{}", captured.text());
    ensure!(app.slot::<bool>("help")?.get(), "help flag not recorded");
    Ok(())
}

#[test]
fn commands_without_options_get_no_help_flag() -> Result<()> {
    let captured = Captured::default();
    let mut app = captured_app(&captured, |_| {});
    app.add_operand("file", Arity::Repeating)?;
    let err = app.run_args(["-h"]).err();
    ensure!(
        matches!(err, Some(CliError::UnknownArgument { .. })),
        "unexpected result: {err:?}"
    );
    ensure!(app.slot::<bool>("help").is_err(), "help flag was added");
    Ok(())
}

#[test]
fn custom_renderers_replace_the_layout() -> Result<()> {
    let captured = Captured::default();
    let renderer: HelpRenderer = Rc::new(|command: &Command, out: &mut dyn Write| {
        writeln!(out, "custom help for {}", command.path())
    });
    let mut app = captured_app(&captured, |options| options.help_renderer = Some(renderer));
    app.opt(Flag::long("x"), false)?;
    app.run_args(["--help"])?;
    ensure!(captured.text() == "custom help for tool\n", "got {:?}", captured.text());
    Ok(())
}

#[test]
fn print_help_writes_to_any_writer() -> Result<()> {
    let mut app = App::new("plain", "");
    app.add_operand("file", Arity::Required)?;
    let mut buffer = Vec::new();
    app.print_help(&mut buffer)?;
    let text = String::from_utf8(buffer)?;
    ensure!(text.starts_with("plain\n\nUsage: plain file\n"), "got {text:?}");
    Ok(())
}

#[rstest]
#[case("-", "plain\n")]
#[case("plain <file> [--more]", "plain\n\nUsage: plain <file> [--more]\n")]
fn usage_override_replaces_or_drops_line(#[case] usage: &str, #[case] expected: &str) -> Result<()> {
    let mut app = App::new("plain", "");
    app.set_usage(usage);
    let mut buffer = Vec::new();
    app.print_help(&mut buffer)?;
    let text = String::from_utf8(buffer)?;
    ensure!(text == expected, "got {text:?}");
    Ok(())
}
