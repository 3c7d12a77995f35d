//! Value precedence: command line over environment over defaults.
//!
//! Environment values come from an in-memory source unless a test exercises
//! the process environment explicitly.

use std::collections::HashMap;

use anyhow::{Result, ensure};
use layered_cli::{App, CliError, Flag, Options, Slot};
use layered_cli_test_helpers::{env, files::EnvFiles};
use rstest::rstest;
use serial_test::serial;

fn app_with_env(vars: &[(&str, &str)]) -> App {
    let source: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut app = App::new("prec", "Precedence checks.");
    app.set_options(Options::default().with_env_source(source));
    app
}

#[rstest]
#[case::cli_wins(&["--port", "3"], &[("PORT", "2")], 3)]
#[case::env_beats_default(&[], &[("PORT", "2")], 2)]
#[case::default_last(&[], &[], 1)]
#[case::empty_env_is_zero(&[], &[("PORT", "")], 0)]
fn resolves_layers(
    #[case] args: &[&str],
    #[case] vars: &[(&str, &str)],
    #[case] expected: u32,
) -> Result<()> {
    let mut app = app_with_env(vars);
    let port = app.opt(Flag::long("port").env(["PORT"]), 1_u32)?;
    app.run_args(args.iter().copied())?;
    ensure!(port.get() == expected, "expected {expected}, got {}", port.get());
    Ok(())
}

#[rstest]
#[case(&[("A", "1"), ("C", "3")], 3)]
#[case(&[("A", "1"), ("B", "2"), ("C", "")], 0)]
#[case(&[("B", "2")], 2)]
fn later_variable_names_take_priority(#[case] vars: &[(&str, &str)], #[case] expected: i64) -> Result<()> {
    let mut app = app_with_env(vars);
    let level = app.env_var(7_i64, &["A", "B", "C"])?;
    app.run_args(Vec::<String>::new())?;
    ensure!(level.get() == expected, "expected {expected}, got {}", level.get());
    Ok(())
}

#[test]
fn environment_type_errors_name_the_variable() -> Result<()> {
    let mut app = app_with_env(&[("WORKERS", "many")]);
    app.opt(Flag::long("workers").env(["WORKERS"]), 4_u8)?;
    let err = app.run_args(["--workers", "2"]).err();
    ensure!(
        matches!(err, Some(CliError::Type { ref argument, .. }) if argument == "WORKERS"),
        "unexpected result: {err:?}"
    );
    Ok(())
}

#[rstest]
#[case::zero_default_keeps_caller_value("", "keep", "keep")]
#[case::non_zero_default_fills_empty("default", "", "default")]
fn prepopulated_slots_survive_zero_defaults(
    #[case] default: &str,
    #[case] prepopulated: &str,
    #[case] expected: &str,
) -> Result<()> {
    let mut app = app_with_env(&[]);
    let target = Slot::new(prepopulated.to_owned());
    app.opt_to(&target, Flag::long("value"), default.to_owned())?;
    app.run_args(Vec::<String>::new())?;
    ensure!(target.get() == expected, "expected {expected:?}, got {:?}", target.get());
    Ok(())
}

#[test]
fn env_files_override_process_values() -> Result<()> {
    let files = EnvFiles::new()?;
    let first = files.write("base.env", "NAME=base # comment\nCOLOUR=red\n")?;
    let second = files.write("local.env", "NAME=local   \nignored line\n")?;

    let mut app = app_with_env(&[("NAME", "process"), ("COLOUR", "blue"), ("SHAPE", "square")]);
    app.use_file(&first)?;
    app.use_file(&second)?;
    let name = app.env_var(String::new(), &["NAME"])?;
    let colour = app.env_var(String::new(), &["COLOUR"])?;
    let shape = app.env_var(String::new(), &["SHAPE"])?;
    app.run_args(Vec::<String>::new())?;

    ensure!(name.get() == "local", "name was {:?}", name.get());
    ensure!(colour.get() == "red", "colour was {:?}", colour.get());
    ensure!(shape.get() == "square", "shape was {:?}", shape.get());
    Ok(())
}

#[test]
fn files_only_ignores_the_process_source() -> Result<()> {
    let files = EnvFiles::new()?;
    let path = files.write("app.env", "FROM_FILE=yes\n")?;
    let mut app = app_with_env(&[("FROM_ENV", "yes")]);
    app.use_file(&path)?;
    app.use_env(false);
    let from_file = app.env_var(String::new(), &["FROM_FILE"])?;
    let from_env = app.env_var("unset".to_owned(), &["FROM_ENV"])?;
    app.run_args(Vec::<String>::new())?;
    ensure!(from_file.get() == "yes", "file value missing");
    ensure!(from_env.get() == "unset", "process value leaked: {:?}", from_env.get());
    Ok(())
}

#[test]
fn unreadable_env_files_are_reported_or_skipped() -> Result<()> {
    let files = EnvFiles::new()?;
    let good = files.write("good.env", "GOOD=1\n")?;
    let missing = files.missing("absent.env");

    let mut app = app_with_env(&[]);
    let err = app.use_file(&missing).err();
    ensure!(matches!(err, Some(CliError::EnvFile { .. })), "expected env file error, got {err:?}");

    app.use_files([missing.as_path(), good.as_path()]);
    let good_value = app.env_var(0_u8, &["GOOD"])?;
    app.run_args(Vec::<String>::new())?;
    ensure!(good_value.get() == 1, "readable file was skipped");
    Ok(())
}

#[test]
#[serial]
fn reads_the_process_environment_by_default() -> Result<()> {
    let _scope = env::scope([
        ("LAYERED_CLI_TEST_HOST", Some("example.org")),
        ("LAYERED_CLI_TEST_PORT", None),
    ]);
    let mut app = App::new("proc", "Process environment.");
    let host = app.opt(Flag::long("host").env(["LAYERED_CLI_TEST_HOST"]), "localhost".to_owned())?;
    let port = app.opt(Flag::long("port").env(["LAYERED_CLI_TEST_PORT"]), 80_u16)?;
    app.run_args(Vec::<String>::new())?;
    ensure!(host.get() == "example.org", "host was {:?}", host.get());
    ensure!(port.get() == 80, "port was {}", port.get());
    Ok(())
}

#[test]
fn declarations_close_once_parsing_starts() -> Result<()> {
    let mut app = app_with_env(&[]);
    app.run_args(Vec::<String>::new())?;
    let err = app.opt(Flag::long("late"), false).err();
    ensure!(matches!(err, Some(CliError::Bind { .. })), "expected bind error, got {err:?}");
    Ok(())
}

#[test]
fn values_carry_over_into_a_second_run() -> Result<()> {
    let mut app = app_with_env(&[]);
    let verbose = app.opt(Flag::long("verbose").with_short('v'), false)?;
    let port = app.opt(Flag::long("port"), 1_u32)?;
    app.run_args(["-v", "--port", "5"])?;
    app.run_args(Vec::<String>::new())?;
    ensure!(verbose.get(), "verbose was reset by the second run");
    ensure!(port.get() == 5, "port was reset to {}", port.get());
    Ok(())
}
