//! End-to-end tests for the `hello-world` binary.

use std::fs;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

const ENV_VARS: [&str; 4] = [
    "HELLO_WORLD_RECIPIENT",
    "HELLO_WORLD_SALUTATION",
    "HELLO_WORLD_EXCITED",
    "HELLO_WORLD_PUNCTUATION",
];

fn hello_world(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hello-world"));
    cmd.current_dir(dir.path());
    for name in ENV_VARS {
        cmd.env_remove(name);
    }
    cmd
}

#[rstest]
#[case(&["greet"], "Hello, World!\n")]
#[case(&["greet", "-r", "Ada", "-s", "Hi"], "Hi, Ada!\n")]
#[case(&["--excited", "greet", "--punctuation", "?"], "HELLO, WORLD?\n")]
#[case(&["-q", "greet", "--preamble", "Psst"], "Psst\nHello, World...\n")]
#[case(&["take-leave", "--wave"], "Goodbye, World.\n*waves*\n")]
#[case(
    &["-r", "Ada", "take-leave", "--channel", "email", "--remind-in", "10"],
    "Goodbye, Ada.\nReminder by email in 10 minute(s).\n"
)]
fn prints_message(#[case] args: &[&str], #[case] expected: &'static str) -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir).args(args).assert().success().stdout(expected);
    Ok(())
}

#[test]
fn environment_fills_unset_flags() -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir)
        .env("HELLO_WORLD_RECIPIENT", "Ada")
        .env("HELLO_WORLD_EXCITED", "true")
        .arg("greet")
        .assert()
        .success()
        .stdout("HELLO, ADA!\n");
    Ok(())
}

#[test]
fn flags_beat_environment() -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir)
        .env("HELLO_WORLD_RECIPIENT", "Ada")
        .args(["greet", "--recipient", "Grace"])
        .assert()
        .success()
        .stdout("Hello, Grace!\n");
    Ok(())
}

#[test]
fn env_file_in_working_directory_is_read() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join(".hello_world.env"),
        "# greeting defaults\nHELLO_WORLD_SALUTATION=Howdy\n",
    )?;
    hello_world(&dir)
        .arg("greet")
        .assert()
        .success()
        .stdout("Howdy, World!\n");
    Ok(())
}

#[test]
fn invalid_environment_value_names_variable() -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir)
        .env("HELLO_WORLD_EXCITED", "loudly")
        .arg("greet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HELLO_WORLD_EXCITED"));
    Ok(())
}

#[rstest]
#[case(&["-e", "-q", "greet"], "cannot combine --excited with --quiet")]
#[case(&["take-leave", "--channel", "pigeon"], "'pigeon' is not one of: message,call,email")]
#[case(&["take-leave", "--remind-in", "2000"], "within 1440 minutes")]
#[case(&["greet", "--bogus"], "unknown argument: --bogus")]
fn rejects_bad_input(#[case] args: &[&str], #[case] message: &str) -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir)
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
    Ok(())
}

#[rstest]
#[case(&[], "Usage: hello-world [options] <command>")]
#[case(&["--help"], "Commands:")]
#[case(&["greet", "-h"], "Usage: hello-world greet [options]")]
fn prints_help(#[case] args: &[&str], #[case] expected: &str) -> Result<()> {
    let dir = TempDir::new()?;
    hello_world(&dir)
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
    Ok(())
}
