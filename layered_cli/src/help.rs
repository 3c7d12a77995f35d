//! Built-in help layout.

use std::io::{self, Write};
use std::rc::Rc;

use crate::command::Command;
use crate::entry::OptEntry;
use crate::options::HelpRenderer;
use crate::variant::Kind;

const OMIT_USAGE: &str = "-";

pub(crate) fn default_renderer() -> HelpRenderer {
    Rc::new(render)
}

/// Writes the built-in help text for `command`.
///
/// The layout is a title line, a usage line, the long description, then
/// sorted options, environment-only variables and subcommands. A usage
/// override of `"-"` drops the usage line.
///
/// # Errors
///
/// Propagates failures from `out`.
pub fn render(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    if command.brief().is_empty() {
        writeln!(out, "{}", command.path())?;
    } else {
        writeln!(out, "{} - {}", command.path(), command.brief())?;
    }
    if command.usage() != Some(OMIT_USAGE) {
        writeln!(out)?;
        writeln!(out, "Usage: {}", usage_line(command))?;
    }
    if !command.long_description().is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", command.long_description())?;
    }
    render_options(command, out)?;
    render_env_only(command, out)?;
    render_subcommands(command, out)
}

/// Usage line: the custom one when set, otherwise generated.
#[must_use]
pub fn usage_line(command: &Command) -> String {
    if let Some(custom) = command.usage() {
        return custom.to_owned();
    }
    let mut line = command.path();
    if command.entries().next().is_some() {
        line.push_str(" [options]");
    }
    if command.subcommands().next().is_some() {
        line.push_str(" <command>");
    }
    for operand in command.operands() {
        line.push(' ');
        line.push_str(&operand.to_string());
    }
    line
}

fn render_options(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    let mut entries: Vec<&OptEntry> = command.entries().collect();
    if entries.is_empty() {
        return Ok(());
    }
    entries.sort_by_key(|entry| sort_key(entry));
    writeln!(out)?;
    writeln!(out, "Options:")?;
    for entry in entries {
        writeln!(out, "  {}{}", entry.header().trim_start(), value_hint(entry))?;
        let mut notes = vec![entry.help().to_owned()];
        let variant = entry.variant();
        notes.extend(variant.explain());
        notes.extend(variant.default_text().map(|text| format!("(default: {text})")));
        notes.extend(
            command
                .env_binding_for(entry)
                .map(|binding| format!("(env: {})", binding.names().join(", "))),
        );
        notes.retain(|note| !note.is_empty());
        if !notes.is_empty() {
            writeln!(out, "        {}", notes.join(" "))?;
        }
    }
    Ok(())
}

fn render_env_only(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    let env_only: Vec<_> = command
        .env_bindings()
        .iter()
        .filter(|binding| {
            !command
                .entries()
                .any(|entry| Rc::ptr_eq(entry.variant(), binding.variant()))
        })
        .collect();
    if env_only.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Environment:")?;
    for binding in env_only {
        let default = binding
            .variant()
            .default_text()
            .map(|text| format!(" (default: {text})"))
            .unwrap_or_default();
        writeln!(out, "  {}{default}", binding.names().join(", "))?;
    }
    Ok(())
}

fn render_subcommands(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    let width = command
        .subcommands()
        .map(|child| child.name().len())
        .max()
        .unwrap_or_default();
    if width == 0 {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    for child in command.subcommands() {
        writeln!(out, "  {:<width$}  {}", child.name(), child.brief())?;
    }
    Ok(())
}

fn sort_key(entry: &OptEntry) -> String {
    entry
        .long()
        .map_or_else(|| entry.short().map(String::from).unwrap_or_default(), str::to_owned)
}

fn value_hint(entry: &OptEntry) -> String {
    match entry.variant().kind() {
        Kind::Bool => String::new(),
        Kind::Custom => " <value>".to_owned(),
        kind => format!(" <{kind}>"),
    }
}
