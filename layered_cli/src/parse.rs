//! Per-command parse loop.
//!
//! Scans the arguments addressed to one command, writes option values and
//! splits what is left into operands and the suffix handed to a child.

use tracing::trace;

use crate::entry::{Matched, OptionTable};
use crate::error::{CliError, CliResult};
use crate::token::{Form, OptArg};

/// Arguments not consumed as options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Leftovers {
    /// Operands accumulated before the scan stopped. Only greedy scans
    /// collect these.
    pub(crate) operands: Vec<String>,
    /// Suffix starting at the operand that stopped the scan.
    pub(crate) rest: Vec<String>,
}

impl Leftovers {
    pub(crate) fn joined(&self) -> Vec<String> {
        self.operands.iter().chain(&self.rest).cloned().collect()
    }
}

/// Scan behaviour for one command.
#[derive(Clone, Copy)]
pub(crate) struct Scan<'a> {
    /// Keep scanning past operands that do not name a child command.
    pub(crate) greedy: bool,
    pub(crate) is_command: &'a dyn Fn(&str) -> bool,
}

/// Parses `args` against `table` into `leftovers`, then applies defaults
/// to every entry.
///
/// On failure `leftovers` keeps the operands gathered before the failing
/// token and defaults are not applied.
pub(crate) fn parse_level(
    table: &OptionTable,
    args: &[String],
    scan: Scan<'_>,
    leftovers: &mut Leftovers,
) -> CliResult<()> {
    scan_args(table, args, scan, leftovers)?;
    apply_defaults(table);
    Ok(())
}

pub(crate) fn apply_defaults(table: &OptionTable) {
    for entry in table.entries() {
        entry.variant().apply_default();
    }
}

fn scan_args(
    table: &OptionTable,
    args: &[String],
    scan: Scan<'_>,
    leftovers: &mut Leftovers,
) -> CliResult<()> {
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        let Some(arg) = OptArg::classify(token) else {
            if scan.greedy && !(scan.is_command)(token.as_str()) {
                leftovers.operands.push(token.clone());
                continue;
            }
            leftovers.rest = std::iter::once(token).chain(tokens).cloned().collect();
            return Ok(());
        };
        apply_flag(table, arg, &mut tokens)?;
    }
    Ok(())
}

fn apply_flag<'a>(
    table: &OptionTable,
    mut arg: OptArg,
    tokens: &mut impl Iterator<Item = &'a String>,
) -> CliResult<()> {
    if arg.form == Form::Short {
        arg.name = expand_compressed(table, &arg.name)?;
    }
    let Matched { entry, negated: negation_key } = table
        .lookup(&arg.name)
        .ok_or_else(|| CliError::unknown_argument(&arg.name))?;
    let variant = entry.variant();
    let negated = arg.negated && negation_key;
    let value = match arg.value.take() {
        Some(explicit) => explicit,
        None if variant.is_bool() => (!negated).to_string(),
        None => tokens
            .next()
            .cloned()
            .ok_or_else(|| CliError::missing_value(&arg.name))?,
    };
    if value.is_empty() && !(arg.equals && variant.kind().is_text()) {
        return Err(CliError::missing_value(&arg.name));
    }
    trace!(flag = %arg.name, %value, "setting option");
    variant
        .set_from_text(&value)
        .map_err(|source| CliError::type_error(&arg.name, source))?;
    if negated && arg.equals {
        variant.negate();
    }
    Ok(())
}

/// Sets every leading letter of `-abc` to true and returns `-c`.
///
/// All leading letters must name boolean options, otherwise the whole token
/// is unknown.
fn expand_compressed(table: &OptionTable, token: &str) -> CliResult<String> {
    let letters: Vec<char> = token.chars().skip(1).collect();
    let Some((last, leading)) = letters.split_last() else {
        return Ok(token.to_owned());
    };
    if leading.is_empty() {
        return Ok(token.to_owned());
    }
    let mut flags = Vec::with_capacity(leading.len());
    for letter in leading {
        let found = table
            .lookup(&format!("-{letter}"))
            .filter(|found| found.entry.variant().is_bool())
            .ok_or_else(|| CliError::unknown_argument(token))?;
        flags.push(found.entry);
    }
    for entry in flags {
        entry
            .variant()
            .set_from_text("true")
            .map_err(|source| CliError::type_error(token, source))?;
    }
    Ok(format!("-{last}"))
}
