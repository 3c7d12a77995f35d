//! Running a command: configure, resolve, parse, dispatch.

use std::io::{self, Write};

use tracing::debug;

use super::operand::bounds;
use super::{Command, Inheritable, State};
use crate::entry::{Flag, OptionTable};
use crate::env::EnvResolver;
use crate::error::{CliError, CliResult};
use crate::help;
use crate::options::Options;
use crate::parse::{Leftovers, Scan, apply_defaults, parse_level};
use crate::variant::Value;

impl Command {
    /// Runs this command against `args`, dispatching down the tree.
    ///
    /// Errors raised while handling this node pass through its error
    /// handler. A child's errors are handled by the child. When the handler
    /// returns `Ok`, the run continues with whatever was parsed before the
    /// failure.
    pub(crate) fn execute(&mut self, args: &[String]) -> CliResult<()> {
        let leftovers = self.prepare(args)?;
        self.args = leftovers.joined();
        self.used = true;
        self.fire_match();

        let Leftovers { operands, rest } = leftovers;
        if let Some((first, tail)) = rest.split_first()
            && self.commands.contains_key(first)
        {
            return self.dispatch(first, tail, operands);
        }
        let outcome = self.run_leaf();
        outcome.or_else(|err| self.handle_error(err))
    }

    /// Writes help for this command to the configured output.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Help`] when writing fails.
    pub fn help(&self) -> CliResult<()> {
        self.options.help_output.as_ref().map_or_else(
            || self.print_help(&mut io::stdout().lock()),
            |output| self.print_help(&mut *output.borrow_mut()),
        )
    }

    /// Renders help for this command into `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Help`] when writing fails.
    pub fn print_help(&self, writer: &mut dyn Write) -> CliResult<()> {
        let renderer = self
            .options
            .help_renderer
            .clone()
            .unwrap_or_else(help::default_renderer);
        renderer(self, writer).map_err(CliError::help)
    }

    fn prepare(&mut self, args: &[String]) -> CliResult<Leftovers> {
        let configured = self.configure();
        self.state = State::Parsed;
        self.recover(configured)?;

        let source = (!self.options.files_only).then(|| &*self.options.env_source);
        let resolved = self.env.resolve(source);
        self.recover(resolved)?;

        let mut leftovers = Leftovers::default();
        let commands = &self.commands;
        let is_command = |token: &str| commands.contains_key(token);
        let scan = Scan {
            greedy: self.options.greedy,
            is_command: &is_command,
        };
        let parsed = parse_level(&self.table, args, scan, &mut leftovers);
        let failed = parsed.is_err();
        self.recover(parsed)?;
        if failed {
            apply_defaults(&self.table);
        }
        Ok(leftovers)
    }

    /// Routes a failed step through the error handler. `Ok` means the
    /// handler suppressed the error and the run goes on.
    fn recover(&mut self, outcome: CliResult<()>) -> CliResult<()> {
        let Err(err) = outcome else {
            return Ok(());
        };
        self.handle_error(err)?;
        debug!(command = %self.path(), "continuing after handled error");
        Ok(())
    }

    fn configure(&mut self) -> CliResult<()> {
        if self.state != State::Declared {
            return Ok(());
        }
        if let Some(callback) = self.on_configure.take() {
            callback(self)?;
        }
        self.add_help_flag()?;
        self.state = State::Configured;
        Ok(())
    }

    fn add_help_flag(&mut self) -> CliResult<()> {
        if self.options.suppress_help_flag || (self.table.is_empty() && self.commands.is_empty()) {
            return Ok(());
        }
        if self.table.lookup("-h").is_some() || self.table.lookup("--help").is_some() {
            return Ok(());
        }
        self.opt(
            Flag::long("help")
                .with_short('h')
                .help("Show this help message."),
            false,
        )?;
        Ok(())
    }

    /// Hands the parent's options, bindings, switches and file cache to a
    /// child that has not been configured yet.
    fn adopt(&mut self, table: &OptionTable, env: &EnvResolver, options: &Options) {
        if self.state != State::Declared {
            return;
        }
        self.inheritable = Inheritable {
            entries: table.entries().to_vec(),
            env: env.bindings().to_vec(),
        };
        self.env.adopt_cache(env);
        self.options = options.clone();
    }

    fn dispatch(&mut self, name: &str, rest: &[String], operands: Vec<String>) -> CliResult<()> {
        let Self {
            commands,
            table,
            env,
            options,
            args,
            ..
        } = self;
        let Some(child) = commands.get_mut(name) else {
            return Ok(());
        };
        debug!(command = %child.path(), "dispatching to subcommand");
        child.adopt(table, env, options);
        let result = child.execute(rest);
        *args = operands.into_iter().chain(child.args.iter().cloned()).collect();
        result
    }

    fn run_leaf(&mut self) -> CliResult<()> {
        if self.help_requested() && !self.options.suppress_print_help_when_set {
            return self.help();
        }
        if self.options.strict_parsing {
            self.check_leftovers()?;
        }
        if self.options.strict_operands {
            self.check_operands()?;
        }
        if let Some(mut run) = self.on_run.take() {
            debug!(command = %self.path(), "running command");
            let result = run(self);
            self.on_run = Some(run);
            return result.map_err(|source| CliError::run(self.path(), source));
        }
        if !self.is_root()
            && !self.commands.is_empty()
            && !self.options.suppress_print_help_partial_command
        {
            return self.help();
        }
        Ok(())
    }

    fn help_requested(&self) -> bool {
        self.table
            .lookup("--help")
            .and_then(|found| bool::slot_of(found.entry.variant()))
            .is_some_and(|slot| slot.get())
    }

    /// Leftovers beyond what the declared operands can absorb are unknown.
    fn check_leftovers(&self) -> CliResult<()> {
        let (_, capacity) = bounds(&self.operands);
        capacity
            .and_then(|limit| self.args.get(limit))
            .map_or(Ok(()), |extra| Err(CliError::unknown_argument(extra)))
    }

    fn check_operands(&self) -> CliResult<()> {
        let (required, maximum) = bounds(&self.operands);
        let got = self.args.len();
        if got < required || maximum.is_some_and(|max| got > max) {
            return Err(CliError::OperandCount {
                required,
                maximum,
                got,
            });
        }
        Ok(())
    }

    fn fire_match(&mut self) {
        if let Some(mut callback) = self.on_match.take() {
            callback(self);
            self.on_match = Some(callback);
        }
    }

    fn handle_error(&mut self, err: CliError) -> CliResult<()> {
        let Some(mut handler) = self.on_error.take() else {
            return Err(err);
        };
        let result = handler(err);
        self.on_error = Some(handler);
        result
    }
}
