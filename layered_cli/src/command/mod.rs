//! Command tree nodes and their declaration API.
//!
//! A [`Command`] owns its option table, environment bindings, operands and
//! children. Children are configured lazily: their construction callback runs
//! only when the parent dispatches to them, after the parent has parsed its
//! own arguments.

mod dispatch;
mod operand;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use camino::Utf8Path;
use tracing::warn;

pub use operand::{Arity, Operand};

use crate::entry::{Flag, OptEntry, OptionTable, find_entry};
use crate::env::{EnvBinding, EnvResolver};
use crate::error::{BoxError, CliError, CliResult};
use crate::options::Options;
use crate::variant::{Choice, CustomBinding, CustomValue, Slot, Value, Variant};

type ConfigureFn = Box<dyn FnOnce(&mut Command) -> CliResult<()>>;
type MatchFn = Box<dyn FnMut(&Command)>;
type RunFn = Box<dyn FnMut(&Command) -> Result<(), BoxError>>;
type ErrorFn = Box<dyn FnMut(CliError) -> CliResult<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Declared,
    Configured,
    Parsed,
}

/// Parent options and environment bindings a child may inherit.
#[derive(Debug, Clone, Default)]
struct Inheritable {
    entries: Vec<Rc<OptEntry>>,
    env: Vec<EnvBinding>,
}

/// A node in the command tree.
pub struct Command {
    name: String,
    brief: String,
    long: String,
    usage: Option<String>,
    parent_path: Option<String>,
    table: OptionTable,
    env: EnvResolver,
    operands: Vec<Operand>,
    commands: BTreeMap<String, Self>,
    options: Options,
    inheritable: Inheritable,
    args: Vec<String>,
    used: bool,
    state: State,
    on_configure: Option<ConfigureFn>,
    on_match: Option<MatchFn>,
    on_run: Option<RunFn>,
    on_error: Option<ErrorFn>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("path", &self.path())
            .field("table", &self.table)
            .field("operands", &self.operands)
            .field("commands", &self.commands)
            .field("args", &self.args)
            .field("used", &self.used)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub(crate) fn new(name: String, brief: String, parent_path: Option<String>) -> Self {
        Self {
            name,
            brief,
            long: String::new(),
            usage: None,
            parent_path,
            table: OptionTable::default(),
            env: EnvResolver::default(),
            operands: Vec::new(),
            commands: BTreeMap::new(),
            options: Options::default(),
            inheritable: Inheritable::default(),
            args: Vec::new(),
            used: false,
            state: State::Declared,
            on_configure: None,
            on_match: None,
            on_run: None,
            on_error: None,
        }
    }

    /// Command name as typed on the command line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    #[must_use]
    pub fn brief(&self) -> &str {
        &self.brief
    }

    /// Long description shown in help.
    #[must_use]
    pub fn long_description(&self) -> &str {
        &self.long
    }

    /// Custom usage line, if one was set.
    #[must_use]
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Space-separated names from the root to this command.
    #[must_use]
    pub fn path(&self) -> String {
        self.parent_path.as_ref().map_or_else(
            || self.name.clone(),
            |parent| format!("{parent} {}", self.name),
        )
    }

    /// Whether this is the root command.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }

    /// Arguments left after parsing.
    ///
    /// For a command that dispatched to a child, these are its own greedy
    /// operands followed by the child's leftovers.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether this command was reached while running.
    #[must_use]
    pub const fn used(&self) -> bool {
        self.used
    }

    /// Behaviour switches in effect.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the behaviour switches.
    pub const fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Replaces the behaviour switches.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Sets the long description.
    pub fn set_long_description(&mut self, text: impl Into<String>) {
        self.long = text.into();
    }

    /// Overrides the generated usage line; `"-"` omits it from help.
    pub fn set_usage(&mut self, text: impl Into<String>) {
        self.usage = Some(text.into());
    }

    /// Options visible on this command, including inherited ones.
    pub fn entries(&self) -> impl Iterator<Item = &OptEntry> {
        self.table.entries().iter().map(|entry| &**entry)
    }

    /// Environment bindings declared on or inherited by this command.
    #[must_use]
    pub fn env_bindings(&self) -> &[EnvBinding] {
        self.env.bindings()
    }

    /// Environment binding attached to `entry`, if any.
    #[must_use]
    pub fn env_binding_for(&self, entry: &OptEntry) -> Option<&EnvBinding> {
        self.env.binding_for(entry.variant())
    }

    /// Declared operands.
    #[must_use]
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Child commands, sorted by name.
    pub fn subcommands(&self) -> impl Iterator<Item = &Self> {
        self.commands.values()
    }

    /// Child command called `name`.
    #[must_use]
    pub fn subcommand(&self, name: &str) -> Option<&Self> {
        self.commands.get(name)
    }

    /// Declares an option and returns the slot receiving its value.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when parsing has already started or the
    /// flag names are malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_cli::{App, Flag};
    ///
    /// let mut app = App::new("serve", "Serve files.");
    /// let port = app.opt(Flag::long("port").with_short('p'), 8080_u16)?;
    /// app.run_args(["-p", "9000"])?;
    /// assert_eq!(port.get(), 9000);
    /// # Ok::<(), layered_cli::CliError>(())
    /// ```
    pub fn opt<T: Value>(&mut self, flag: Flag, default: T) -> CliResult<Slot<T>> {
        let slot = Slot::default();
        self.opt_to(&slot, flag, default)?;
        Ok(slot)
    }

    /// Declares an option writing into an existing slot.
    ///
    /// # Errors
    ///
    /// As for [`Command::opt`].
    pub fn opt_to<T: Value>(&mut self, target: &Slot<T>, flag: Flag, default: T) -> CliResult<()> {
        self.register(flag, Variant::bind(target.clone(), default))
    }

    /// Declares a value set only from environment variables, listed lowest
    /// priority first.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when `names` is empty or parsing has
    /// already started.
    pub fn env_var<T: Value>(&mut self, default: T, names: &[&str]) -> CliResult<Slot<T>> {
        let slot = Slot::default();
        self.env_var_to(&slot, default, names)?;
        Ok(slot)
    }

    /// Environment-only binding writing into an existing slot.
    ///
    /// # Errors
    ///
    /// As for [`Command::env_var`].
    pub fn env_var_to<T: Value>(&mut self, target: &Slot<T>, default: T, names: &[&str]) -> CliResult<()> {
        let Some(first) = names.first() else {
            return Err(CliError::bind(
                self.path(),
                "an environment binding needs at least one variable name",
            ));
        };
        self.ensure_configurable(first)?;
        self.opt_to(target, Flag::unnamed().env(names.iter().copied()), default)
    }

    /// Declares a text option restricted to `choices`.
    ///
    /// The empty string and `default` are always accepted.
    ///
    /// # Errors
    ///
    /// As for [`Command::opt`].
    pub fn choice(&mut self, flag: Flag, choices: &[&str], default: &str) -> CliResult<Slot<String>> {
        let value = Slot::new(String::new());
        let restricted = Slot::new(Choice::new(value.clone(), choices.iter().copied(), default));
        self.custom(flag, &restricted, default)?;
        Ok(value)
    }

    /// Declares an option backed by a [`CustomValue`].
    ///
    /// # Errors
    ///
    /// As for [`Command::opt`].
    pub fn custom<C: CustomValue + 'static>(&mut self, flag: Flag, target: &Slot<C>, default: &str) -> CliResult<()> {
        let shared: Rc<RefCell<dyn CustomValue>> = target.shared();
        self.register(flag, Variant::Custom(CustomBinding::new(shared, default)))
    }

    /// Declares a positional operand.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when parsing has already started.
    pub fn add_operand(&mut self, name: impl Into<String>, arity: Arity) -> CliResult<()> {
        let operand = Operand::new(name.into(), arity);
        self.ensure_configurable(operand.name())?;
        self.operands.push(operand);
        Ok(())
    }

    /// Shares the parent option called `name` (long or short, without
    /// dashes) together with its environment binding.
    ///
    /// An unknown name is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when parsing has already started.
    pub fn inherit(&mut self, name: &str) -> CliResult<()> {
        self.ensure_configurable(name)?;
        let Some(entry) = find_entry(&self.inheritable.entries, name).cloned() else {
            warn!(command = %self.path(), option = name, "no parent option to inherit");
            return Ok(());
        };
        self.adopt_entry(entry);
        Ok(())
    }

    /// Shares every parent option whose names are not already taken here.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when parsing has already started.
    pub fn inherit_all(&mut self) -> CliResult<()> {
        self.ensure_configurable("*")?;
        let entries = self.inheritable.entries.clone();
        for entry in entries {
            let taken = entry
                .long()
                .is_some_and(|long| self.table.lookup(&format!("--{long}")).is_some())
                || entry
                    .short()
                    .is_some_and(|short| self.table.lookup(&format!("-{short}")).is_some());
            if !taken {
                self.adopt_entry(entry);
            }
        }
        Ok(())
    }

    /// Loads an environment file into this command's cache.
    ///
    /// Values from files take precedence over the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::EnvFile`] when the file cannot be read.
    pub fn use_file(&mut self, path: impl AsRef<Utf8Path>) -> CliResult<()> {
        self.env.load_file(path.as_ref())
    }

    /// Loads each readable file in order, logging and skipping the rest.
    pub fn use_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        for path in paths {
            if let Err(err) = self.use_file(&path) {
                warn!(path = %path.as_ref(), error = %err, "skipping environment file");
            }
        }
    }

    /// Enables or disables the process environment. Files stay active.
    pub const fn use_env(&mut self, enabled: bool) {
        self.options.files_only = !enabled;
    }

    /// Declares a child command. `configure` runs when the child is
    /// dispatched to, and may declare options, operands and callbacks.
    ///
    /// An empty name is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when parsing has already started.
    pub fn command<F>(&mut self, name: &str, brief: &str, configure: F) -> CliResult<()>
    where
        F: FnOnce(&mut Self) -> CliResult<()> + 'static,
    {
        self.ensure_configurable(name)?;
        if name.is_empty() {
            warn!(command = %self.path(), "ignoring subcommand with an empty name");
            return Ok(());
        }
        let mut child = Self::new(name.to_owned(), brief.to_owned(), Some(self.path()));
        child.on_configure = Some(Box::new(configure));
        self.commands.insert(name.to_owned(), child);
        Ok(())
    }

    /// Declares a child command with only a run callback.
    ///
    /// # Errors
    ///
    /// As for [`Command::command`].
    pub fn command_run<F>(&mut self, name: &str, brief: &str, run: F) -> CliResult<()>
    where
        F: FnMut(&Self) -> Result<(), BoxError> + 'static,
    {
        self.command(name, brief, move |child| {
            child.on_run(run);
            Ok(())
        })
    }

    /// Declares a child command with only a match callback.
    ///
    /// # Errors
    ///
    /// As for [`Command::command`].
    pub fn command_match<F>(&mut self, name: &str, brief: &str, matched: F) -> CliResult<()>
    where
        F: FnMut(&Self) + 'static,
    {
        self.command(name, brief, move |child| {
            child.on_match(matched);
            Ok(())
        })
    }

    /// Runs `callback` when this command is the leaf of a dispatch.
    pub fn on_run<F>(&mut self, callback: F)
    where
        F: FnMut(&Self) -> Result<(), BoxError> + 'static,
    {
        self.on_run = Some(Box::new(callback));
    }

    /// Runs `callback` whenever this command is reached and parsed, leaf or
    /// not. A parse error suppressed by the error handler still counts.
    pub fn on_match<F>(&mut self, callback: F)
    where
        F: FnMut(&Self) + 'static,
    {
        self.on_match = Some(Box::new(callback));
    }

    /// Routes errors raised at this command through `handler`. Returning
    /// `Ok(())` swallows the error and parsing carries on with what was
    /// read before the failure, so match, dispatch and run still happen.
    pub fn on_error<F>(&mut self, handler: F)
    where
        F: FnMut(CliError) -> CliResult<()> + 'static,
    {
        self.on_error = Some(Box::new(handler));
    }

    /// Typed handle on the option called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when there is no such option or it holds
    /// another kind.
    pub fn slot<T: Value>(&self, name: &str) -> CliResult<Slot<T>> {
        let entry = self.lookup_entry(name)?;
        T::slot_of(entry.variant()).ok_or_else(|| {
            CliError::bind(
                name,
                format!("option holds {} values, not {}", entry.variant().kind(), T::KIND),
            )
        })
    }

    /// Handle on the custom value bound to the option called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Bind`] when there is no such option or it is not
    /// custom.
    pub fn custom_value(&self, name: &str) -> CliResult<Rc<RefCell<dyn CustomValue>>> {
        let entry = self.lookup_entry(name)?;
        match &**entry.variant() {
            Variant::Custom(binding) => Ok(binding.target()),
            other => Err(CliError::bind(
                name,
                format!("option holds {} values, not custom values", other.kind()),
            )),
        }
    }

    fn lookup_entry(&self, name: &str) -> CliResult<&Rc<OptEntry>> {
        self.table
            .find(name)
            .ok_or_else(|| CliError::bind(name, "no such option"))
    }

    fn register(&mut self, flag: Flag, binding: Variant) -> CliResult<()> {
        self.ensure_configurable(&flag.display_name())?;
        flag.validate()?;
        let variant = Rc::new(binding);
        if !flag.env_names().is_empty() {
            self.env.bind(Rc::clone(&variant), flag.env_names().to_vec());
        }
        if flag.is_keyless() {
            if flag.env_names().is_empty() {
                warn!(command = %self.path(), "option has neither a name nor an environment variable");
                variant.apply_default();
            }
            return Ok(());
        }
        self.table.insert(Rc::new(flag.into_entry(variant)));
        Ok(())
    }

    fn adopt_entry(&mut self, entry: Rc<OptEntry>) {
        if let Some(binding) = self
            .inheritable
            .env
            .iter()
            .find(|binding| Rc::ptr_eq(binding.variant(), entry.variant()))
        {
            self.env.inherit(binding);
        }
        self.table.insert(entry);
    }

    fn ensure_configurable(&self, name: &str) -> CliResult<()> {
        if self.state == State::Parsed {
            return Err(CliError::bind(
                name,
                "declarations are closed once parsing has started",
            ));
        }
        Ok(())
    }
}
