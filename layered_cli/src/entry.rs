//! Option declarations and the per-command lookup table.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{CliError, CliResult};
use crate::variant::Variant;

/// Names, help text and environment variables for one option.
///
/// # Examples
///
/// ```
/// use layered_cli::Flag;
///
/// let flag = Flag::long("port")
///     .with_short('p')
///     .help("Port to listen on.")
///     .env(["APP_PORT", "PORT"]);
/// assert_eq!(flag.display_name(), "--port");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Flag {
    long: Option<String>,
    short: Option<char>,
    help: String,
    env: Vec<String>,
}

impl Flag {
    /// Flag answering to `--name`.
    pub fn long(name: impl Into<String>) -> Self {
        Self {
            long: Some(name.into()),
            ..Self::default()
        }
    }

    /// Flag answering to `-c`.
    pub fn short(name: char) -> Self {
        Self {
            short: Some(name),
            ..Self::default()
        }
    }

    /// Flag with no command-line name, bound only through the environment.
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Adds a long name.
    pub fn with_long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    /// Adds a short name.
    pub const fn with_short(mut self, name: char) -> Self {
        self.short = Some(name);
        self
    }

    /// Sets the help text.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    /// Binds environment variables, highest priority last.
    pub fn env<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env.extend(names.into_iter().map(Into::into));
        self
    }

    /// Name used in log lines and errors: the long form when present.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.env.first().cloned().unwrap_or_default(),
        }
    }

    pub(crate) const fn is_keyless(&self) -> bool {
        self.long.is_none() && self.short.is_none()
    }

    pub(crate) const fn env_names(&self) -> &[String] {
        self.env.as_slice()
    }

    pub(crate) fn validate(&self) -> CliResult<()> {
        if let Some(long) = &self.long
            && (long.is_empty()
                || long.starts_with('-')
                || long.contains(|c: char| c == '=' || c.is_whitespace()))
        {
            return Err(CliError::bind(
                long,
                "long names must be non-empty and free of '=', whitespace and leading '-'",
            ));
        }
        if let Some(short) = self.short
            && (short == '-' || short == '=' || short.is_whitespace())
        {
            return Err(CliError::bind(
                short.to_string(),
                "short names cannot be '-', '=' or whitespace",
            ));
        }
        Ok(())
    }

    pub(crate) fn into_entry(self, variant: Rc<Variant>) -> OptEntry {
        OptEntry {
            long: self.long,
            short: self.short,
            help: self.help,
            variant,
        }
    }
}

/// A declared option: its names, help text and shared binding.
#[derive(Debug)]
pub struct OptEntry {
    long: Option<String>,
    short: Option<char>,
    help: String,
    variant: Rc<Variant>,
}

impl OptEntry {
    /// Long name without the leading dashes.
    #[must_use]
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Short name.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Help text.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Binding written by this option.
    #[must_use]
    pub const fn variant(&self) -> &Rc<Variant> {
        &self.variant
    }

    /// Whether `name` (without dashes) names this option.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name)
            || self
                .short
                .is_some_and(|short| name.chars().eq(std::iter::once(short)))
    }

    /// `-s, --long` form used by help output.
    #[must_use]
    pub fn header(&self) -> String {
        match (self.short, &self.long) {
            (Some(short), Some(long)) => format!("-{short}, --{long}"),
            (Some(short), None) => format!("-{short}"),
            (None, Some(long)) => format!("    --{long}"),
            (None, None) => String::new(),
        }
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Matched<'a> {
    pub(crate) entry: &'a Rc<OptEntry>,
    /// The token hit the `--no-` alias of a boolean.
    pub(crate) negated: bool,
}

#[derive(Debug, Clone)]
struct LongKey {
    entry: Rc<OptEntry>,
    negated: bool,
}

/// Maps `-c`, `--name` and `--no-name` keys to entries.
///
/// A later insertion wins any key it shares with an earlier entry; entries
/// left without keys drop out of [`OptionTable::entries`].
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionTable {
    entries: Vec<Rc<OptEntry>>,
    short: HashMap<char, Rc<OptEntry>>,
    long: HashMap<String, LongKey>,
}

impl OptionTable {
    pub(crate) fn insert(&mut self, entry: Rc<OptEntry>) {
        if let Some(short) = entry.short {
            self.short.insert(short, Rc::clone(&entry));
        }
        if let Some(long) = &entry.long {
            self.long.insert(
                long.clone(),
                LongKey {
                    entry: Rc::clone(&entry),
                    negated: false,
                },
            );
            if entry.variant.is_bool() {
                self.long.insert(
                    format!("no-{long}"),
                    LongKey {
                        entry: Rc::clone(&entry),
                        negated: true,
                    },
                );
            }
        }
        self.entries.push(entry);
        self.entries.retain(|kept| {
            self.short.values().any(|owner| Rc::ptr_eq(owner, kept))
                || self.long.values().any(|owner| Rc::ptr_eq(&owner.entry, kept))
        });
    }

    /// Looks up a dashed token name such as `-p`, `--port` or `--no-color`.
    pub(crate) fn lookup(&self, key: &str) -> Option<Matched<'_>> {
        if let Some(long) = key.strip_prefix("--") {
            return self.long.get(long).map(|found| Matched {
                entry: &found.entry,
                negated: found.negated,
            });
        }
        let mut chars = key.strip_prefix('-')?.chars();
        let short = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.short.get(&short).map(|entry| Matched {
            entry,
            negated: false,
        })
    }

    /// Finds an entry by bare name, preferring a short-name match.
    pub(crate) fn find(&self, name: &str) -> Option<&Rc<OptEntry>> {
        find_entry(&self.entries, name)
    }

    pub(crate) const fn entries(&self) -> &[Rc<OptEntry>] {
        self.entries.as_slice()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn find_entry<'a>(entries: &'a [Rc<OptEntry>], name: &str) -> Option<&'a Rc<OptEntry>> {
    let mut chars = name.chars();
    let single = chars.next().filter(|_| chars.next().is_none());
    single
        .and_then(|short| entries.iter().rev().find(|entry| entry.short == Some(short)))
        .or_else(|| entries.iter().rev().find(|entry| entry.answers_to(name)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::variant::Slot;

    fn entry(flag: Flag, variant: Variant) -> Rc<OptEntry> {
        Rc::new(flag.into_entry(Rc::new(variant)))
    }

    fn table() -> OptionTable {
        let mut table = OptionTable::default();
        table.insert(entry(
            Flag::long("color").with_short('c'),
            Variant::bind(Slot::new(false), false),
        ));
        table.insert(entry(
            Flag::long("name"),
            Variant::bind(Slot::new(String::new()), String::new()),
        ));
        table
    }

    #[rstest]
    #[case("-c", Some(false))]
    #[case("--color", Some(false))]
    #[case("--no-color", Some(true))]
    #[case("--name", Some(false))]
    #[case("--no-name", None)]
    #[case("-n", None)]
    #[case("-cc", None)]
    #[case("color", None)]
    fn looks_up_keys(#[case] key: &str, #[case] negated: Option<bool>) {
        assert_eq!(table().lookup(key).map(|found| found.negated), negated);
    }

    #[test]
    fn bool_literally_named_no_prefix_is_not_negated() {
        let mut table = OptionTable::default();
        table.insert(entry(Flag::long("no-cache"), Variant::bind(Slot::new(false), false)));
        let found = table.lookup("--no-cache").map(|m| m.negated);
        assert_eq!(found, Some(false));
        assert_eq!(table.lookup("--no-no-cache").map(|m| m.negated), Some(true));
    }

    #[test]
    fn redeclaration_shadows_earlier_entry() {
        let mut table = table();
        let replacement = entry(
            Flag::long("name").with_short('n'),
            Variant::bind(Slot::new(0_u8), 0),
        );
        table.insert(Rc::clone(&replacement));
        assert_eq!(table.entries().len(), 2);
        assert!(table.find("name").is_some_and(|found| Rc::ptr_eq(found, &replacement)));
    }

    #[rstest]
    #[case(Flag::long("=x"), false)]
    #[case(Flag::long("-x"), false)]
    #[case(Flag::long(""), false)]
    #[case(Flag::long("a b"), false)]
    #[case(Flag::short('-'), false)]
    #[case(Flag::short(' '), false)]
    #[case(Flag::long("dry-run").with_short('n'), true)]
    #[case(Flag::unnamed().env(["X"]), true)]
    fn validates_names(#[case] flag: Flag, #[case] valid: bool) {
        assert_eq!(flag.validate().is_ok(), valid);
    }

    #[rstest]
    #[case(Flag::long("port").with_short('p'), "-p, --port")]
    #[case(Flag::long("port"), "    --port")]
    #[case(Flag::short('v'), "-v")]
    fn renders_headers(#[case] flag: Flag, #[case] expected: &str) {
        let built = entry(flag, Variant::bind(Slot::new(0_u16), 0));
        assert_eq!(built.header(), expected);
    }
}
