//! Environment layer.
//!
//! Each binding lists variable names from lowest to highest priority. The
//! resolver walks the names in order, so the last variable present wins. An
//! environment file cache is consulted before the process environment.

mod file;

use std::collections::HashMap;
use std::env::VarError;
use std::hash::BuildHasher;
use std::rc::Rc;

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};
use crate::variant::Variant;

/// Source of environment variables.
///
/// The process environment is the usual source; tests and embedders may
/// supply a map instead.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use layered_cli::EnvSource;
///
/// let vars = HashMap::from([("PORT".to_owned(), "8080".to_owned())]);
/// assert_eq!(vars.lookup("PORT").as_deref(), Some("8080"));
/// assert_eq!(vars.lookup("HOST"), None);
/// ```
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when it is not set.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                warn!(variable = name, "ignoring environment variable that is not valid UTF-8");
                None
            }
        }
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A binding from environment variable names to a value.
#[derive(Debug, Clone)]
pub struct EnvBinding {
    names: Vec<String>,
    variant: Rc<Variant>,
    inherited: bool,
}

impl EnvBinding {
    /// Variable names, lowest priority first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Binding written when a variable is found.
    #[must_use]
    pub const fn variant(&self) -> &Rc<Variant> {
        &self.variant
    }

    /// Whether the binding was copied from a parent command.
    #[must_use]
    pub const fn is_inherited(&self) -> bool {
        self.inherited
    }

    fn resolve(&self, cache: &HashMap<String, String>, source: Option<&dyn EnvSource>) -> CliResult<()> {
        for name in &self.names {
            let Some(value) = cache
                .get(name)
                .cloned()
                .or_else(|| source.and_then(|env| env.lookup(name)))
            else {
                continue;
            };
            debug!(variable = %name, "environment variable found");
            if value.is_empty() {
                self.variant.reset_to_zero();
            } else {
                self.variant
                    .set_from_text(&value)
                    .map_err(|err| CliError::type_error(name, err))?;
            }
        }
        self.variant.apply_default();
        Ok(())
    }
}

/// Per-command environment state: bindings and the file cache.
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvResolver {
    cache: HashMap<String, String>,
    bindings: Vec<EnvBinding>,
}

impl EnvResolver {
    pub(crate) fn bind(&mut self, variant: Rc<Variant>, names: Vec<String>) {
        self.bindings.push(EnvBinding {
            names,
            variant,
            inherited: false,
        });
    }

    /// Adopts a parent's binding. It is resolved by the parent only.
    pub(crate) fn inherit(&mut self, binding: &EnvBinding) {
        if self
            .bindings
            .iter()
            .any(|existing| Rc::ptr_eq(&existing.variant, &binding.variant))
        {
            return;
        }
        self.bindings.push(EnvBinding {
            inherited: true,
            ..binding.clone()
        });
    }

    /// Seeds the file cache from a parent command.
    pub(crate) fn adopt_cache(&mut self, parent: &Self) {
        self.cache.clone_from(&parent.cache);
    }

    pub(crate) fn load_file(&mut self, path: &Utf8Path) -> CliResult<()> {
        file::load_into(path, &mut self.cache)
    }

    pub(crate) fn bindings(&self) -> &[EnvBinding] {
        &self.bindings
    }

    pub(crate) fn binding_for(&self, variant: &Rc<Variant>) -> Option<&EnvBinding> {
        self.bindings
            .iter()
            .find(|binding| Rc::ptr_eq(&binding.variant, variant))
    }

    /// Resolves every binding declared on this command, then applies its
    /// default. `source` is `None` when only files are consulted.
    pub(crate) fn resolve(&self, source: Option<&dyn EnvSource>) -> CliResult<()> {
        self.bindings
            .iter()
            .filter(|binding| !binding.inherited)
            .try_for_each(|binding| binding.resolve(&self.cache, source))
    }
}
