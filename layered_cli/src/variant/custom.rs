//! User-defined values and the built-in [`Choice`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use super::Slot;
use crate::error::ValueError;

/// A value with its own text conversion.
///
/// The empty string stands for the zero value: it is what an empty
/// environment variable writes.
pub trait CustomValue {
    /// Current value as text.
    fn get(&self) -> String;

    /// Replaces the value from `text`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when `text` is not acceptable.
    fn set(&mut self, text: &str) -> Result<(), String>;

    /// Extra help text describing accepted values.
    fn explain(&self) -> String {
        String::new()
    }
}

/// Binding for a [`CustomValue`], tracked by text default.
pub struct CustomBinding {
    target: Rc<RefCell<dyn CustomValue>>,
    default: String,
    is_set: Cell<bool>,
}

impl fmt::Debug for CustomBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomBinding")
            .field("current", &self.target.borrow().get())
            .field("default", &self.default)
            .field("is_set", &self.is_set.get())
            .finish()
    }
}

impl CustomBinding {
    /// Binds `target` with a text default.
    #[must_use]
    pub fn new(target: Rc<RefCell<dyn CustomValue>>, default: impl Into<String>) -> Self {
        Self {
            target,
            default: default.into(),
            is_set: Cell::new(false),
        }
    }

    /// Shared handle on the bound value.
    #[must_use]
    pub fn target(&self) -> Rc<RefCell<dyn CustomValue>> {
        Rc::clone(&self.target)
    }

    /// Whether the command line or environment wrote this value.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.is_set.get()
    }

    pub(crate) fn set_from_text(&self, text: &str) -> Result<(), ValueError> {
        self.target
            .borrow_mut()
            .set(text)
            .map_err(|message| ValueError::Rejected {
                value: text.to_owned(),
                message,
            })?;
        self.is_set.set(true);
        Ok(())
    }

    pub(crate) fn apply_default(&self) {
        if self.is_set.get() || self.default.is_empty() {
            return;
        }
        if let Err(message) = self.target.borrow_mut().set(&self.default) {
            warn!(default = %self.default, %message, "custom value rejected its default");
        }
    }

    pub(crate) fn reset_to_zero(&self) {
        if let Err(message) = self.target.borrow_mut().set("") {
            warn!(%message, "custom value rejected the empty value");
        }
        self.is_set.set(true);
    }

    pub(crate) fn default_text(&self) -> Option<String> {
        Some(self.default.clone()).filter(|text| !text.is_empty())
    }

    pub(crate) fn explain(&self) -> String {
        self.target.borrow().explain()
    }
}

/// A text value restricted to a fixed set of choices.
///
/// The empty string and the declared default are always accepted.
///
/// # Examples
///
/// ```
/// use layered_cli::{Choice, CustomValue, Slot};
///
/// let colour = Slot::new(String::new());
/// let mut choice = Choice::new(colour.clone(), ["red", "green"], "red");
/// assert!(choice.set("green").is_ok());
/// assert!(choice.set("blue").is_err());
/// assert_eq!(colour.get(), "green");
/// ```
#[derive(Debug, Clone)]
pub struct Choice {
    value: Slot<String>,
    choices: Vec<String>,
    default: String,
}

impl Choice {
    /// Restricts `value` to `choices`.
    #[must_use]
    pub fn new<I, S>(value: Slot<String>, choices: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value,
            choices: choices.into_iter().map(Into::into).collect(),
            default: default.into(),
        }
    }

    /// Slot receiving the accepted text.
    #[must_use]
    pub const fn value(&self) -> &Slot<String> {
        &self.value
    }

    /// Accepted values, in declaration order.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    fn accepts(&self, text: &str) -> bool {
        text.is_empty() || text == self.default || self.choices.iter().any(|choice| choice == text)
    }
}

impl CustomValue for Choice {
    fn get(&self) -> String {
        self.value.get()
    }

    fn set(&mut self, text: &str) -> Result<(), String> {
        if !self.accepts(text) {
            return Err(format!(
                "'{text}' is not one of: {}",
                self.choices.join(",")
            ));
        }
        self.value.set(text.to_owned());
        Ok(())
    }

    fn explain(&self) -> String {
        format!("(values: {})", self.choices.join(","))
    }
}
