//! Positional operand declarations.

use std::fmt;

/// How many values an operand takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value.
    Required,
    /// Zero or one value.
    Optional,
    /// Any number of values.
    Repeating,
}

impl Arity {
    /// Parses the compact markers `""`, `"?"` and `"*"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_cli::Arity;
    ///
    /// assert_eq!(Arity::from_marker("?"), Some(Arity::Optional));
    /// assert_eq!(Arity::from_marker("+"), None);
    /// ```
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "" => Some(Self::Required),
            "?" => Some(Self::Optional),
            "*" => Some(Self::Repeating),
            _ => None,
        }
    }
}

/// A named positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    name: String,
    arity: Arity,
}

impl Operand {
    pub(crate) const fn new(name: String, arity: Arity) -> Self {
        Self { name, arity }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::Required => write!(f, "{}", self.name),
            Arity::Optional => write!(f, "[{}]", self.name),
            Arity::Repeating => write!(f, "[{}...]", self.name),
        }
    }
}

/// Required count and maximum count, `None` when a repeating operand
/// makes the maximum unbounded.
pub(crate) fn bounds(operands: &[Operand]) -> (usize, Option<usize>) {
    let required = operands
        .iter()
        .filter(|operand| operand.arity == Arity::Required)
        .count();
    let unbounded = operands
        .iter()
        .any(|operand| operand.arity == Arity::Repeating);
    (required, (!unbounded).then_some(operands.len()))
}
