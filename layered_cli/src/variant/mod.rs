//! Typed value bindings.
//!
//! A [`Variant`] couples a caller-owned [`Slot`] with a default value and an
//! "explicitly set" marker. The parse loop and the environment resolver write
//! through the variant; the caller reads the slot after the run.

mod custom;
mod value;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub use custom::{Choice, CustomBinding, CustomValue};
pub use value::Value;

use crate::error::ValueError;

/// Shared, mutable storage for a bound value.
///
/// Cloning a slot yields another handle onto the same storage, so a value
/// written by the parser is visible through every clone.
///
/// # Examples
///
/// ```
/// use layered_cli::Slot;
///
/// let port = Slot::new(8080_u16);
/// let alias = port.clone();
/// alias.set(9090);
/// assert_eq!(port.get(), 9090);
/// ```
#[derive(Debug, Default)]
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Slot<T> {
    /// Creates a slot holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Overwrites the stored value.
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Replaces the stored value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Runs `f` against a borrow of the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Returns `true` when both handles share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn shared(&self) -> Rc<RefCell<T>> {
        Rc::clone(&self.0)
    }
}

impl<T: Clone> Slot<T> {
    /// Returns a copy of the stored value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

/// Value kinds understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// UTF-8 text.
    Str,
    /// `true` or `false`.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Pointer-sized signed integer.
    Isize,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Pointer-sized unsigned integer.
    Usize,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// User-defined value.
    Custom,
}

impl Kind {
    /// Short lowercase name, as used in messages and help.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Custom => "value",
        }
    }

    /// Whether an empty string is an acceptable explicit value.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Str | Self::Custom)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed slot together with its default and set marker.
#[derive(Debug)]
pub struct Binding<T> {
    slot: Slot<T>,
    default: T,
    is_set: Cell<bool>,
}

impl<T: Value> Binding<T> {
    /// Binds `slot` with `default`.
    #[must_use]
    pub const fn new(slot: Slot<T>, default: T) -> Self {
        Self {
            slot,
            default,
            is_set: Cell::new(false),
        }
    }

    /// Storage written by this binding.
    #[must_use]
    pub const fn slot(&self) -> &Slot<T> {
        &self.slot
    }

    /// Default applied when no layer supplied a value.
    #[must_use]
    pub const fn default_value(&self) -> &T {
        &self.default
    }

    /// Whether the command line or environment wrote this value.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.is_set.get()
    }

    fn set_from_text(&self, text: &str) -> Result<(), ValueError> {
        let parsed = T::parse_text(text)?;
        self.slot.set(parsed);
        self.is_set.set(true);
        Ok(())
    }

    // Leaves a pre-populated slot alone when the default is the zero value.
    fn apply_default(&self) {
        if self.is_set.get() {
            return;
        }
        let zero = T::default();
        if self.default == zero && self.slot.with(|current| *current != zero) {
            return;
        }
        self.slot.set(self.default.clone());
    }

    fn reset_to_zero(&self) {
        self.slot.set(T::default());
        self.is_set.set(true);
    }

    fn default_text(&self) -> Option<String> {
        (self.default != T::default()).then(|| self.default.to_string())
    }
}

/// A type-erased binding, one arm per supported kind.
#[derive(Debug)]
#[non_exhaustive]
pub enum Variant {
    /// Text binding.
    Str(Binding<String>),
    /// Boolean binding.
    Bool(Binding<bool>),
    /// `i8` binding.
    I8(Binding<i8>),
    /// `i16` binding.
    I16(Binding<i16>),
    /// `i32` binding.
    I32(Binding<i32>),
    /// `i64` binding.
    I64(Binding<i64>),
    /// `isize` binding.
    Isize(Binding<isize>),
    /// `u8` binding.
    U8(Binding<u8>),
    /// `u16` binding.
    U16(Binding<u16>),
    /// `u32` binding.
    U32(Binding<u32>),
    /// `u64` binding.
    U64(Binding<u64>),
    /// `usize` binding.
    Usize(Binding<usize>),
    /// `f32` binding.
    F32(Binding<f32>),
    /// `f64` binding.
    F64(Binding<f64>),
    /// User-defined binding.
    Custom(CustomBinding),
}

macro_rules! dispatch {
    ($variant:expr, $binding:ident => $typed:expr, $custom:ident => $other:expr) => {
        match $variant {
            Variant::Str($binding) => $typed,
            Variant::Bool($binding) => $typed,
            Variant::I8($binding) => $typed,
            Variant::I16($binding) => $typed,
            Variant::I32($binding) => $typed,
            Variant::I64($binding) => $typed,
            Variant::Isize($binding) => $typed,
            Variant::U8($binding) => $typed,
            Variant::U16($binding) => $typed,
            Variant::U32($binding) => $typed,
            Variant::U64($binding) => $typed,
            Variant::Usize($binding) => $typed,
            Variant::F32($binding) => $typed,
            Variant::F64($binding) => $typed,
            Variant::Custom($custom) => $other,
        }
    };
}

impl Variant {
    /// Binds `slot` with `default` under the arm matching `T`.
    #[must_use]
    pub fn bind<T: Value>(slot: Slot<T>, default: T) -> Self {
        T::into_variant(Binding::new(slot, default))
    }

    /// Kind of value held.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Str(_) => Kind::Str,
            Self::Bool(_) => Kind::Bool,
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Isize(_) => Kind::Isize,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::Usize(_) => Kind::Usize,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
            Self::Custom(_) => Kind::Custom,
        }
    }

    /// Whether this is a boolean binding.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Whether a layer has explicitly written this binding.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        dispatch!(self, binding => binding.is_set(), custom => custom.is_set())
    }

    /// Parses `text` into the bound slot and marks the binding as set.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `text` does not parse as the bound kind
    /// or a custom value rejects it. The slot is untouched on failure.
    pub fn set_from_text(&self, text: &str) -> Result<(), ValueError> {
        dispatch!(self, binding => binding.set_from_text(text), custom => custom.set_from_text(text))
    }

    /// Writes the default unless the binding was set, or the default is the
    /// zero value and the slot already holds something else.
    ///
    /// Calling this repeatedly has no further effect.
    pub fn apply_default(&self) {
        dispatch!(self, binding => binding.apply_default(), custom => custom.apply_default());
    }

    /// Writes the zero value and marks the binding as set.
    pub fn reset_to_zero(&self) {
        dispatch!(self, binding => binding.reset_to_zero(), custom => custom.reset_to_zero());
    }

    /// Inverts a boolean binding. Other kinds are left untouched.
    pub fn negate(&self) {
        if let Self::Bool(binding) = self {
            binding.slot.set(!binding.slot.get());
        }
    }

    /// Default rendered for help, `None` when it is the zero value.
    #[must_use]
    pub fn default_text(&self) -> Option<String> {
        dispatch!(self, binding => binding.default_text(), custom => custom.default_text())
    }

    /// Extra explanation supplied by a custom value, if any.
    #[must_use]
    pub fn explain(&self) -> Option<String> {
        match self {
            Self::Custom(custom) => Some(custom.explain()).filter(|text| !text.is_empty()),
            _ => None,
        }
    }
}
