//! `Value` implementations for the built-in kinds.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

use super::{Binding, Kind, Slot, Variant};
use crate::error::ValueError;

/// Types that can be bound to an option or environment variable.
///
/// Implemented for `String`, `bool`, every fixed-width and pointer-sized
/// integer, `f32` and `f64`. The zero value of a kind is its
/// [`Default`].
pub trait Value: Clone + Default + PartialEq + fmt::Display + 'static {
    /// Kind tag for this type.
    const KIND: Kind;

    /// Parses command-line or environment text.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when `text` is malformed or out of range.
    fn parse_text(text: &str) -> Result<Self, ValueError>;

    /// Wraps a typed binding in the matching [`Variant`] arm.
    fn into_variant(binding: Binding<Self>) -> Variant;

    /// Returns the slot held by `variant` when it binds this type.
    fn slot_of(variant: &Variant) -> Option<Slot<Self>>;
}

fn invalid(text: &str, kind: Kind) -> ValueError {
    ValueError::Invalid {
        value: text.to_owned(),
        kind,
    }
}

fn from_int_error(text: &str, kind: Kind, err: &ParseIntError) -> ValueError {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValueError::OutOfRange {
            value: text.to_owned(),
            kind,
        },
        _ => invalid(text, kind),
    }
}

macro_rules! variant_glue {
    ($arm:ident) => {
        fn into_variant(binding: Binding<Self>) -> Variant {
            Variant::$arm(binding)
        }

        fn slot_of(variant: &Variant) -> Option<Slot<Self>> {
            match variant {
                Variant::$arm(binding) => Some(binding.slot().clone()),
                _ => None,
            }
        }
    };
}

macro_rules! integer_value {
    ($($ty:ty => $arm:ident),* $(,)?) => {$(
        impl Value for $ty {
            const KIND: Kind = Kind::$arm;

            fn parse_text(text: &str) -> Result<Self, ValueError> {
                text.parse::<Self>()
                    .map_err(|err| from_int_error(text, Self::KIND, &err))
            }

            variant_glue!($arm);
        }
    )*};
}

integer_value!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

impl Value for String {
    const KIND: Kind = Kind::Str;

    fn parse_text(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_owned())
    }

    variant_glue!(Str);
}

impl Value for bool {
    const KIND: Kind = Kind::Bool;

    fn parse_text(text: &str) -> Result<Self, ValueError> {
        text.parse::<Self>().map_err(|_| invalid(text, Self::KIND))
    }

    variant_glue!(Bool);
}

impl Value for f64 {
    const KIND: Kind = Kind::F64;

    fn parse_text(text: &str) -> Result<Self, ValueError> {
        text.parse::<Self>().map_err(|_| invalid(text, Self::KIND))
    }

    variant_glue!(F64);
}

impl Value for f32 {
    const KIND: Kind = Kind::F32;

    // Finite input that only fits in an f64 overflows to infinity here.
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        let wide = f64::parse_text(text).map_err(|_| invalid(text, Self::KIND))?;
        let narrow = text.parse::<Self>().map_err(|_| invalid(text, Self::KIND))?;
        if narrow.is_infinite() && wide.is_finite() {
            return Err(ValueError::OutOfRange {
                value: text.to_owned(),
                kind: Self::KIND,
            });
        }
        Ok(narrow)
    }

    variant_glue!(F32);
}
