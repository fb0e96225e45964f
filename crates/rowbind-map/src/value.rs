//! Value coercion from raw cell text into primitive fields.
//!
//! Two layers share one parsing path:
//!
//! - [`coerce`] takes a runtime [`ValueKind`] and produces a [`Value`]. It is
//!   used by dynamic bindings and by anything that only knows the kind at
//!   runtime.
//! - [`Coerce`] is implemented for the concrete field types (`i8`..`u64`,
//!   `f32`, `f64`, `String` and `Option` of each) and writes straight into
//!   the field.
//!
//! An optional target receives nothing for an empty cell: the field keeps
//! its current (default) state and no parsing is attempted.

use std::fmt;

use crate::error::CoerceError;

/// Primitive target types the coercer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
}

impl PrimitiveKind {
    /// Returns the Rust type name for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "String",
        }
    }

    /// Bit width for numeric kinds, `None` for strings.
    pub fn bits(self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::I64 | Self::U64 | Self::F64 => Some(64),
            Self::Str => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Static shape of a coerced field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A plain primitive field.
    Scalar(PrimitiveKind),
    /// An `Option` around a primitive; empty cells leave it untouched.
    Optional(PrimitiveKind),
    /// Anything else. Only valid when a transform owns the field.
    Unsupported(&'static str),
}

impl ValueKind {
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Optional(kind) => write!(f, "Option<{kind}>"),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// A coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// An optional target received an empty cell.
    Absent,
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Converts one raw cell into a value of the given kind.
///
/// Integers are parsed as base-10 and must fit the kind's width. Floats
/// accept decimal and scientific notation. Strings are copied unchanged.
pub fn coerce(raw: &str, kind: ValueKind) -> Result<Value, CoerceError> {
    match kind {
        ValueKind::Scalar(kind) => coerce_scalar(raw, kind),
        ValueKind::Optional(_) if raw.is_empty() => Ok(Value::Absent),
        ValueKind::Optional(kind) => coerce_scalar(raw, kind),
        ValueKind::Unsupported(type_name) => Err(CoerceError::Unsupported { type_name }),
    }
}

fn coerce_scalar(raw: &str, kind: PrimitiveKind) -> Result<Value, CoerceError> {
    let value = match kind {
        PrimitiveKind::I8 => Value::Int(i8::parse_raw(raw)?.into()),
        PrimitiveKind::I16 => Value::Int(i16::parse_raw(raw)?.into()),
        PrimitiveKind::I32 => Value::Int(i32::parse_raw(raw)?.into()),
        PrimitiveKind::I64 => Value::Int(i64::parse_raw(raw)?),
        PrimitiveKind::U8 => Value::UInt(u8::parse_raw(raw)?.into()),
        PrimitiveKind::U16 => Value::UInt(u16::parse_raw(raw)?.into()),
        PrimitiveKind::U32 => Value::UInt(u32::parse_raw(raw)?.into()),
        PrimitiveKind::U64 => Value::UInt(u64::parse_raw(raw)?),
        PrimitiveKind::F32 => Value::Float(f32::parse_raw(raw)?.into()),
        PrimitiveKind::F64 => Value::Float(f64::parse_raw(raw)?),
        PrimitiveKind::Str => Value::Str(String::parse_raw(raw)?),
    };
    Ok(value)
}

/// A primitive that can be parsed from a raw cell.
pub trait Scalar: Sized {
    const KIND: PrimitiveKind;

    fn parse_raw(raw: &str) -> Result<Self, CoerceError>;
}

macro_rules! impl_scalar_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn parse_raw(raw: &str) -> Result<Self, CoerceError> {
                raw.parse().map_err(|source| CoerceError::Int {
                    kind: <Self as Scalar>::KIND,
                    source,
                })
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn parse_raw(raw: &str) -> Result<Self, CoerceError> {
                let kind = <Self as Scalar>::KIND;
                let value: Self = raw
                    .parse()
                    .map_err(|source| CoerceError::Float { kind, source })?;
                if value.is_infinite() && !is_infinity_literal(raw) {
                    return Err(CoerceError::FloatRange { kind });
                }
                Ok(value)
            }
        }
    )*};
}

/// True for the spellings std parses as infinity (`inf`, `+Infinity`, ...).
fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl_scalar_int!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
impl_scalar_int!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);
impl_scalar_float!(f32 => F32, f64 => F64);

impl Scalar for String {
    const KIND: PrimitiveKind = PrimitiveKind::Str;

    fn parse_raw(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_owned())
    }
}

/// A field type that a binding can write a raw cell into.
pub trait Coerce {
    const KIND: ValueKind;

    fn assign(slot: &mut Self, raw: &str) -> Result<(), CoerceError>;
}

fn assign_scalar<V: Scalar>(slot: &mut V, raw: &str) -> Result<(), CoerceError> {
    *slot = V::parse_raw(raw)?;
    Ok(())
}

fn assign_optional<V: Scalar>(slot: &mut Option<V>, raw: &str) -> Result<(), CoerceError> {
    if raw.is_empty() {
        return Ok(());
    }
    *slot = Some(V::parse_raw(raw)?);
    Ok(())
}

macro_rules! impl_coerce {
    ($($ty:ty),* $(,)?) => {$(
        impl Coerce for $ty {
            const KIND: ValueKind = ValueKind::Scalar(<$ty as Scalar>::KIND);

            fn assign(slot: &mut Self, raw: &str) -> Result<(), CoerceError> {
                assign_scalar(slot, raw)
            }
        }

        impl Coerce for Option<$ty> {
            const KIND: ValueKind = ValueKind::Optional(<$ty as Scalar>::KIND);

            fn assign(slot: &mut Self, raw: &str) -> Result<(), CoerceError> {
                assign_optional(slot, raw)
            }
        }
    )*};
}

impl_coerce!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);

#[cfg(test)]
mod tests {
    use std::num::IntErrorKind;

    use super::*;

    #[test]
    fn test_integer_width_is_enforced() {
        let err = coerce("512", ValueKind::Scalar(PrimitiveKind::I8)).unwrap_err();
        match err {
            CoerceError::Int { kind, source } => {
                assert_eq!(kind, PrimitiveKind::I8);
                assert_eq!(source.kind(), &IntErrorKind::PosOverflow);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            coerce("30", ValueKind::Scalar(PrimitiveKind::I8)).unwrap(),
            Value::Int(30)
        );
        assert_eq!(
            coerce("-128", ValueKind::Scalar(PrimitiveKind::I8)).unwrap(),
            Value::Int(-128)
        );
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert!(coerce("-1", ValueKind::Scalar(PrimitiveKind::U32)).is_err());
        assert_eq!(
            coerce("65535", ValueKind::Scalar(PrimitiveKind::U16)).unwrap(),
            Value::UInt(65535)
        );
        assert!(coerce("65536", ValueKind::Scalar(PrimitiveKind::U16)).is_err());
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(coerce("abc", ValueKind::Scalar(PrimitiveKind::I64)).is_err());
        assert!(coerce("1.5", ValueKind::Scalar(PrimitiveKind::I64)).is_err());
        assert!(coerce("", ValueKind::Scalar(PrimitiveKind::I64)).is_err());
    }

    #[test]
    fn test_float_accepts_scientific_notation() {
        assert_eq!(
            coerce("1.5E-3", ValueKind::Scalar(PrimitiveKind::F64)).unwrap(),
            Value::Float(0.0015)
        );
        assert_eq!(
            coerce("-45.25", ValueKind::Scalar(PrimitiveKind::F32)).unwrap(),
            Value::Float(-45.25)
        );
        assert!(matches!(
            coerce("12.34.56", ValueKind::Scalar(PrimitiveKind::F64)),
            Err(CoerceError::Float { .. })
        ));
    }

    #[test]
    fn test_float_overflow_is_out_of_range() {
        assert_eq!(
            coerce("1e400", ValueKind::Scalar(PrimitiveKind::F64)),
            Err(CoerceError::FloatRange {
                kind: PrimitiveKind::F64
            })
        );
        assert_eq!(
            coerce("-1e40", ValueKind::Optional(PrimitiveKind::F32)),
            Err(CoerceError::FloatRange {
                kind: PrimitiveKind::F32
            })
        );
        assert_eq!(
            CoerceError::FloatRange {
                kind: PrimitiveKind::F64
            }
            .to_string(),
            "invalid f64 value: value out of range"
        );

        // Explicit infinity literals are still accepted.
        assert_eq!(
            coerce("-inf", ValueKind::Scalar(PrimitiveKind::F64)).unwrap(),
            Value::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            coerce("Infinity", ValueKind::Scalar(PrimitiveKind::F32)).unwrap(),
            Value::Float(f64::INFINITY)
        );
        assert_eq!(
            coerce("1e308", ValueKind::Scalar(PrimitiveKind::F64)).unwrap(),
            Value::Float(1e308)
        );
    }

    #[test]
    fn test_string_is_copied_unchanged() {
        assert_eq!(
            coerce("  padded ", ValueKind::Scalar(PrimitiveKind::Str)).unwrap(),
            Value::Str("  padded ".to_string())
        );
        assert_eq!(
            coerce("", ValueKind::Scalar(PrimitiveKind::Str)).unwrap(),
            Value::Str(String::new())
        );
    }

    #[test]
    fn test_optional_empty_is_absent() {
        assert_eq!(
            coerce("", ValueKind::Optional(PrimitiveKind::I32)).unwrap(),
            Value::Absent
        );
        assert_eq!(
            coerce("7", ValueKind::Optional(PrimitiveKind::I32)).unwrap(),
            Value::Int(7)
        );
        assert!(coerce("x", ValueKind::Optional(PrimitiveKind::I32)).is_err());
    }

    #[test]
    fn test_unsupported_kind() {
        let err = coerce("a;b", ValueKind::Unsupported("Vec<String>")).unwrap_err();
        assert_eq!(
            err,
            CoerceError::Unsupported {
                type_name: "Vec<String>"
            }
        );
    }

    #[test]
    fn test_assign_optional_leaves_field_on_empty() {
        let mut slot: Option<String> = Some("kept".to_string());
        <Option<String> as Coerce>::assign(&mut slot, "").unwrap();
        assert_eq!(slot.as_deref(), Some("kept"));

        let mut slot: Option<u16> = None;
        <Option<u16> as Coerce>::assign(&mut slot, "8080").unwrap();
        assert_eq!(slot, Some(8080));
    }

    #[test]
    fn test_assign_scalar_keeps_old_value_on_error() {
        let mut slot: i16 = 5;
        assert!(<i16 as Coerce>::assign(&mut slot, "70000").is_err());
        assert_eq!(slot, 5);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(<Option<u8> as Coerce>::KIND.to_string(), "Option<u8>");
        assert_eq!(<String as Coerce>::KIND.to_string(), "String");
        assert_eq!(PrimitiveKind::F32.bits(), Some(32));
        assert_eq!(PrimitiveKind::Str.bits(), None);
    }
}
