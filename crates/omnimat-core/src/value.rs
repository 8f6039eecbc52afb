//! Dynamic cell values and the shared conversion routine.
//!
//! [`Value`] is the single hub every non-authoritative accessor converts
//! through, so converting a `char` to `f64` and back behaves the same for
//! every matrix implementation.
//!
//! # Conversion rules
//!
//! - Integral targets (`BYTE`, `SHORT`, `INT`, `LONG`, `BOOLEAN`, `CHAR`,
//!   `BIGINTEGER`) reject NaN and infinities, truncate finite fractions toward
//!   zero and reject out-of-range values instead of wrapping.
//! - Floating targets accept any IEEE-754 value unchanged.
//! - Booleans map to 1/0, chars to their Unicode scalar value.
//! - Text parses as an integer first, then as a float. Empty text and
//!   [`Value::Null`] convert to the target's default. A `CHAR` target takes
//!   one-character text literally.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::Value;
//!
//! assert_eq!(Value::Char('A').to_f64().unwrap(), 65.0);
//! assert_eq!(Value::Double(65.9).to_char().unwrap(), 'A');
//! assert!(Value::Double(f64::NAN).to_i32().is_err());
//! assert_eq!(Value::from("42").to_i64().unwrap(), 42);
//! ```

use crate::error::{MatrixResult, ValidationError};
use crate::types::ValueType;
use num_bigint::BigInt;
use scirs2_core::numeric::{FromPrimitive, ToPrimitive};
use std::fmt;

/// A single cell value of any supported kind.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    String(String),
}

// 2^63 as f64; anything at or above it does not fit in i64.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn finite_to_i64(value: f64, target: ValueType) -> MatrixResult<i64> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { value, target }.into());
    }
    let truncated = value.trunc();
    if truncated < -I64_UPPER || truncated >= I64_UPPER {
        return Err(ValidationError::OutOfRange {
            value: value.to_string(),
            target,
        }
        .into());
    }
    Ok(truncated as i64)
}

fn narrow<T: TryFrom<i64>>(value: i64, target: ValueType) -> MatrixResult<T> {
    T::try_from(value).map_err(|_| {
        ValidationError::OutOfRange {
            value: value.to_string(),
            target,
        }
        .into()
    })
}

fn unparseable(text: &str, target: ValueType) -> ValidationError {
    ValidationError::Unparseable {
        text: text.to_string(),
        target,
    }
}

impl Value {
    /// Value type this variant naturally belongs to; `Null` is an object.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Object,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Byte(_) => ValueType::Byte,
            Value::Short(_) => ValueType::Short,
            Value::Char(_) => ValueType::Char,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::BigInteger(_) => ValueType::BigInteger,
            Value::String(_) => ValueType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to `f64`. Never fails for numeric variants.
    pub fn to_f64(&self) -> MatrixResult<f64> {
        Ok(match self {
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Byte(v) => f64::from(*v),
            Value::Short(v) => f64::from(*v),
            Value::Char(c) => f64::from(*c as u32),
            Value::Int(v) => f64::from(*v),
            Value::Long(v) => *v as f64,
            Value::Float(v) => f64::from(*v),
            Value::Double(v) => *v,
            Value::BigInteger(v) => v.to_f64().unwrap_or(f64::NAN),
            Value::String(s) => {
                let text = s.trim();
                if text.is_empty() {
                    0.0
                } else {
                    text.parse::<f64>()
                        .map_err(|_| unparseable(s, ValueType::Double))?
                }
            }
        })
    }

    /// Convert to `f32` through `f64`; overflow rounds to an infinity.
    pub fn to_f32(&self) -> MatrixResult<f32> {
        Ok(self.to_f64()? as f32)
    }

    fn integral(&self, target: ValueType) -> MatrixResult<i64> {
        match self {
            Value::Null => Ok(0),
            Value::Boolean(b) => Ok(i64::from(*b)),
            Value::Byte(v) => Ok(i64::from(*v)),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Char(c) => Ok(i64::from(*c as u32)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Long(v) => Ok(*v),
            Value::Float(v) => finite_to_i64(f64::from(*v), target),
            Value::Double(v) => finite_to_i64(*v, target),
            Value::BigInteger(v) => v.to_i64().ok_or_else(|| {
                ValidationError::OutOfRange {
                    value: v.to_string(),
                    target,
                }
                .into()
            }),
            Value::String(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return Ok(0);
                }
                if let Ok(v) = text.parse::<i64>() {
                    return Ok(v);
                }
                match text.parse::<f64>() {
                    Ok(v) => finite_to_i64(v, target),
                    Err(_) => Err(unparseable(s, target).into()),
                }
            }
        }
    }

    pub fn to_i64(&self) -> MatrixResult<i64> {
        self.integral(ValueType::Long)
    }

    pub fn to_i32(&self) -> MatrixResult<i32> {
        narrow(self.integral(ValueType::Int)?, ValueType::Int)
    }

    pub fn to_i16(&self) -> MatrixResult<i16> {
        narrow(self.integral(ValueType::Short)?, ValueType::Short)
    }

    pub fn to_i8(&self) -> MatrixResult<i8> {
        narrow(self.integral(ValueType::Byte)?, ValueType::Byte)
    }

    /// Convert to `bool`: non-zero is `true`, text may also be `true`/`false`.
    pub fn to_bool(&self) -> MatrixResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Float(v) => Self::finite_truth(f64::from(*v)),
            Value::Double(v) => Self::finite_truth(*v),
            Value::BigInteger(v) => Ok(v.sign() != num_bigint::Sign::NoSign),
            Value::String(s) => {
                let text = s.trim();
                if text.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    match text.parse::<f64>() {
                        Ok(v) => Self::finite_truth(v),
                        Err(_) if text.is_empty() => Ok(false),
                        Err(_) => Err(unparseable(s, ValueType::Boolean).into()),
                    }
                }
            }
            other => Ok(other.integral(ValueType::Boolean)? != 0),
        }
    }

    fn finite_truth(value: f64) -> MatrixResult<bool> {
        if value.is_finite() {
            Ok(value != 0.0)
        } else {
            Err(ValidationError::NonFinite {
                value,
                target: ValueType::Boolean,
            }
            .into())
        }
    }

    /// Convert to `char`; numbers are read as Unicode scalar values.
    ///
    /// A one-character text is that character, so `'5'` survives a trip
    /// through its text form. Longer numeric text is a code point.
    pub fn to_char(&self) -> MatrixResult<char> {
        match self {
            Value::Char(c) => Ok(*c),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => Ok('\0'),
                    (Some(c), None) => Ok(c),
                    _ => Self::char_from_code(self.integral(ValueType::Char)?),
                }
            }
            other => Self::char_from_code(other.integral(ValueType::Char)?),
        }
    }

    fn char_from_code(code: i64) -> MatrixResult<char> {
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ValidationError::InvalidChar { code }.into())
    }

    pub fn to_big_integer(&self) -> MatrixResult<BigInt> {
        match self {
            Value::BigInteger(v) => Ok(v.clone()),
            Value::Float(v) => Self::big_from_f64(f64::from(*v)),
            Value::Double(v) => Self::big_from_f64(*v),
            Value::String(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return Ok(BigInt::from(0));
                }
                if let Ok(v) = text.parse::<BigInt>() {
                    return Ok(v);
                }
                match text.parse::<f64>() {
                    Ok(v) => Self::big_from_f64(v),
                    Err(_) => Err(unparseable(s, ValueType::BigInteger).into()),
                }
            }
            other => Ok(BigInt::from(other.integral(ValueType::BigInteger)?)),
        }
    }

    fn big_from_f64(value: f64) -> MatrixResult<BigInt> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                value,
                target: ValueType::BigInteger,
            }
            .into());
        }
        BigInt::from_f64(value.trunc()).ok_or_else(|| {
            ValidationError::OutOfRange {
                value: value.to_string(),
                target: ValueType::BigInteger,
            }
            .into()
        })
    }

    /// Text form; `Null` renders as the empty string.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Convert to the representation of `target` through the same rules
    /// the typed accessors use.
    pub fn convert_to(&self, target: ValueType) -> MatrixResult<Value> {
        Ok(match target {
            ValueType::Boolean => Value::Boolean(self.to_bool()?),
            ValueType::Byte => Value::Byte(self.to_i8()?),
            ValueType::Short => Value::Short(self.to_i16()?),
            ValueType::Char => Value::Char(self.to_char()?),
            ValueType::Int => Value::Int(self.to_i32()?),
            ValueType::Long => Value::Long(self.to_i64()?),
            ValueType::Float => Value::Float(self.to_f32()?),
            ValueType::Double => Value::Double(self.to_f64()?),
            ValueType::BigInteger => Value::BigInteger(self.to_big_integer()?),
            ValueType::Object => self.clone(),
            ValueType::String => Value::String(self.to_text()),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::BigInteger(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    char => Char,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => BigInteger,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
