//! Element types that storage engines hold natively.
//!
//! Each [`Element`] is the authoritative representation of one
//! [`ValueType`]: storing and loading it is exact. Conversion to and from
//! the other kinds always goes through [`Value`], the shared routine.
//!
//! | ValueType    | Element   | Default  |
//! |--------------|-----------|----------|
//! | `BOOLEAN`    | `bool`    | `false`  |
//! | `BYTE`       | `i8`      | `0`      |
//! | `SHORT`      | `i16`     | `0`      |
//! | `CHAR`       | `char`    | `'\0'`   |
//! | `INT`        | `i32`     | `0`      |
//! | `LONG`       | `i64`     | `0`      |
//! | `FLOAT`      | `f32`     | `0.0`    |
//! | `DOUBLE`     | `f64`     | `0.0`    |
//! | `BIGINTEGER` | `BigInt`  | `0`      |
//! | `OBJECT`     | `Value`   | `Null`   |
//! | `STRING`     | `String`  | `""`     |

use crate::error::MatrixResult;
use crate::types::ValueType;
use crate::value::Value;
use num_bigint::BigInt;
use std::fmt::Debug;

/// A type a matrix can store natively.
pub trait Element: Clone + Default + PartialEq + Debug + Send + Sync + 'static {
    /// The value type this element is authoritative for.
    const VALUE_TYPE: ValueType;

    fn to_value(&self) -> Value;

    /// Convert through the shared routine, validating representability.
    fn from_value(value: &Value) -> MatrixResult<Self>;

    /// Whether this is the type's zero/default value.
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

macro_rules! primitive_element {
    ($($ty:ty => $vt:ident, $variant:ident, $conv:ident);* $(;)?) => {
        $(
            impl Element for $ty {
                const VALUE_TYPE: ValueType = ValueType::$vt;

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: &Value) -> MatrixResult<Self> {
                    value.$conv()
                }
            }
        )*
    };
}

primitive_element! {
    bool => Boolean, Boolean, to_bool;
    i8 => Byte, Byte, to_i8;
    i16 => Short, Short, to_i16;
    char => Char, Char, to_char;
    i32 => Int, Int, to_i32;
    i64 => Long, Long, to_i64;
    f32 => Float, Float, to_f32;
    f64 => Double, Double, to_f64;
}

impl Element for BigInt {
    const VALUE_TYPE: ValueType = ValueType::BigInteger;

    fn to_value(&self) -> Value {
        Value::BigInteger(self.clone())
    }

    fn from_value(value: &Value) -> MatrixResult<Self> {
        value.to_big_integer()
    }
}

impl Element for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> MatrixResult<Self> {
        Ok(value.to_text())
    }
}

/// Object matrices hold any value as-is.
impl Element for Value {
    const VALUE_TYPE: ValueType = ValueType::Object;

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> MatrixResult<Self> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(0.0f64.is_default());
        assert!(!1.0f64.is_default());
        assert!('\0'.is_default());
        assert!(String::new().is_default());
        assert!(Value::Null.is_default());
        assert!(!Value::Int(0).is_default());
        assert!(BigInt::from(0).is_default());
        assert!(!true.is_default());
    }

    #[test]
    fn test_authoritative_round_trip() {
        assert_eq!(i16::from_value(&(-5i16).to_value()).unwrap(), -5);
        assert_eq!(char::from_value(&'q'.to_value()).unwrap(), 'q');
        assert_eq!(f32::from_value(&1.25f32.to_value()).unwrap(), 1.25);
        let big: BigInt = BigInt::from(i64::MAX) * 4;
        assert_eq!(BigInt::from_value(&big.to_value()).unwrap(), big);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(<i8 as Element>::VALUE_TYPE, ValueType::Byte);
        assert_eq!(<Value as Element>::VALUE_TYPE, ValueType::Object);
        assert_eq!(<String as Element>::VALUE_TYPE, ValueType::String);
    }

    #[test]
    fn test_int_from_nan_is_rejected() {
        assert!(i32::from_value(&Value::Double(f64::NAN))
            .unwrap_err()
            .is_type_validation());
        assert!(f64::from_value(&Value::Double(f64::NAN)).unwrap().is_nan());
    }
}
