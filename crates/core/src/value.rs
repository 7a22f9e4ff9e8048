//! Value type definitions for criteria literals.
//!
//! This module defines the `Value` enum which holds the host value wrapped by
//! a literal expression.

use crate::temporal::{Date, Time, Timestamp};
use crate::types::DataType;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use num_bigint::BigInt;
use rust_decimal::Decimal;

/// A host value carried by a literal.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 32-bit floating point
    Float32(f32),
    /// 64-bit floating point
    Float64(f64),
    /// Arbitrary precision decimal
    BigDecimal(Decimal),
    /// Arbitrary precision integer
    BigInteger(BigInt),
    /// Single character
    Char(char),
    /// UTF-8 string
    String(String),
    /// Calendar date
    Date(Date),
    /// Time of day
    Time(Time),
    /// Date and time
    Timestamp(Timestamp),
    /// Binary data
    Bytes(Vec<u8>),
    /// In-memory collection
    List(Vec<Value>),
}

impl Value {
    /// Returns the data type of this value, or None if it's Null.
    ///
    /// A list reports the type of its first non-null element; an empty list
    /// has no inferable type.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float32(_) => Some(DataType::Float32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::BigDecimal(_) => Some(DataType::BigDecimal),
            Value::BigInteger(_) => Some(DataType::BigInteger),
            Value::Char(_) => Some(DataType::Char),
            Value::String(_) => Some(DataType::String),
            Value::Date(_) => Some(DataType::Date),
            Value::Time(_) => Some(DataType::Time),
            Value::Timestamp(_) => Some(DataType::Timestamp),
            Value::Bytes(_) => Some(DataType::Bytes),
            Value::List(items) => items
                .iter()
                .find_map(Value::data_type)
                .map(DataType::collection_of),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the i32 value if this is an Int32, None otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i64 value if this is an Int64, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            // NaN literals compare equal to each other
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits() || a == b,
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits() || a == b,
            (Value::BigDecimal(a), Value::BigDecimal(b)) => a == b,
            (Value::BigInteger(a), Value::BigInteger(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int32(i) => i.hash(state),
            Value::Int64(i) => i.hash(state),
            Value::Float32(f) => f.to_bits().hash(state),
            Value::Float64(f) => f.to_bits().hash(state),
            Value::BigDecimal(d) => d.hash(state),
            Value::BigInteger(i) => i.hash(state),
            Value::Char(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Timestamp(t) => t.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::List(items) => items.hash(state),
        }
    }
}

macro_rules! value_from {
    ($($host:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$host> for Value {
                fn from(v: $host) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => BigDecimal,
    BigInt => BigInteger,
    char => Char,
    String => String,
    Date => Date,
    Time => Time,
    Timestamp => Timestamp,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Int64(42).data_type(), Some(DataType::Int64));
        assert_eq!(Value::Char('x').data_type(), Some(DataType::Char));
        assert_eq!(
            Value::Date(Date::from_days(3)).data_type(),
            Some(DataType::Date)
        );
    }

    #[test]
    fn test_value_null() {
        let v = Value::Null;
        assert_eq!(v.data_type(), None);
        assert!(v.is_null());
    }

    #[test]
    fn test_list_type_skips_nulls() {
        let list = Value::List(vec![Value::Null, Value::Int32(1)]);
        assert_eq!(
            list.data_type(),
            Some(DataType::collection_of(DataType::Int32))
        );
        assert_eq!(Value::List(vec![]).data_type(), None);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Int32(42), Value::Int32(42));
        assert_ne!(Value::Int32(42), Value::Int64(42));
        assert_eq!(Value::Float64(f64::NAN), Value::Float64(f64::NAN));
        assert_eq!(
            Value::BigDecimal(Decimal::new(150, 2)),
            Value::BigDecimal(Decimal::new(15, 1))
        );
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = 42i32.into();
        assert_eq!(v.as_i32(), Some(42));

        let v: Value = "hello".into();
        assert_eq!(v.as_str(), Some("hello"));

        let v: Value = Some(100i64).into();
        assert_eq!(v.as_i64(), Some(100));

        let v: Value = None::<i32>.into();
        assert!(v.is_null());
    }
}
