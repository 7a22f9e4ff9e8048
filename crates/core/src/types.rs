//! Data type definitions for criteria expressions.
//!
//! Every expression node carries a `DataType`; operators check their operand
//! types against it when the node is built.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// Value types an expression can produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point number
    Float32,
    /// 64-bit floating point number
    Float64,
    /// Arbitrary precision decimal
    BigDecimal,
    /// Arbitrary precision integer
    BigInteger,
    /// Single character
    Char,
    /// UTF-8 string
    String,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    Timestamp,
    /// Binary data
    Bytes,
    /// Collection of values of the element type
    Collection(Box<DataType>),
    /// Reference to a mapped entity, by entity name
    Entity(String),
}

impl DataType {
    /// Creates a collection type with the given element type.
    pub fn collection_of(element: DataType) -> Self {
        DataType::Collection(Box::new(element))
    }

    /// Returns whether this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int32
                | DataType::Int64
                | DataType::BigInteger
                | DataType::Float32
                | DataType::Float64
                | DataType::BigDecimal
        )
    }

    /// Returns whether this type is an integral number.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            DataType::Int32 | DataType::Int64 | DataType::BigInteger
        )
    }

    /// Returns whether this type is a date, time or timestamp.
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Time | DataType::Timestamp)
    }

    /// Returns whether values of this type have a total order.
    pub fn is_comparable(&self) -> bool {
        self.is_numeric()
            || self.is_temporal()
            || matches!(self, DataType::Boolean | DataType::Char | DataType::String)
    }

    /// Returns the element type if this is a collection.
    pub fn element_type(&self) -> Option<&DataType> {
        match self {
            DataType::Collection(element) => Some(element),
            _ => None,
        }
    }

    /// Returns whether values of the two types may be compared for equality.
    ///
    /// Identical types are compatible, as are any two numeric types.
    /// Collections are compatible when their element types are.
    pub fn is_compatible(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::Collection(a), DataType::Collection(b)) => a.is_compatible(b),
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => f.write_str("Boolean"),
            DataType::Int32 => f.write_str("Int32"),
            DataType::Int64 => f.write_str("Int64"),
            DataType::Float32 => f.write_str("Float32"),
            DataType::Float64 => f.write_str("Float64"),
            DataType::BigDecimal => f.write_str("BigDecimal"),
            DataType::BigInteger => f.write_str("BigInteger"),
            DataType::Char => f.write_str("Char"),
            DataType::String => f.write_str("String"),
            DataType::Date => f.write_str("Date"),
            DataType::Time => f.write_str("Time"),
            DataType::Timestamp => f.write_str("Timestamp"),
            DataType::Bytes => f.write_str("Bytes"),
            DataType::Collection(element) => write!(f, "Collection<{}>", element),
            DataType::Entity(name) => write!(f, "Entity<{}>", name),
        }
    }
}
