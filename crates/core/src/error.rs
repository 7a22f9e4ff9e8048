//! Error types for query construction.

use crate::types::DataType;
use alloc::boxed::Box;
use alloc::string::String;
use thiserror::Error as ThisError;

/// Result type alias for criteria operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Boxed error raised by an external query executor.
pub type ExecutionError = Box<dyn core::error::Error + Send + Sync>;

/// Errors raised while composing or executing a query.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An operator was applied to operands outside its signature.
    #[error("type mismatch in {operator}: expected {expected}, found {found}")]
    TypeMismatch {
        operator: &'static str,
        expected: String,
        found: DataType,
    },
    /// An operator received the wrong number of operands.
    #[error("{operator} takes {expected} operand(s), got {found}")]
    Arity {
        operator: &'static str,
        expected: &'static str,
        found: usize,
    },
    /// A composition context slot was read before it was bound.
    #[error("composition context has no {slot} bound")]
    Uninitialized { slot: &'static str },
    /// The entity has no attribute with the requested name.
    #[error("attribute {attribute} not found on entity {entity}")]
    AttributeNotFound { entity: String, attribute: String },
    /// The attribute exists but its declared type differs from the requested one.
    #[error("attribute {entity}.{attribute} is declared as {declared}, requested as {requested}")]
    AttributeType {
        entity: String,
        attribute: String,
        declared: DataType,
        requested: DataType,
    },
    /// Invalid entity metadata.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
    /// The executor failed; the source error is carried unchanged.
    #[error("query execution failed: {0}")]
    Execution(#[source] ExecutionError),
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        operator: &'static str,
        expected: impl Into<String>,
        found: DataType,
    ) -> Self {
        Error::TypeMismatch {
            operator,
            expected: expected.into(),
            found,
        }
    }

    /// Creates an arity error.
    pub fn arity(operator: &'static str, expected: &'static str, found: usize) -> Self {
        Error::Arity {
            operator,
            expected,
            found,
        }
    }

    /// Creates an uninitialized-context error.
    pub fn uninitialized(slot: &'static str) -> Self {
        Error::Uninitialized { slot }
    }

    /// Creates an attribute not found error.
    pub fn attribute_not_found(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Error::AttributeNotFound {
            entity: entity.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an attribute type error.
    pub fn attribute_type(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        declared: DataType,
        requested: DataType,
    ) -> Self {
        Error::AttributeType {
            entity: entity.into(),
            attribute: attribute.into(),
            declared,
            requested,
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Wraps an executor failure.
    pub fn execution(source: impl Into<ExecutionError>) -> Self {
        Error::Execution(source.into())
    }

    /// Returns true for construction-time type errors.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. } | Error::Arity { .. })
    }
}
