//! Criteria Core - Entity metadata and value types for the criteria query builder.
//!
//! This crate provides the foundational types shared by query construction:
//!
//! - `DataType`: Value types an expression can produce
//! - `Value`: Host values wrapped by literals
//! - `Date`, `Time`, `Timestamp`: Temporal host values
//! - `schema`: Entity metadata (`Entity`, `EntityModel`, `Attribute`)
//! - `Error`: Error types for query construction and execution
//!
//! # Example
//!
//! ```rust
//! use criteria_core::DataType;
//! use criteria_core::schema::EntityBuilder;
//!
//! let person = EntityBuilder::new("Person")
//!     .unwrap()
//!     .required("id", DataType::Int64)
//!     .unwrap()
//!     .attribute("name", DataType::String)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(person.name(), "Person");
//! assert!(person.resolve("name", &DataType::String).is_ok());
//! assert!(person.resolve("name", &DataType::Int32).is_err());
//! ```

#![no_std]

extern crate alloc;

mod error;
pub mod schema;
mod temporal;
mod types;
mod value;

pub use error::{Error, ExecutionError, Result};
pub use num_bigint::BigInt;
pub use rust_decimal::Decimal;
pub use temporal::{Date, Time, Timestamp};
pub use types::DataType;
pub use value::Value;
