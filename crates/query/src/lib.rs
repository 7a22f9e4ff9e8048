//! Criteria Query - Typed, fluent query composition.
//!
//! This crate builds query definitions from typed expression trees:
//!
//! - `ast`: Expression and predicate AST, operator signatures, typed wrappers
//! - `algebra`: Operator algebra provider, one module per operator family
//! - `root`: Entity roots, joins and typed attribute access
//! - `query`: Query definitions and sub-queries
//! - `context`: Composition context binding query, algebra and root
//! - `session`: Execution boundary (session factory, executor, `query`)
//!
//! Ill-typed operator use is a compile error in the typed API and a
//! `TypeMismatch` error in the untyped one ([`ast::Expr::computed`]).

#![no_std]

extern crate alloc;

pub mod algebra;
pub mod ast;
pub mod context;
pub mod query;
pub mod root;
pub mod session;

pub use algebra::Algebra;
pub use ast::{Expression, IntoExpression, Order, ParameterExpression, Predicate, SortOrder};
pub use context::{Combine, Context, Part};
pub use query::{QueryDefinition, Selection, Subquery};
pub use root::{EntityPath, Join, Root};
pub use session::{query, query_all, query_with, Executor, ProvisionOptions, Session, SessionFactory};
