//! AST module for query expressions and predicates.

mod display;
mod expr;
pub mod signature;
mod typed;

pub use expr::{
    AggregateFunc, CaseBranch, ColumnRef, Expr, JoinStep, Operator, Order, ParameterRef,
    PathSource, SortOrder, SubqueryDef, TrimSpec,
};
pub use typed::{
    Comparable, Expression, IntoExpression, LiteralValue, Numeric, ParameterExpression, Predicate,
    SqlType,
};
