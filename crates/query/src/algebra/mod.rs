//! Operator algebra.
//!
//! [`Algebra`] is the expression factory handed out by a session. Every
//! operator family lives in its own module as an `impl Algebra` block; all of
//! them construct new [`Expression`] nodes from existing ones and never mutate
//! their operands.
//!
//! Operands are accepted as `impl IntoExpression<V>`, so a literal host value
//! and an expression of the same type can be used interchangeably:
//!
//! ```rust
//! use criteria_query::algebra::Algebra;
//! use criteria_query::ast::Expression;
//!
//! let cb = Algebra::new();
//! let age = Expression::literal(41i32);
//! let a = cb.gt(&age, 5);
//! let b = cb.gt(&age, &age);
//! assert_eq!(a.data_type(), b.data_type());
//! ```

mod aggregate;
mod arithmetic;
mod boolean;
mod collection;
mod comparison;
mod conditional;
mod string;
mod subquery;
mod temporal;
mod treat;

pub use conditional::{Case, Coalesce, In, SimpleCase};
pub use treat::Treatable;

use crate::ast::{
    Expr, Expression, IntoExpression, LiteralValue, Operator, Order, ParameterExpression,
    Predicate, SortOrder, SqlType,
};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use criteria_core::DataType;

/// Factory for expressions, predicates and orderings.
///
/// The only state is the parameter counter, so an `Algebra` is cheap to
/// create. It is not `Sync`: one provider serves one query-building session.
#[derive(Debug, Default)]
pub struct Algebra {
    next_parameter: Cell<u32>,
}

impl Algebra {
    /// Creates a new algebra provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a host value as a literal expression.
    pub fn literal<V: LiteralValue>(&self, value: V) -> Expression<V> {
        Expression::literal(value)
    }

    /// Creates a null literal of type `V`.
    ///
    /// The type witness is the generic parameter: `cb.null_literal::<String>()`.
    pub fn null_literal<V: SqlType>(&self) -> Expression<V> {
        Expression::from_expr(Expr::null(V::data_type()))
    }

    /// Creates a positional parameter.
    pub fn parameter<V: SqlType>(&self) -> ParameterExpression<V> {
        ParameterExpression::new(self.allocate_parameter(), None)
    }

    /// Creates a named parameter.
    pub fn named_parameter<V: SqlType>(&self, name: impl Into<String>) -> ParameterExpression<V> {
        ParameterExpression::new(self.allocate_parameter(), Some(name.into()))
    }

    fn allocate_parameter(&self) -> u32 {
        let id = self.next_parameter.get();
        self.next_parameter.set(id + 1);
        id
    }

    /// Ascending order on `x`.
    pub fn asc<V>(&self, x: impl IntoExpression<V>) -> Order {
        Order::new(x.into_expression().into_expr(), SortOrder::Asc)
    }

    /// Descending order on `x`.
    pub fn desc<V>(&self, x: impl IntoExpression<V>) -> Order {
        Order::new(x.into_expression().into_expr(), SortOrder::Desc)
    }

    /// Calls a database function returning `R`.
    ///
    /// Arguments are not checked; the function is opaque to this layer.
    pub fn function<R: SqlType>(
        &self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = Expr>,
    ) -> Expression<R> {
        let op = Operator::Function {
            name: name.into(),
            returns: R::data_type(),
        };
        apply(op, args.into_iter().collect(), R::data_type())
    }
}

/// Builds a computed node whose operand types the typed signature already
/// guarantees.
pub(crate) fn apply<R>(op: Operator, args: Vec<Expr>, data_type: DataType) -> Expression<R> {
    Expression::from_expr(Expr::computed_trusted(op, args, data_type))
}

/// Builds a boolean computed node.
pub(crate) fn condition(op: Operator, args: Vec<Expr>) -> Predicate {
    debug_assert!(op.is_predicate(), "{} is not a predicate", op.name());
    apply(op, args, DataType::Boolean)
}

/// Combines predicates with `And` or `Or`.
///
/// Nested junctions of the same operator are flattened, which also drops the
/// identity element (the empty junction). A single remaining operand is
/// returned unwrapped.
pub(crate) fn junction(op: Operator, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    let mut args = Vec::new();
    for predicate in predicates {
        match predicate.into_expr() {
            Expr::Computed {
                op: inner,
                args: nested,
                ..
            } if inner == op => args.extend(nested),
            other => args.push(other),
        }
    }
    if args.len() == 1 {
        if let Some(only) = args.pop() {
            return Predicate::from_expr(only);
        }
    }
    condition(op, args)
}

/// Negates a predicate; a double negation cancels out.
pub(crate) fn negate(predicate: Predicate) -> Predicate {
    match predicate.into_expr() {
        Expr::Computed {
            op: Operator::Not,
            mut args,
            ..
        } if args.len() == 1 => match args.pop() {
            Some(inner) => Predicate::from_expr(inner),
            None => condition(Operator::Not, args),
        },
        other => condition(Operator::Not, alloc::vec![other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_parameters_are_numbered() {
        let cb = Algebra::new();
        let a = cb.parameter::<i32>();
        let b = cb.named_parameter::<String>("name");
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(b.name(), Some("name"));
        assert_eq!(b.expression().data_type(), &DataType::String);
    }

    #[test]
    fn test_null_literal_carries_type() {
        let cb = Algebra::new();
        let null = cb.null_literal::<i64>();
        assert_eq!(null.data_type(), &DataType::Int64);
    }

    #[test]
    fn test_asc_desc() {
        let cb = Algebra::new();
        assert!(cb.asc(1i32).is_ascending());
        assert!(!cb.desc(1i32).is_ascending());
    }

    #[test]
    fn test_function_result_type() {
        let cb = Algebra::new();
        let f = cb.function::<i64>("hash", vec![Expr::literal("x").unwrap()]);
        assert_eq!(f.data_type(), &DataType::Int64);
    }

    #[test]
    fn test_junction_flattens() {
        let cb = Algebra::new();
        let (a, b, c) = (cb.is_true(true), cb.is_false(true), cb.is_true(false));
        let nested = junction(Operator::And, [junction(Operator::And, [a, b]), c]);
        assert_eq!(nested.expr().args().len(), 3);
    }

    #[test]
    fn test_double_negation() {
        let cb = Algebra::new();
        let p = cb.is_true(true);
        assert_eq!(negate(negate(p.clone())), p);
    }
}
