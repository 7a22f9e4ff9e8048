//! Equality, generic comparison and numeric comparison.
//!
//! Generic comparisons (`greater_than` and friends) accept any `Comparable`
//! type, strings and temporals included. The short forms (`gt`, `ge`, `lt`,
//! `le`) only accept `Numeric` operands.

use super::{condition, Algebra, In};
use crate::ast::{Comparable, IntoExpression, Numeric, Operator, Predicate};
use alloc::vec;

impl Algebra {
    pub fn equal<V>(&self, x: impl IntoExpression<V>, y: impl IntoExpression<V>) -> Predicate {
        binary(Operator::Eq, x, y)
    }

    pub fn not_equal<V>(&self, x: impl IntoExpression<V>, y: impl IntoExpression<V>) -> Predicate {
        binary(Operator::Ne, x, y)
    }

    pub fn greater_than<V: Comparable>(
        &self,
        x: impl IntoExpression<V>,
        y: impl IntoExpression<V>,
    ) -> Predicate {
        binary(Operator::GreaterThan, x, y)
    }

    pub fn greater_than_or_equal_to<V: Comparable>(
        &self,
        x: impl IntoExpression<V>,
        y: impl IntoExpression<V>,
    ) -> Predicate {
        binary(Operator::GreaterThanOrEqual, x, y)
    }

    pub fn less_than<V: Comparable>(
        &self,
        x: impl IntoExpression<V>,
        y: impl IntoExpression<V>,
    ) -> Predicate {
        binary(Operator::LessThan, x, y)
    }

    pub fn less_than_or_equal_to<V: Comparable>(
        &self,
        x: impl IntoExpression<V>,
        y: impl IntoExpression<V>,
    ) -> Predicate {
        binary(Operator::LessThanOrEqual, x, y)
    }

    /// Tests `low <= v <= high`.
    pub fn between<V: Comparable>(
        &self,
        v: impl IntoExpression<V>,
        low: impl IntoExpression<V>,
        high: impl IntoExpression<V>,
    ) -> Predicate {
        condition(
            Operator::Between,
            vec![
                v.into_expression().into_expr(),
                low.into_expression().into_expr(),
                high.into_expression().into_expr(),
            ],
        )
    }

    pub fn gt<N: Numeric>(&self, x: impl IntoExpression<N>, y: impl IntoExpression<N>) -> Predicate {
        binary(Operator::Gt, x, y)
    }

    pub fn ge<N: Numeric>(&self, x: impl IntoExpression<N>, y: impl IntoExpression<N>) -> Predicate {
        binary(Operator::Ge, x, y)
    }

    pub fn lt<N: Numeric>(&self, x: impl IntoExpression<N>, y: impl IntoExpression<N>) -> Predicate {
        binary(Operator::Lt, x, y)
    }

    pub fn le<N: Numeric>(&self, x: impl IntoExpression<N>, y: impl IntoExpression<N>) -> Predicate {
        binary(Operator::Le, x, y)
    }

    /// Starts an `in` predicate on `x`; add alternatives with [`In::value`].
    pub fn in_<V>(&self, x: impl IntoExpression<V>) -> In<V> {
        In::new(x.into_expression())
    }
}

fn binary<V>(op: Operator, x: impl IntoExpression<V>, y: impl IntoExpression<V>) -> Predicate {
    condition(
        op,
        vec![
            x.into_expression().into_expr(),
            y.into_expression().into_expr(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Expression};
    use alloc::string::String;
    use criteria_core::{DataType, Date};

    #[test]
    fn test_literal_and_expression_operands() {
        let cb = Algebra::new();
        let age = Expression::literal(30i32);
        let with_literal = cb.gt(&age, 5);
        let with_expr = cb.gt(&age, Expression::literal(5i32));
        assert_eq!(with_literal, with_expr);
    }

    #[test]
    fn test_generic_comparison_on_strings_and_dates() {
        let cb = Algebra::new();
        let p = cb.greater_than(Expression::literal(String::from("b")), "a");
        assert_eq!(p.data_type(), &DataType::Boolean);
        let d = cb.less_than(Date::from_days(1), Date::from_days(2));
        assert_eq!(d.expr().operator(), Some(&Operator::LessThan));
    }

    #[test]
    fn test_between() {
        let cb = Algebra::new();
        let p = cb.between(5i64, 1i64, 10i64);
        assert!(matches!(p.expr(), Expr::Computed { op: Operator::Between, args, .. } if args.len() == 3));
    }

    #[test]
    fn test_equal_columns_and_literals() {
        let cb = Algebra::new();
        let p = cb.equal(Expression::literal(String::from("Alice")), "Alice");
        assert_eq!(p.expr().args()[1], Expr::literal("Alice").unwrap());
    }
}
