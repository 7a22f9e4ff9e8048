//! Boolean connectives and truth tests.

use super::{condition, junction, negate, Algebra};
use crate::ast::{IntoExpression, Operator, Predicate};
use alloc::vec;
use alloc::vec::Vec;

impl Algebra {
    /// Conjunction of two predicates.
    pub fn and(&self, x: impl IntoExpression<bool>, y: impl IntoExpression<bool>) -> Predicate {
        junction(Operator::And, [x.into_expression(), y.into_expression()])
    }

    /// Disjunction of two predicates.
    pub fn or(&self, x: impl IntoExpression<bool>, y: impl IntoExpression<bool>) -> Predicate {
        junction(Operator::Or, [x.into_expression(), y.into_expression()])
    }

    /// Conjunction of any number of predicates; empty input yields `conjunction()`.
    pub fn and_all(&self, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        junction(Operator::And, predicates)
    }

    /// Disjunction of any number of predicates; empty input yields `disjunction()`.
    pub fn or_all(&self, predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        junction(Operator::Or, predicates)
    }

    /// Negation.
    pub fn not(&self, x: impl IntoExpression<bool>) -> Predicate {
        negate(x.into_expression())
    }

    /// The always-true predicate, identity of `and`.
    pub fn conjunction(&self) -> Predicate {
        condition(Operator::And, Vec::new())
    }

    /// The always-false predicate, identity of `or`.
    pub fn disjunction(&self) -> Predicate {
        condition(Operator::Or, Vec::new())
    }

    pub fn is_true(&self, x: impl IntoExpression<bool>) -> Predicate {
        condition(Operator::IsTrue, vec![x.into_expression().into_expr()])
    }

    pub fn is_false(&self, x: impl IntoExpression<bool>) -> Predicate {
        condition(Operator::IsFalse, vec![x.into_expression().into_expr()])
    }

    /// Tests whether `x` is null. Works for any expression type.
    pub fn is_null<V>(&self, x: impl IntoExpression<V>) -> Predicate {
        condition(Operator::IsNull, vec![x.into_expression().into_expr()])
    }

    pub fn is_not_null<V>(&self, x: impl IntoExpression<V>) -> Predicate {
        condition(Operator::IsNotNull, vec![x.into_expression().into_expr()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Expression};

    #[test]
    fn test_identity_elements() {
        let cb = Algebra::new();
        let p = cb.is_null(Expression::literal(1i32));
        assert_eq!(cb.and(cb.conjunction(), &p), p);
        assert_eq!(cb.or(cb.disjunction(), &p), p);
        assert_eq!(cb.and(&p, cb.conjunction()), p);
    }

    #[test]
    fn test_empty_variadic() {
        let cb = Algebra::new();
        assert!(cb.and_all([]).expr().is_conjunction());
        assert!(cb.or_all([]).expr().is_disjunction());
    }

    #[test]
    fn test_two_operand_and() {
        let cb = Algebra::new();
        let p = cb.and(true, false);
        assert_eq!(p.expr().operator(), Some(&Operator::And));
        assert_eq!(p.expr().args().len(), 2);
    }

    #[test]
    fn test_operator_sugar() {
        let cb = Algebra::new();
        let (a, b) = (cb.is_true(true), cb.is_false(true));
        assert_eq!(a.clone() | b.clone(), cb.or(&a, &b));
        assert_eq!(a.clone() & b.clone(), cb.and(&a, &b));
        assert!(matches!((!a).expr(), Expr::Computed { op: Operator::Not, .. }));
    }
}
