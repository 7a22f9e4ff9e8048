//! Arithmetic and numeric casts.
//!
//! Binary arithmetic keeps the operand type: both sides share `N`, so the
//! result is `N` as well (integer division stays integral). The `+ - * /`
//! and unary `-` operators on numeric expressions build the same nodes.

use super::{apply, Algebra};
use crate::ast::{Expression, IntoExpression, Numeric, Operator, SqlType};
use alloc::string::String;
use alloc::vec;
use core::ops::{Add, Div, Mul, Neg, Sub};
use criteria_core::{BigInt, Decimal};

impl Algebra {
    pub fn neg<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<N> {
        unary(Operator::Neg, x)
    }

    pub fn abs<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<N> {
        unary(Operator::Abs, x)
    }

    /// `x + y`.
    pub fn add<N: Numeric>(&self, x: impl IntoExpression<N>, y: impl IntoExpression<N>) -> Expression<N> {
        binary(Operator::Sum, x, y)
    }

    /// `x * y`.
    pub fn multiply<N: Numeric>(
        &self,
        x: impl IntoExpression<N>,
        y: impl IntoExpression<N>,
    ) -> Expression<N> {
        binary(Operator::Prod, x, y)
    }

    /// `x - y`.
    pub fn subtract<N: Numeric>(
        &self,
        x: impl IntoExpression<N>,
        y: impl IntoExpression<N>,
    ) -> Expression<N> {
        binary(Operator::Diff, x, y)
    }

    /// `x / y`.
    pub fn divide<N: Numeric>(
        &self,
        x: impl IntoExpression<N>,
        y: impl IntoExpression<N>,
    ) -> Expression<N> {
        binary(Operator::Quot, x, y)
    }

    /// Integer remainder.
    pub fn modulo(&self, x: impl IntoExpression<i32>, y: impl IntoExpression<i32>) -> Expression<i32> {
        binary(Operator::Mod, x, y)
    }

    pub fn sqrt<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<f64> {
        cast(Operator::Sqrt, x)
    }

    pub fn to_long<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<i64> {
        cast(Operator::ToLong, x)
    }

    pub fn to_float<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<f32> {
        cast(Operator::ToFloat, x)
    }

    pub fn to_double<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<f64> {
        cast(Operator::ToDouble, x)
    }

    pub fn to_big_decimal<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<Decimal> {
        cast(Operator::ToBigDecimal, x)
    }

    pub fn to_big_integer<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<BigInt> {
        cast(Operator::ToBigInteger, x)
    }

    /// Converts a character expression to a string.
    pub fn to_string(&self, x: impl IntoExpression<char>) -> Expression<String> {
        cast(Operator::ToString, x)
    }
}

fn unary<N: Numeric>(op: Operator, x: impl IntoExpression<N>) -> Expression<N> {
    apply(op, vec![x.into_expression().into_expr()], N::data_type())
}

fn binary<N: Numeric>(
    op: Operator,
    x: impl IntoExpression<N>,
    y: impl IntoExpression<N>,
) -> Expression<N> {
    let args = vec![
        x.into_expression().into_expr(),
        y.into_expression().into_expr(),
    ];
    apply(op, args, N::data_type())
}

fn cast<V, R: SqlType>(op: Operator, x: impl IntoExpression<V>) -> Expression<R> {
    apply(op, vec![x.into_expression().into_expr()], R::data_type())
}

impl<N: Numeric, Rhs: IntoExpression<N>> Add<Rhs> for Expression<N> {
    type Output = Expression<N>;

    fn add(self, rhs: Rhs) -> Self::Output {
        binary(Operator::Sum, self, rhs)
    }
}

impl<N: Numeric, Rhs: IntoExpression<N>> Sub<Rhs> for Expression<N> {
    type Output = Expression<N>;

    fn sub(self, rhs: Rhs) -> Self::Output {
        binary(Operator::Diff, self, rhs)
    }
}

impl<N: Numeric, Rhs: IntoExpression<N>> Mul<Rhs> for Expression<N> {
    type Output = Expression<N>;

    fn mul(self, rhs: Rhs) -> Self::Output {
        binary(Operator::Prod, self, rhs)
    }
}

impl<N: Numeric, Rhs: IntoExpression<N>> Div<Rhs> for Expression<N> {
    type Output = Expression<N>;

    fn div(self, rhs: Rhs) -> Self::Output {
        binary(Operator::Quot, self, rhs)
    }
}

impl<N: Numeric> Neg for Expression<N> {
    type Output = Expression<N>;

    fn neg(self) -> Self::Output {
        unary(Operator::Neg, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use criteria_core::{DataType, Error};

    #[test]
    fn test_arithmetic_preserves_type() {
        let cb = Algebra::new();
        let total = cb.add(Expression::literal(2i64), 3i64);
        assert_eq!(total.data_type(), &DataType::Int64);
        let ratio = cb.divide(7i32, 2i32);
        assert_eq!(ratio.data_type(), &DataType::Int32);
    }

    #[test]
    fn test_operator_overloads_match_algebra() {
        let cb = Algebra::new();
        let x = Expression::literal(1.5f64);
        assert_eq!(x.clone() + 2.0, cb.add(&x, 2.0));
        assert_eq!(x.clone() * &x, cb.multiply(&x, &x));
        assert_eq!(-x.clone(), cb.neg(&x));
    }

    #[test]
    fn test_casts() {
        let cb = Algebra::new();
        assert_eq!(cb.sqrt(16i32).data_type(), &DataType::Float64);
        assert_eq!(cb.to_long(1i32).data_type(), &DataType::Int64);
        assert_eq!(cb.to_big_decimal(1.0f32).data_type(), &DataType::BigDecimal);
        assert_eq!(cb.to_string('x').data_type(), &DataType::String);
    }

    #[test]
    fn test_untyped_sum_rejects_string() {
        let name = Expr::literal("Alice").unwrap();
        let age = Expr::literal(30i32).unwrap();
        let err = Expr::computed(Operator::Sum, vec![name, age]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { operator: "sum", .. }));
    }
}
