//! Aggregate functions.

use super::{apply, Algebra};
use crate::ast::{AggregateFunc, Comparable, Expression, IntoExpression, Numeric, Operator};
use alloc::vec;
use criteria_core::DataType;

impl Algebra {
    /// Average; always floating point regardless of the input type.
    pub fn avg<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<f64> {
        aggregate(AggregateFunc::Avg, x, DataType::Float64)
    }

    pub fn sum<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<N> {
        aggregate(AggregateFunc::Sum, x, N::data_type())
    }

    /// Sum of integers, widened to `i64`.
    pub fn sum_as_long(&self, x: impl IntoExpression<i32>) -> Expression<i64> {
        aggregate(AggregateFunc::SumAsLong, x, DataType::Int64)
    }

    /// Sum of floats, widened to `f64`.
    pub fn sum_as_double(&self, x: impl IntoExpression<f32>) -> Expression<f64> {
        aggregate(AggregateFunc::SumAsDouble, x, DataType::Float64)
    }

    pub fn max<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<N> {
        aggregate(AggregateFunc::Max, x, N::data_type())
    }

    pub fn min<N: Numeric>(&self, x: impl IntoExpression<N>) -> Expression<N> {
        aggregate(AggregateFunc::Min, x, N::data_type())
    }

    /// Greatest value of any ordered type.
    pub fn greatest<V: Comparable>(&self, x: impl IntoExpression<V>) -> Expression<V> {
        aggregate(AggregateFunc::Greatest, x, V::data_type())
    }

    /// Least value of any ordered type.
    pub fn least<V: Comparable>(&self, x: impl IntoExpression<V>) -> Expression<V> {
        aggregate(AggregateFunc::Least, x, V::data_type())
    }

    pub fn count<V>(&self, x: impl IntoExpression<V>) -> Expression<i64> {
        aggregate(AggregateFunc::Count, x, DataType::Int64)
    }

    pub fn count_distinct<V>(&self, x: impl IntoExpression<V>) -> Expression<i64> {
        aggregate(AggregateFunc::CountDistinct, x, DataType::Int64)
    }
}

fn aggregate<V, R>(func: AggregateFunc, x: impl IntoExpression<V>, data_type: DataType) -> Expression<R> {
    apply(
        Operator::Aggregate(func),
        vec![x.into_expression().into_expr()],
        data_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SqlType;
    use alloc::string::String;

    #[test]
    fn test_avg_is_double() {
        let cb = Algebra::new();
        assert_eq!(cb.avg(3i32).data_type(), &DataType::Float64);
        assert_eq!(cb.avg(3i64).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_sum_preserves_type() {
        let cb = Algebra::new();
        assert_eq!(cb.sum(3i64).data_type(), &i64::data_type());
        assert_eq!(cb.max(1.5f32).data_type(), &DataType::Float32);
    }

    #[test]
    fn test_explicit_widening() {
        let cb = Algebra::new();
        assert_eq!(cb.sum_as_long(1i32).data_type(), &DataType::Int64);
        assert_eq!(cb.sum_as_double(1.0f32).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_greatest_on_strings() {
        let cb = Algebra::new();
        let g = cb.greatest(String::from("z"));
        assert_eq!(g.data_type(), &DataType::String);
        assert_eq!(cb.count_distinct("a").data_type(), &DataType::Int64);
    }
}
