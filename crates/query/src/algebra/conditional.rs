//! `in`, `case`, `coalesce` and `nullif`.
//!
//! The incremental forms are builders consumed by value:
//!
//! ```rust
//! use criteria_query::algebra::Algebra;
//! use criteria_query::ast::Expression;
//!
//! let cb = Algebra::new();
//! let age = Expression::literal(20i32);
//! let label = cb
//!     .select_case::<String>()
//!     .when(cb.lt(&age, 18), "minor")
//!     .otherwise("adult");
//! assert_eq!(label.to_string(), "case when (20 < 18) then 'minor' else 'adult' end");
//! ```

use super::{apply, condition, Algebra};
use crate::ast::{CaseBranch, Expr, Expression, IntoExpression, Operator, Predicate, SqlType};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use criteria_core::{Error, Result};

impl Algebra {
    /// First non-null of `x` and `y`.
    pub fn coalesce<V>(&self, x: impl IntoExpression<V>, y: impl IntoExpression<V>) -> Expression<V> {
        let args = vec![x.into_expression().into_expr(), y.into_expression().into_expr()];
        let data_type = args[0].data_type().clone();
        apply(Operator::Coalesce, args, data_type)
    }

    /// Starts an incremental coalesce.
    pub fn coalesce_builder<V>(&self) -> Coalesce<V> {
        Coalesce {
            values: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Null if `x` equals `y`, otherwise `x`.
    pub fn nullif<V>(&self, x: impl IntoExpression<V>, y: impl IntoExpression<V>) -> Expression<V> {
        let args = vec![x.into_expression().into_expr(), y.into_expression().into_expr()];
        let data_type = args[0].data_type().clone();
        apply(Operator::NullIf, args, data_type)
    }

    /// Starts a searched case (`case when <condition> then ...`).
    pub fn select_case<R: SqlType>(&self) -> Case<R> {
        Case {
            branches: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Starts a simple case comparing `operand` against each arm.
    pub fn select_simple_case<C, R: SqlType>(&self, operand: impl IntoExpression<C>) -> SimpleCase<C, R> {
        SimpleCase {
            operand: operand.into_expression(),
            branches: Vec::new(),
            marker: PhantomData,
        }
    }
}

/// An `in` predicate under construction.
pub struct In<V> {
    subject: Expression<V>,
    alternatives: Vec<Expr>,
}

impl<V> In<V> {
    pub(crate) fn new(subject: Expression<V>) -> Self {
        Self {
            subject,
            alternatives: Vec::new(),
        }
    }

    /// Returns the tested expression.
    pub fn expression(&self) -> &Expression<V> {
        &self.subject
    }

    /// Adds an alternative.
    pub fn value(mut self, value: impl IntoExpression<V>) -> Self {
        self.alternatives.push(value.into_expression().into_expr());
        self
    }

    /// Adds several alternatives.
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoExpression<V>,
    {
        self.alternatives
            .extend(values.into_iter().map(|v| v.into_expression().into_expr()));
        self
    }

    /// Finishes the predicate. With no alternatives it matches nothing.
    pub fn predicate(self) -> Predicate {
        let mut args = Vec::with_capacity(self.alternatives.len() + 1);
        args.push(self.subject.into_expr());
        args.extend(self.alternatives);
        condition(Operator::In, args)
    }
}

impl<V> From<In<V>> for Predicate {
    fn from(builder: In<V>) -> Self {
        builder.predicate()
    }
}

impl<V> IntoExpression<bool> for In<V> {
    fn into_expression(self) -> Predicate {
        self.predicate()
    }
}

/// A searched case expression under construction.
pub struct Case<R> {
    branches: Vec<CaseBranch>,
    marker: PhantomData<fn() -> R>,
}

impl<R: SqlType> Case<R> {
    /// Adds an arm yielding `result` when `condition` holds.
    pub fn when(mut self, condition: impl IntoExpression<bool>, result: impl IntoExpression<R>) -> Self {
        self.branches.push(CaseBranch {
            when: condition.into_expression().into_expr(),
            then: result.into_expression().into_expr(),
        });
        self
    }

    /// Finishes with a fallback result.
    pub fn otherwise(self, result: impl IntoExpression<R>) -> Expression<R> {
        finish_case(None, self.branches, Some(result.into_expression().into_expr()))
    }

    /// Finishes without a fallback; unmatched rows yield null.
    pub fn end(self) -> Expression<R> {
        finish_case(None, self.branches, None)
    }
}

/// A simple case expression under construction.
pub struct SimpleCase<C, R> {
    operand: Expression<C>,
    branches: Vec<CaseBranch>,
    marker: PhantomData<fn() -> R>,
}

impl<C, R: SqlType> SimpleCase<C, R> {
    /// Returns the compared expression.
    pub fn expression(&self) -> &Expression<C> {
        &self.operand
    }

    /// Adds an arm yielding `result` when the operand equals `value`.
    pub fn when(mut self, value: impl IntoExpression<C>, result: impl IntoExpression<R>) -> Self {
        self.branches.push(CaseBranch {
            when: value.into_expression().into_expr(),
            then: result.into_expression().into_expr(),
        });
        self
    }

    pub fn otherwise(self, result: impl IntoExpression<R>) -> Expression<R> {
        let operand = self.operand.into_expr();
        finish_case(Some(operand), self.branches, Some(result.into_expression().into_expr()))
    }

    pub fn end(self) -> Expression<R> {
        finish_case(Some(self.operand.into_expr()), self.branches, None)
    }
}

fn finish_case<R: SqlType>(
    operand: Option<Expr>,
    branches: Vec<CaseBranch>,
    otherwise: Option<Expr>,
) -> Expression<R> {
    let data_type = R::data_type();
    debug_assert!(crate::ast::signature::check_case(
        operand.as_ref(),
        &branches,
        otherwise.as_ref(),
        &data_type
    )
    .is_ok());
    Expression::from_expr(Expr::Case {
        operand: operand.map(Box::new),
        branches,
        otherwise: otherwise.map(Box::new),
        data_type,
    })
}

/// A coalesce expression under construction.
pub struct Coalesce<V> {
    values: Vec<Expr>,
    marker: PhantomData<fn() -> V>,
}

impl<V> Coalesce<V> {
    /// Adds a candidate value.
    pub fn value(mut self, value: impl IntoExpression<V>) -> Self {
        self.values.push(value.into_expression().into_expr());
        self
    }

    /// Finishes the expression; fails when no value was added.
    pub fn end(self) -> Result<Expression<V>> {
        let data_type = match self.values.first() {
            Some(first) => first.data_type().clone(),
            None => return Err(Error::arity(Operator::Coalesce.name(), "at least 1", 0)),
        };
        Ok(apply(Operator::Coalesce, self.values, data_type))
    }
}
