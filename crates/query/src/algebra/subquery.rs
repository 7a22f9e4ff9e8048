//! Sub-query predicates and quantifiers.

use super::{apply, condition, Algebra};
use crate::ast::{Expression, Operator, Predicate};
use crate::query::Subquery;
use alloc::vec;
use criteria_core::{Error, Result};

impl Algebra {
    /// Tests whether the sub-query returns any row.
    pub fn exists<Y>(&self, subquery: &Subquery<Y>) -> Predicate {
        condition(Operator::Exists, vec![subquery.to_expr()])
    }

    /// `all (subquery)`, compared against by the enclosing comparison.
    pub fn all<Y>(&self, subquery: &Subquery<Y>) -> Result<Expression<Y>> {
        quantified(Operator::All, subquery)
    }

    pub fn any<Y>(&self, subquery: &Subquery<Y>) -> Result<Expression<Y>> {
        quantified(Operator::Any, subquery)
    }

    pub fn some<Y>(&self, subquery: &Subquery<Y>) -> Result<Expression<Y>> {
        quantified(Operator::Some, subquery)
    }
}

fn quantified<Y>(op: Operator, subquery: &Subquery<Y>) -> Result<Expression<Y>> {
    let selected = subquery
        .selection()
        .ok_or_else(|| Error::uninitialized("subquery selection"))?;
    let data_type = selected.data_type().clone();
    Ok(apply(op, vec![subquery.to_expr()], data_type))
}
