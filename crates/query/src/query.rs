//! Query definitions and sub-queries.
//!
//! A [`QueryDefinition`] accumulates the clauses of one query. Every clause
//! setter replaces that clause's previous contents; calling `where_` twice
//! keeps only the second restriction.
//!
//! Every root gets an alias unique within its query tree: `r0`, `r1` for the
//! top-level query, `s0_r0` for the first root of its first sub-query,
//! `s0_s1_r0` one level deeper. Two roots of the same entity therefore yield
//! distinct column references, which is what correlation needs.

use crate::algebra::junction;
use crate::ast::{
    Expr, Expression, IntoExpression, Operator, Order, ParameterRef, PathSource, Predicate,
    SubqueryDef,
};
use crate::root::{EntityPath, Root};
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use criteria_core::schema::Entity;
use criteria_core::{DataType, Error, Result};
use hashbrown::HashSet;
use log::debug;

/// What a query returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// One expression per result row.
    Single(Expr),
    /// A tuple of expressions per result row.
    Multi(Vec<Expr>),
}

impl Selection {
    /// Returns the selected expressions.
    pub fn items(&self) -> &[Expr] {
        match self {
            Selection::Single(expr) => core::slice::from_ref(expr),
            Selection::Multi(exprs) => exprs,
        }
    }
}

/// The clauses of a query returning rows of `T`.
pub struct QueryDefinition<T> {
    scope: Scope,
    roots: Vec<PathSource>,
    selection: Option<Selection>,
    restrictions: Vec<Predicate>,
    group_by: Vec<Expr>,
    having: Vec<Predicate>,
    order_by: Vec<Order>,
    distinct: bool,
    marker: PhantomData<fn() -> T>,
}

impl<T> Default for QueryDefinition<T> {
    fn default() -> Self {
        Self {
            scope: Scope::default(),
            roots: Vec::new(),
            selection: None,
            restrictions: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            distinct: false,
            marker: PhantomData,
        }
    }
}

impl<T> QueryDefinition<T> {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds entity `E` to the from clause and returns its root.
    pub fn from<E: Entity>(&mut self) -> Root<E> {
        let root = Root::<E>::new(self.scope.root_alias(self.roots.len()));
        debug!("query from {} {}", root.model().name(), root.alias());
        self.roots.push(root.source().clone());
        root
    }

    /// Sets the selection.
    pub fn select(&mut self, selection: impl IntoExpression<T>) -> &mut Self {
        let expr = selection.into_expression().into_expr();
        debug!("query select {}", expr);
        self.selection = Some(Selection::Single(expr));
        self
    }

    /// Sets a multi-expression selection.
    pub fn multiselect(&mut self, selections: impl IntoIterator<Item = Expr>) -> &mut Self {
        let items: Vec<Expr> = selections.into_iter().collect();
        debug!("query multiselect of {} items", items.len());
        self.selection = Some(Selection::Multi(items));
        self
    }

    /// Replaces the restriction.
    pub fn where_(&mut self, restriction: impl IntoExpression<bool>) -> &mut Self {
        self.where_all([restriction.into_expression()])
    }

    /// Replaces the restriction with the conjunction of `restrictions`.
    pub fn where_all(&mut self, restrictions: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.restrictions = restrictions.into_iter().collect();
        debug!("query where with {} predicate(s)", self.restrictions.len());
        self
    }

    /// Replaces the grouping expressions.
    pub fn group_by(&mut self, grouping: impl IntoIterator<Item = Expr>) -> &mut Self {
        self.group_by = grouping.into_iter().collect();
        debug!("query group by {} expression(s)", self.group_by.len());
        self
    }

    /// Replaces the group restriction.
    pub fn having(&mut self, restriction: impl IntoExpression<bool>) -> &mut Self {
        self.having_all([restriction.into_expression()])
    }

    /// Replaces the group restriction with the conjunction of `restrictions`.
    pub fn having_all(&mut self, restrictions: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.having = restrictions.into_iter().collect();
        debug!("query having with {} predicate(s)", self.having.len());
        self
    }

    /// Replaces the ordering; earlier entries sort first.
    pub fn order_by(&mut self, orders: impl IntoIterator<Item = Order>) -> &mut Self {
        self.order_by = orders.into_iter().collect();
        debug!("query order by {} key(s)", self.order_by.len());
        self
    }

    /// Sets whether duplicate rows are removed.
    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Returns the roots of the from clause.
    pub fn roots(&self) -> &[PathSource] {
        &self.roots
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Returns the restriction predicates as set by the last `where_`.
    pub fn restrictions(&self) -> &[Predicate] {
        &self.restrictions
    }

    /// Returns the combined restriction, `None` when unrestricted.
    pub fn restriction(&self) -> Option<Predicate> {
        combine(&self.restrictions)
    }

    pub fn group_list(&self) -> &[Expr] {
        &self.group_by
    }

    /// Returns the combined group restriction.
    pub fn group_restriction(&self) -> Option<Predicate> {
        combine(&self.having)
    }

    pub fn order_list(&self) -> &[Order] {
        &self.order_by
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Returns every parameter referenced by any clause.
    pub fn parameters(&self) -> HashSet<ParameterRef> {
        let mut out = HashSet::new();
        let selection = self.selection.iter().flat_map(Selection::items);
        let predicates = self
            .restrictions
            .iter()
            .chain(&self.having)
            .map(Expression::expr);
        let orders = self.order_by.iter().map(Order::expr);
        for expr in selection
            .chain(predicates)
            .chain(&self.group_by)
            .chain(orders)
        {
            expr.visit_parameters(&mut |p| {
                out.insert(p.clone());
            });
        }
        out
    }

    /// Creates an empty sub-query returning `Y`.
    ///
    /// Its roots are aliased apart from this query's roots, so columns of
    /// the enclosing query can be compared against them.
    pub fn subquery<Y>(&mut self) -> Subquery<Y> {
        Subquery::new(self.scope.child())
    }
}

/// Alias allocation for one query level.
#[derive(Clone, Debug, Default)]
struct Scope {
    prefix: String,
    subqueries: u32,
}

impl Scope {
    fn root_alias(&self, index: usize) -> String {
        format!("{}r{}", self.prefix, index)
    }

    fn child(&mut self) -> Scope {
        let prefix = format!("{}s{}_", self.prefix, self.subqueries);
        self.subqueries += 1;
        Scope {
            prefix,
            subqueries: 0,
        }
    }
}

impl<T> fmt::Debug for QueryDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDefinition")
            .field("roots", &self.roots)
            .field("selection", &self.selection)
            .field("restrictions", &self.restrictions)
            .field("group_by", &self.group_by)
            .field("having", &self.having)
            .field("order_by", &self.order_by)
            .field("distinct", &self.distinct)
            .finish()
    }
}

fn combine(predicates: &[Predicate]) -> Option<Predicate> {
    if predicates.is_empty() {
        return None;
    }
    Some(junction(Operator::And, predicates.iter().cloned()))
}

/// A nested query returning `Y`, usable in `exists`, `all`, `any`, `some`.
pub struct Subquery<Y> {
    scope: Scope,
    roots: Vec<PathSource>,
    selection: Option<Expr>,
    restrictions: Vec<Predicate>,
    group_by: Vec<Expr>,
    having: Vec<Predicate>,
    distinct: bool,
    marker: PhantomData<fn() -> Y>,
}

impl<Y> Subquery<Y> {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            roots: Vec::new(),
            selection: None,
            restrictions: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            distinct: false,
            marker: PhantomData,
        }
    }

    /// Adds entity `E` to the sub-query's from clause.
    pub fn from<E: Entity>(&mut self) -> Root<E> {
        let root = Root::<E>::new(self.scope.root_alias(self.roots.len()));
        debug!("subquery from {} {}", root.model().name(), root.alias());
        self.roots.push(root.source().clone());
        root
    }

    /// Creates a sub-query nested in this one.
    pub fn subquery<Z>(&mut self) -> Subquery<Z> {
        Subquery::new(self.scope.child())
    }

    pub fn select(&mut self, selection: impl IntoExpression<Y>) -> &mut Self {
        self.selection = Some(selection.into_expression().into_expr());
        self
    }

    pub fn where_(&mut self, restriction: impl IntoExpression<bool>) -> &mut Self {
        self.restrictions = alloc::vec![restriction.into_expression()];
        self
    }

    pub fn where_all(&mut self, restrictions: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.restrictions = restrictions.into_iter().collect();
        self
    }

    pub fn group_by(&mut self, grouping: impl IntoIterator<Item = Expr>) -> &mut Self {
        self.group_by = grouping.into_iter().collect();
        self
    }

    pub fn having(&mut self, restriction: impl IntoExpression<bool>) -> &mut Self {
        self.having = alloc::vec![restriction.into_expression()];
        self
    }

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Returns the selected expression, if set.
    pub fn selection(&self) -> Option<&Expr> {
        self.selection.as_ref()
    }

    /// Returns the sub-query as an untyped operand.
    ///
    /// Without a selection the node is boolean-typed, which only `exists`
    /// accepts.
    pub fn to_expr(&self) -> Expr {
        let data_type = self
            .selection
            .as_ref()
            .map_or(DataType::Boolean, |s| s.data_type().clone());
        Expr::Subquery(Box::new(SubqueryDef {
            roots: self.roots.clone(),
            selection: self.selection.clone().map(Box::new),
            restrictions: self.restrictions.iter().map(|p| p.expr().clone()).collect(),
            group_by: self.group_by.clone(),
            having: self.having.iter().map(|p| p.expr().clone()).collect(),
            distinct: self.distinct,
            data_type,
        }))
    }

    /// Returns the sub-query as a scalar expression of `Y`.
    ///
    /// Fails when nothing was selected.
    pub fn expression(&self) -> Result<Expression<Y>> {
        if self.selection.is_none() {
            return Err(Error::uninitialized("subquery selection"));
        }
        Ok(Expression::from_expr(self.to_expr()))
    }
}

impl<Y> fmt::Debug for Subquery<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subquery")
            .field("roots", &self.roots)
            .field("selection", &self.selection)
            .field("restrictions", &self.restrictions)
            .field("group_by", &self.group_by)
            .field("having", &self.having)
            .field("distinct", &self.distinct)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Algebra;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use criteria_core::schema::{EntityBuilder, EntityModel};

    struct Person;

    impl Entity for Person {
        fn model() -> EntityModel {
            EntityBuilder::new("Person")
                .unwrap()
                .attribute("name", DataType::String)
                .unwrap()
                .attribute("age", DataType::Int32)
                .unwrap()
                .build()
                .unwrap()
        }
    }

    #[test]
    fn test_where_replaces() {
        let cb = Algebra::new();
        let mut query = QueryDefinition::<Person>::new();
        let root = query.from::<Person>();
        let age = root.get_int("age").unwrap();
        let (a, b, c) = (cb.gt(&age, 1), cb.lt(&age, 99), cb.equal(&age, 42));

        query.where_all([a, b]);
        assert_eq!(query.restrictions().len(), 2);
        query.where_(c.clone());
        assert_eq!(query.restrictions(), &[c.clone()][..]);
        assert_eq!(query.restriction(), Some(c));
    }

    #[test]
    fn test_restriction_combines() {
        let cb = Algebra::new();
        let mut query = QueryDefinition::<Person>::new();
        assert!(query.restriction().is_none());
        query.where_all([cb.is_true(true), cb.is_false(false)]);
        let combined = query.restriction().unwrap();
        assert_eq!(combined.expr().operator(), Some(&Operator::And));
    }

    #[test]
    fn test_order_by_sequence() {
        let cb = Algebra::new();
        let mut query = QueryDefinition::<Person>::new();
        let root = query.from::<Person>();
        let (name, age) = (root.get_string("name").unwrap(), root.get_int("age").unwrap());

        query.order_by([cb.asc(&name), cb.desc(&age)]);
        assert_eq!(query.order_list(), &[cb.asc(&name), cb.desc(&age)][..]);
        query.order_by([cb.desc(&age), cb.asc(&name)]);
        assert_eq!(query.order_list(), &[cb.desc(&age), cb.asc(&name)][..]);
    }

    #[test]
    fn test_parameters_collected_from_all_clauses() {
        let cb = Algebra::new();
        let mut query = QueryDefinition::<Person>::new();
        let root = query.from::<Person>();
        let min = cb.named_parameter::<i32>("min");
        let prefix = cb.parameter::<String>();
        query
            .where_(cb.gt(root.get_int("age").unwrap(), &min))
            .having(cb.like(root.get_string("name").unwrap(), &prefix));
        let params = query.parameters();
        assert_eq!(params.len(), 2);
        assert!(params.contains(min.parameter()));
    }

    #[test]
    fn test_select_root_and_multiselect() {
        let mut query = QueryDefinition::<Person>::new();
        let root = query.from::<Person>();
        query.select(&root);
        assert!(matches!(query.selection(), Some(Selection::Single(Expr::Entity { .. }))));
        query.multiselect(vec![root.get_string("name").unwrap().into()]);
        assert_eq!(query.selection().map(|s| s.items().len()), Some(1));
    }

    #[test]
    fn test_subquery_requires_selection_for_scalar_use() {
        let mut query = QueryDefinition::<Person>::new();
        let mut sub = query.subquery::<i32>();
        let inner = sub.from::<Person>();
        assert!(sub.expression().is_err());
        sub.select(inner.get_int("age").unwrap());
        assert_eq!(sub.expression().unwrap().data_type(), &DataType::Int32);
    }

    #[test]
    fn test_roots_are_aliased_per_query_level() {
        let mut query = QueryDefinition::<Person>::new();
        let outer = query.from::<Person>();
        let other = query.from::<Person>();
        let mut first = query.subquery::<i32>();
        let inner = first.from::<Person>();
        let mut nested = first.subquery::<i32>();
        let deepest = nested.from::<Person>();
        let second = query.subquery::<i32>().from::<Person>();

        let aliases = [&outer, &other, &inner, &deepest, &second].map(|r| String::from(r.alias()));
        assert_eq!(aliases, ["r0", "r1", "s0_r0", "s0_s0_r0", "s1_r0"]);
        assert_eq!(query.roots().len(), 2);
    }

    #[test]
    fn test_correlated_subquery_keeps_both_sides() {
        let cb = Algebra::new();
        let mut query = QueryDefinition::<Person>::new();
        let outer = query.from::<Person>();
        let mut sub = query.subquery::<Person>();
        let inner = sub.from::<Person>();

        let (o, i) = (outer.get_int("age").unwrap(), inner.get_int("age").unwrap());
        assert_ne!(o, i);
        let correlated = cb.equal(&i, &o);
        assert_eq!(correlated.to_string(), "(s0_r0.age = r0.age)");
        sub.where_(correlated);
        query.where_(cb.exists(&sub));
        assert_eq!(
            query.restriction().unwrap().to_string(),
            "exists((select * from Person s0_r0 where (s0_r0.age = r0.age)))"
        );
    }
}
