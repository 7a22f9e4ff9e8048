//! Composition context.
//!
//! A [`Context`] borrows the three parts a query is built from: the query
//! definition, the algebra provider and the entity root. Parts can be bound
//! in any order, either one at a time with [`Context::plus`] or two at once
//! with [`Context::combine`] or the [`Combine`] sugar:
//!
//! ```rust
//! use criteria_core::schema::{Entity, EntityBuilder, EntityModel};
//! use criteria_core::DataType;
//! use criteria_query::{Algebra, Combine, QueryDefinition};
//!
//! struct Person;
//!
//! impl Entity for Person {
//!     fn model() -> EntityModel {
//!         EntityBuilder::new("Person")
//!             .unwrap()
//!             .attribute("name", DataType::String)
//!             .unwrap()
//!             .build()
//!             .unwrap()
//!     }
//! }
//!
//! let cb = Algebra::new();
//! let mut query = QueryDefinition::<Person>::new();
//! let root = query.from::<Person>();
//!
//! let mut ctx = (&cb).plus(&root).plus(&mut query);
//! let name = ctx.get_string("name").unwrap();
//! let restriction = ctx.algebra().unwrap().equal(&name, "Alice");
//! ctx.where_(restriction).unwrap();
//! assert!(query.restriction().is_some());
//! ```
//!
//! Rebinding a slot replaces the earlier part. Operations that need a slot
//! that is still empty fail with [`Error::Uninitialized`].

use crate::algebra::Algebra;
use crate::ast::{Expr, Expression, IntoExpression, Order, ParameterRef, Predicate, SqlType};
use crate::query::QueryDefinition;
use crate::root::{EntityPath, Root};
use alloc::string::String;
use criteria_core::schema::{Entity, EntityModel};
use criteria_core::{BigInt, Date, Decimal, Error, Result, Timestamp};
use hashbrown::HashSet;
use log::debug;

/// One of the three parts a context binds.
pub trait Part<'a, T> {
    /// Stores this part in its slot of `context`.
    fn bind(self, context: &mut Context<'a, T>);
}

impl<'a, T> Part<'a, T> for &'a mut QueryDefinition<T> {
    fn bind(self, context: &mut Context<'a, T>) {
        debug!("context: bound query");
        context.query = Some(self);
    }
}

impl<'a, T> Part<'a, T> for &'a Algebra {
    fn bind(self, context: &mut Context<'a, T>) {
        debug!("context: bound algebra");
        context.algebra = Some(self);
    }
}

impl<'a, T> Part<'a, T> for &'a Root<T> {
    fn bind(self, context: &mut Context<'a, T>) {
        debug!("context: bound root");
        context.root = Some(self);
    }
}

/// Pairwise combination of parts: `part.plus(other)`.
///
/// Any two parts combine in either order into the same context.
pub trait Combine<'a, T>: Part<'a, T> + Sized {
    fn plus(self, other: impl Part<'a, T>) -> Context<'a, T> {
        Context::combine(self, other)
    }
}

impl<'a, T, P: Part<'a, T>> Combine<'a, T> for P {}

/// Fluent query-building surface over borrowed parts.
pub struct Context<'a, T> {
    query: Option<&'a mut QueryDefinition<T>>,
    algebra: Option<&'a Algebra>,
    root: Option<&'a Root<T>>,
}

impl<'a, T> Default for Context<'a, T> {
    fn default() -> Self {
        Self {
            query: None,
            algebra: None,
            root: None,
        }
    }
}

impl<'a, T> Context<'a, T> {
    /// Creates a context with no part bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from any two parts.
    pub fn combine(a: impl Part<'a, T>, b: impl Part<'a, T>) -> Self {
        Self::new().plus(a).plus(b)
    }

    /// Binds a further part.
    pub fn plus(mut self, part: impl Part<'a, T>) -> Self {
        part.bind(&mut self);
        self
    }

    /// Binds a part in place.
    pub fn bind(&mut self, part: impl Part<'a, T>) -> &mut Self {
        part.bind(self);
        self
    }

    /// Returns true when all three parts are bound.
    pub fn is_complete(&self) -> bool {
        self.query.is_some() && self.algebra.is_some() && self.root.is_some()
    }

    /// Returns the bound query definition.
    pub fn query(&mut self) -> Result<&mut QueryDefinition<T>> {
        self.query
            .as_deref_mut()
            .ok_or_else(|| Error::uninitialized("query"))
    }

    fn query_ref(&self) -> Result<&QueryDefinition<T>> {
        self.query
            .as_deref()
            .ok_or_else(|| Error::uninitialized("query"))
    }

    /// Returns the bound algebra provider.
    pub fn algebra(&self) -> Result<&'a Algebra> {
        self.algebra.ok_or_else(|| Error::uninitialized("algebra"))
    }

    /// Returns the bound root.
    pub fn root(&self) -> Result<&'a Root<T>> {
        self.root.ok_or_else(|| Error::uninitialized("root"))
    }

    pub fn select(&mut self, selection: impl IntoExpression<T>) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.select(selection))
    }

    pub fn multiselect(
        &mut self,
        selections: impl IntoIterator<Item = Expr>,
    ) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.multiselect(selections))
    }

    pub fn where_(&mut self, restriction: impl IntoExpression<bool>) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.where_(restriction))
    }

    pub fn where_all(
        &mut self,
        restrictions: impl IntoIterator<Item = Predicate>,
    ) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.where_all(restrictions))
    }

    pub fn group_by(&mut self, grouping: impl IntoIterator<Item = Expr>) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.group_by(grouping))
    }

    pub fn having(&mut self, restriction: impl IntoExpression<bool>) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.having(restriction))
    }

    pub fn having_all(
        &mut self,
        restrictions: impl IntoIterator<Item = Predicate>,
    ) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.having_all(restrictions))
    }

    pub fn order_by(&mut self, orders: impl IntoIterator<Item = Order>) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.order_by(orders))
    }

    pub fn distinct(&mut self, distinct: bool) -> Result<&mut QueryDefinition<T>> {
        Ok(self.query()?.distinct(distinct))
    }

    /// Orders by `x` ascending, replacing any previous ordering.
    pub fn order_asc<V>(&mut self, x: impl IntoExpression<V>) -> Result<&mut QueryDefinition<T>> {
        let order = self.algebra()?.asc(x);
        self.order_by([order])
    }

    /// Orders by `x` descending, replacing any previous ordering.
    pub fn order_desc<V>(&mut self, x: impl IntoExpression<V>) -> Result<&mut QueryDefinition<T>> {
        let order = self.algebra()?.desc(x);
        self.order_by([order])
    }

    pub fn asc<V>(&self, x: impl IntoExpression<V>) -> Result<Order> {
        Ok(self.algebra()?.asc(x))
    }

    pub fn desc<V>(&self, x: impl IntoExpression<V>) -> Result<Order> {
        Ok(self.algebra()?.desc(x))
    }

    /// Lower-cases a string path.
    pub fn lower_path(&self, x: impl IntoExpression<String>) -> Result<Expression<String>> {
        Ok(self.algebra()?.lower(x))
    }

    /// Returns the ordering of the bound query.
    pub fn order_list(&self) -> Result<&[Order]> {
        Ok(self.query_ref()?.order_list())
    }

    /// Returns the parameters of the bound query.
    pub fn parameters(&self) -> Result<HashSet<ParameterRef>> {
        Ok(self.query_ref()?.parameters())
    }
}

impl<'a, T: Entity> Context<'a, T> {
    /// Selects the root entity itself.
    pub fn select_root(&mut self) -> Result<&mut QueryDefinition<T>> {
        let root = self.root()?;
        self.select(root)
    }

    /// Returns the metadata of the root entity.
    pub fn root_model(&self) -> Result<&'a EntityModel> {
        Ok(self.root()?.model())
    }

    /// Resolves an attribute of the root.
    pub fn get<V: SqlType>(&self, name: &str) -> Result<Expression<V>> {
        self.root()?.get(name)
    }

    pub fn get_string(&self, name: &str) -> Result<Expression<String>> {
        self.get(name)
    }

    pub fn get_int(&self, name: &str) -> Result<Expression<i32>> {
        self.get(name)
    }

    pub fn get_long(&self, name: &str) -> Result<Expression<i64>> {
        self.get(name)
    }

    pub fn get_float(&self, name: &str) -> Result<Expression<f32>> {
        self.get(name)
    }

    pub fn get_double(&self, name: &str) -> Result<Expression<f64>> {
        self.get(name)
    }

    pub fn get_big_decimal(&self, name: &str) -> Result<Expression<Decimal>> {
        self.get(name)
    }

    pub fn get_big_integer(&self, name: &str) -> Result<Expression<BigInt>> {
        self.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<Expression<bool>> {
        self.get(name)
    }

    pub fn get_date(&self, name: &str) -> Result<Expression<Date>> {
        self.get(name)
    }

    pub fn get_timestamp(&self, name: &str) -> Result<Expression<Timestamp>> {
        self.get(name)
    }

    /// Case-insensitive substring test on the string attribute `column`.
    pub fn contains_ignore_case(&self, column: &str, text: &str) -> Result<Predicate> {
        let subject = self.get_string(column)?;
        Ok(self.algebra()?.contains_ignore_case(subject, text))
    }
}
