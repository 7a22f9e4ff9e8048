//! Entity roots, joins and typed attribute access.
//!
//! Attribute access goes through [`EntityPath::get`], which checks the
//! requested host type against the declared attribute type before handing
//! out a column expression, so a wrong `get::<V>` fails where it is written
//! rather than when the query runs.

use crate::ast::{Expr, Expression, IntoExpression, PathSource, SqlType};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use criteria_core::schema::{Entity, EntityModel};
use criteria_core::{BigInt, DataType, Date, Decimal, Error, Result, Timestamp};

/// Shared accessors of roots and joins.
pub trait EntityPath {
    /// Entity type this path points at.
    type Entity: Entity;

    /// Returns the metadata of the entity.
    fn model(&self) -> &EntityModel;

    /// Returns where column references of this path start.
    fn source(&self) -> &PathSource;

    /// Resolves `name` to a column expression of type `V`.
    ///
    /// Fails with `AttributeNotFound` for unknown names and `AttributeType`
    /// when `V` disagrees with the declared type.
    fn get<V: SqlType>(&self, name: &str) -> Result<Expression<V>> {
        let attribute = self.model().resolve(name, &V::data_type())?;
        Ok(Expression::from_expr(Expr::column(
            self.source().clone(),
            attribute.name(),
            attribute.data_type().clone(),
        )))
    }

    fn get_string(&self, name: &str) -> Result<Expression<String>> {
        self.get(name)
    }

    fn get_int(&self, name: &str) -> Result<Expression<i32>> {
        self.get(name)
    }

    fn get_long(&self, name: &str) -> Result<Expression<i64>> {
        self.get(name)
    }

    fn get_float(&self, name: &str) -> Result<Expression<f32>> {
        self.get(name)
    }

    fn get_double(&self, name: &str) -> Result<Expression<f64>> {
        self.get(name)
    }

    fn get_big_decimal(&self, name: &str) -> Result<Expression<Decimal>> {
        self.get(name)
    }

    fn get_big_integer(&self, name: &str) -> Result<Expression<BigInt>> {
        self.get(name)
    }

    fn get_bool(&self, name: &str) -> Result<Expression<bool>> {
        self.get(name)
    }

    fn get_date(&self, name: &str) -> Result<Expression<Date>> {
        self.get(name)
    }

    fn get_timestamp(&self, name: &str) -> Result<Expression<Timestamp>> {
        self.get(name)
    }

    /// Resolves a collection of entities `E`.
    fn get_collection<E: Entity>(&self, name: &str) -> Result<Expression<Vec<E>>> {
        let requested = DataType::collection_of(DataType::Entity(E::entity_name()));
        let attribute = self.model().resolve(name, &requested)?;
        Ok(Expression::from_expr(Expr::column(
            self.source().clone(),
            attribute.name(),
            requested,
        )))
    }

    /// Navigates the association `name`, single or collection valued.
    fn join<U: Entity>(&self, name: &str) -> Result<Join<Self::Entity, U>> {
        let model = self.model();
        let attribute = model
            .get_attribute(name)
            .ok_or_else(|| Error::attribute_not_found(model.name(), name))?;
        let target = DataType::Entity(U::entity_name());
        let declared = attribute.data_type();
        if *declared != target && declared.element_type() != Some(&target) {
            return Err(Error::attribute_type(
                model.name(),
                name,
                declared.clone(),
                target,
            ));
        }
        Ok(Join {
            model: U::model(),
            source: self.source().join(name),
            marker: PhantomData,
        })
    }

    /// The path itself as an entity-valued expression.
    fn expression(&self) -> Expression<Self::Entity> {
        let data_type = match self.source().narrowed_to() {
            Some(entity) => DataType::Entity(entity.into()),
            None => self.model().data_type(),
        };
        Expression::from_expr(Expr::Entity {
            source: self.source().clone(),
            data_type,
        })
    }
}

/// The queried entity `T`, source of column references.
pub struct Root<T> {
    model: EntityModel,
    source: PathSource,
    marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Root<T> {
    /// Creates the root of `T` known as `alias` in its query tree.
    pub(crate) fn new(alias: String) -> Self {
        let model = T::model();
        let source = PathSource::root(model.name(), alias);
        Self {
            model,
            source,
            marker: PhantomData,
        }
    }

    /// Returns the alias identifying this root.
    pub fn alias(&self) -> &str {
        &self.source.alias
    }

    /// Reinterprets this root as entity `Y`, keeping the source path.
    pub(crate) fn narrow<Y: Entity>(&self) -> Root<Y> {
        let model = Y::model();
        Root {
            source: self.source.treat(model.name()),
            model,
            marker: PhantomData,
        }
    }
}

impl<T: Entity> EntityPath for Root<T> {
    type Entity = T;

    fn model(&self) -> &EntityModel {
        &self.model
    }

    fn source(&self) -> &PathSource {
        &self.source
    }
}

impl<T> Clone for Root<T> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            source: self.source.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Root<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("entity", &self.model.name())
            .field("source", &self.source)
            .finish()
    }
}

impl<T: Entity> IntoExpression<T> for &Root<T> {
    fn into_expression(self) -> Expression<T> {
        self.expression()
    }
}

/// An association from entity `X` to entity `Y`.
pub struct Join<X, Y> {
    model: EntityModel,
    source: PathSource,
    marker: PhantomData<fn() -> (X, Y)>,
}

impl<X, Y: Entity> Join<X, Y> {
    pub(crate) fn narrow<Z: Entity>(&self) -> Join<X, Z> {
        let model = Z::model();
        Join {
            source: self.source.treat(model.name()),
            model,
            marker: PhantomData,
        }
    }
}

impl<X, Y: Entity> EntityPath for Join<X, Y> {
    type Entity = Y;

    fn model(&self) -> &EntityModel {
        &self.model
    }

    fn source(&self) -> &PathSource {
        &self.source
    }
}

impl<X, Y> Clone for Join<X, Y> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            source: self.source.clone(),
            marker: PhantomData,
        }
    }
}

impl<X, Y> fmt::Debug for Join<X, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Join")
            .field("entity", &self.model.name())
            .field("source", &self.source)
            .finish()
    }
}

impl<X, Y: Entity> IntoExpression<Y> for &Join<X, Y> {
    fn into_expression(self) -> Expression<Y> {
        self.expression()
    }
}
