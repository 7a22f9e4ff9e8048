//! Typed views over the expression AST.
//!
//! `Expression<V>` wraps an [`Expr`] whose result type is statically known to
//! be `V`. The algebra only accepts operands whose `V` satisfies the operator
//! (for example `Numeric` for arithmetic), so an ill-typed combination does not
//! compile. Untyped nodes enter the typed world through
//! [`Expression::try_from_expr`], which checks the node type against `V`.

use super::expr::{Expr, ParameterRef};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, Not};
use criteria_core::{BigInt, DataType, Date, Decimal, Error, Result, Time, Timestamp, Value};

/// A host type with a fixed query data type.
pub trait SqlType: 'static {
    /// Returns the data type expressions of this host type produce.
    fn data_type() -> DataType;
}

/// A host value that can be embedded as a literal.
pub trait LiteralValue: SqlType {
    /// Converts the host value into a literal value.
    fn into_value(self) -> Value;
}

/// Numeric host types.
pub trait Numeric: LiteralValue {}

/// Host types with a total order.
pub trait Comparable: LiteralValue {}

macro_rules! scalar_types {
    ($($host:ty => $data_type:ident),* $(,)?) => {
        $(
            impl SqlType for $host {
                fn data_type() -> DataType {
                    DataType::$data_type
                }
            }

            impl LiteralValue for $host {
                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }

            impl Comparable for $host {}
        )*
    };
}

scalar_types! {
    bool => Boolean,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => BigDecimal,
    BigInt => BigInteger,
    char => Char,
    String => String,
    Date => Date,
    Time => Time,
    Timestamp => Timestamp,
}

impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for f32 {}
impl Numeric for f64 {}
impl Numeric for Decimal {}
impl Numeric for BigInt {}

impl<E: SqlType> SqlType for Vec<E> {
    fn data_type() -> DataType {
        DataType::collection_of(E::data_type())
    }
}

impl<E: LiteralValue> LiteralValue for Vec<E> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(LiteralValue::into_value).collect())
    }
}

/// A typed expression producing values of type `V`.
pub struct Expression<V> {
    node: Expr,
    marker: PhantomData<fn() -> V>,
}

/// A boolean expression used as a condition.
pub type Predicate = Expression<bool>;

impl<V> Expression<V> {
    /// Wraps a node already known to produce `V`.
    pub(crate) fn from_expr(node: Expr) -> Self {
        Self {
            node,
            marker: PhantomData,
        }
    }

    /// Returns the untyped node.
    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.node
    }

    /// Consumes the wrapper and returns the untyped node.
    #[inline]
    pub fn into_expr(self) -> Expr {
        self.node
    }

    /// Returns the result data type.
    #[inline]
    pub fn data_type(&self) -> &DataType {
        self.node.data_type()
    }
}

impl<V: SqlType> Expression<V> {
    /// Wraps an untyped node, checking that it produces `V`.
    pub fn try_from_expr(node: Expr) -> Result<Self> {
        let expected = V::data_type();
        if *node.data_type() != expected {
            return Err(Error::type_mismatch(
                "expression",
                expected.to_string(),
                node.data_type().clone(),
            ));
        }
        Ok(Self::from_expr(node))
    }
}

impl<V: LiteralValue> Expression<V> {
    /// Creates a literal expression.
    pub fn literal(value: V) -> Self {
        Self::from_expr(Expr::typed_literal(value.into_value(), V::data_type()))
    }
}

impl<V> Clone for Expression<V> {
    fn clone(&self) -> Self {
        Self::from_expr(self.node.clone())
    }
}

impl<V> fmt::Debug for Expression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.node).finish()
    }
}

impl<V> fmt::Display for Expression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.node, f)
    }
}

impl<V> PartialEq for Expression<V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<V> From<Expression<V>> for Expr {
    fn from(expr: Expression<V>) -> Self {
        expr.node
    }
}

impl<V> From<&Expression<V>> for Expr {
    fn from(expr: &Expression<V>) -> Self {
        expr.node.clone()
    }
}

impl BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Self) -> Self::Output {
        crate::algebra::junction(crate::ast::Operator::And, [self, rhs])
    }
}

impl BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Self) -> Self::Output {
        crate::algebra::junction(crate::ast::Operator::Or, [self, rhs])
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        crate::algebra::negate(self)
    }
}

/// A typed execution-time parameter.
pub struct ParameterExpression<V> {
    parameter: ParameterRef,
    marker: PhantomData<fn() -> V>,
}

impl<V: SqlType> ParameterExpression<V> {
    pub(crate) fn new(id: u32, name: Option<String>) -> Self {
        Self {
            parameter: ParameterRef {
                id,
                name,
                data_type: V::data_type(),
            },
            marker: PhantomData,
        }
    }
}

impl<V> ParameterExpression<V> {
    /// Returns the parameter position.
    #[inline]
    pub fn id(&self) -> u32 {
        self.parameter.id
    }

    /// Returns the parameter name, if named.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.parameter.name.as_deref()
    }

    /// Returns the untyped parameter.
    #[inline]
    pub fn parameter(&self) -> &ParameterRef {
        &self.parameter
    }

    /// Returns the parameter as an expression.
    pub fn expression(&self) -> Expression<V> {
        Expression::from_expr(Expr::Parameter(self.parameter.clone()))
    }
}

impl<V> Clone for ParameterExpression<V> {
    fn clone(&self) -> Self {
        Self {
            parameter: self.parameter.clone(),
            marker: PhantomData,
        }
    }
}

impl<V> fmt::Debug for ParameterExpression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParameterExpression")
            .field(&self.parameter)
            .finish()
    }
}

/// Anything usable as an operand of type `V`: expressions, parameters and
/// plain host values.
///
/// This is what lets `gt(age, 5)` and `gt(age, other_age)` share one method.
pub trait IntoExpression<V> {
    /// Converts the operand into a typed expression.
    fn into_expression(self) -> Expression<V>;
}

impl<V> IntoExpression<V> for Expression<V> {
    fn into_expression(self) -> Expression<V> {
        self
    }
}

impl<V> IntoExpression<V> for &Expression<V> {
    fn into_expression(self) -> Expression<V> {
        self.clone()
    }
}

impl<V> IntoExpression<V> for ParameterExpression<V> {
    fn into_expression(self) -> Expression<V> {
        self.expression()
    }
}

impl<V> IntoExpression<V> for &ParameterExpression<V> {
    fn into_expression(self) -> Expression<V> {
        self.expression()
    }
}

impl<V: LiteralValue> IntoExpression<V> for V {
    fn into_expression(self) -> Expression<V> {
        Expression::literal(self)
    }
}

impl IntoExpression<String> for &str {
    fn into_expression(self) -> Expression<String> {
        Expression::literal(self.to_string())
    }
}
