//! Collection predicates.
//!
//! A collection operand is either a collection-valued path or an in-memory
//! `Vec`, which becomes a list literal; both go through the same methods.

use super::{apply, condition, Algebra};
use crate::ast::{Expression, IntoExpression, LiteralValue, Operator, Predicate};
use alloc::vec;
use alloc::vec::Vec;
use criteria_core::DataType;

impl Algebra {
    pub fn is_empty<E>(&self, collection: impl IntoExpression<Vec<E>>) -> Predicate {
        condition(Operator::IsEmpty, vec![collection.into_expression().into_expr()])
    }

    pub fn is_not_empty<E>(&self, collection: impl IntoExpression<Vec<E>>) -> Predicate {
        condition(Operator::IsNotEmpty, vec![collection.into_expression().into_expr()])
    }

    /// Number of elements in a collection expression.
    pub fn size<E>(&self, collection: impl IntoExpression<Vec<E>>) -> Expression<i32> {
        apply(
            Operator::Size,
            vec![collection.into_expression().into_expr()],
            DataType::Int32,
        )
    }

    /// Size of an in-memory collection, as a literal.
    ///
    /// Sizes are `Int32` like [`Algebra::size`]; a collection longer than
    /// `i32::MAX` reports `i32::MAX`.
    pub fn size_of<E>(&self, collection: &[E]) -> Expression<i32> {
        Expression::literal(capped_len(collection.len()))
    }

    pub fn is_member<E>(
        &self,
        element: impl IntoExpression<E>,
        collection: impl IntoExpression<Vec<E>>,
    ) -> Predicate {
        membership(Operator::IsMember, element, collection)
    }

    pub fn is_not_member<E>(
        &self,
        element: impl IntoExpression<E>,
        collection: impl IntoExpression<Vec<E>>,
    ) -> Predicate {
        membership(Operator::IsNotMember, element, collection)
    }

    /// Values of an in-memory map as a collection literal.
    pub fn values<K, V: LiteralValue>(&self, map: impl IntoIterator<Item = (K, V)>) -> Expression<Vec<V>> {
        Expression::literal(map.into_iter().map(|(_, v)| v).collect())
    }

    /// Keys of an in-memory map as a collection literal.
    pub fn keys<K: LiteralValue, V>(&self, map: impl IntoIterator<Item = (K, V)>) -> Expression<Vec<K>> {
        Expression::literal(map.into_iter().map(|(k, _)| k).collect())
    }
}

fn capped_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

fn membership<E>(
    op: Operator,
    element: impl IntoExpression<E>,
    collection: impl IntoExpression<Vec<E>>,
) -> Predicate {
    condition(
        op,
        vec![
            element.into_expression().into_expr(),
            collection.into_expression().into_expr(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, PathSource};
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    fn tags() -> Expression<Vec<String>> {
        let node = Expr::column(
            PathSource::root("Person", "r0"),
            "tags",
            DataType::collection_of(DataType::String),
        );
        Expression::try_from_expr(node).unwrap()
    }

    #[test]
    fn test_path_and_in_memory_collections() {
        let cb = Algebra::new();
        let on_path = cb.is_member("rust", tags());
        let in_memory = cb.is_member(String::from("rust"), vec![String::from("rust")]);
        assert_eq!(on_path.expr().operator(), in_memory.expr().operator());
        assert_eq!(
            in_memory.expr().args()[1].data_type(),
            &DataType::collection_of(DataType::String)
        );
    }

    #[test]
    fn test_size_and_emptiness() {
        let cb = Algebra::new();
        assert_eq!(cb.size(tags()).data_type(), &DataType::Int32);
        assert_eq!(cb.size_of(&[1, 2, 3]), Expression::literal(3));
        assert!(cb.is_empty(vec![1i64]).expr().is_boolean());
        assert!(cb.is_not_empty(tags()).expr().is_boolean());
    }

    #[test]
    fn test_size_of_caps_at_int_max() {
        assert_eq!(capped_len(0), 0);
        assert_eq!(capped_len(i32::MAX as usize), i32::MAX);
        assert_eq!(capped_len(usize::MAX), i32::MAX);
    }

    #[test]
    fn test_map_keys_and_values() {
        let cb = Algebra::new();
        let mut map = BTreeMap::new();
        map.insert(1i32, String::from("a"));
        map.insert(2i32, String::from("b"));
        assert_eq!(cb.keys(map.clone()), Expression::literal(vec![1, 2]));
        assert_eq!(
            cb.values(map).data_type(),
            &DataType::collection_of(DataType::String)
        );
    }
}
