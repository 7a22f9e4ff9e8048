//! String functions and pattern matching.

use super::{apply, condition, Algebra};
use crate::ast::{Expr, Expression, IntoExpression, Operator, Predicate, TrimSpec};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use criteria_core::DataType;

impl Algebra {
    pub fn like(&self, x: impl IntoExpression<String>, pattern: impl IntoExpression<String>) -> Predicate {
        matching(Operator::Like, x, pattern, None)
    }

    /// `like` with an escape character for `%` and `_` in the pattern.
    pub fn like_escape(
        &self,
        x: impl IntoExpression<String>,
        pattern: impl IntoExpression<String>,
        escape: impl IntoExpression<char>,
    ) -> Predicate {
        matching(Operator::Like, x, pattern, Some(escape.into_expression().into_expr()))
    }

    pub fn not_like(
        &self,
        x: impl IntoExpression<String>,
        pattern: impl IntoExpression<String>,
    ) -> Predicate {
        matching(Operator::NotLike, x, pattern, None)
    }

    pub fn not_like_escape(
        &self,
        x: impl IntoExpression<String>,
        pattern: impl IntoExpression<String>,
        escape: impl IntoExpression<char>,
    ) -> Predicate {
        matching(Operator::NotLike, x, pattern, Some(escape.into_expression().into_expr()))
    }

    /// Tests whether `x` contains `text`.
    ///
    /// Wildcards in `text` are passed through unescaped.
    pub fn contains(&self, x: impl IntoExpression<String>, text: &str) -> Predicate {
        self.like(x, format!("%{}%", text))
    }

    /// Case-insensitive [`contains`](Self::contains): both sides are lower-cased.
    pub fn contains_ignore_case(&self, x: impl IntoExpression<String>, text: &str) -> Predicate {
        self.contains(self.lower(x), &text.to_lowercase())
    }

    pub fn concat(
        &self,
        x: impl IntoExpression<String>,
        y: impl IntoExpression<String>,
    ) -> Expression<String> {
        string(
            Operator::Concat,
            vec![x.into_expression().into_expr(), y.into_expression().into_expr()],
        )
    }

    /// Substring from the 1-based position `from` to the end.
    pub fn substring(
        &self,
        x: impl IntoExpression<String>,
        from: impl IntoExpression<i32>,
    ) -> Expression<String> {
        string(
            Operator::Substring,
            vec![x.into_expression().into_expr(), from.into_expression().into_expr()],
        )
    }

    /// Substring of `len` characters from the 1-based position `from`.
    pub fn substring_len(
        &self,
        x: impl IntoExpression<String>,
        from: impl IntoExpression<i32>,
        len: impl IntoExpression<i32>,
    ) -> Expression<String> {
        string(
            Operator::Substring,
            vec![
                x.into_expression().into_expr(),
                from.into_expression().into_expr(),
                len.into_expression().into_expr(),
            ],
        )
    }

    /// Trims blanks from both ends.
    pub fn trim(&self, x: impl IntoExpression<String>) -> Expression<String> {
        self.trim_spec(TrimSpec::Both, x)
    }

    /// Trims blanks from the side(s) named by `spec`.
    pub fn trim_spec(&self, spec: TrimSpec, x: impl IntoExpression<String>) -> Expression<String> {
        string(Operator::Trim(spec), vec![x.into_expression().into_expr()])
    }

    /// Trims `character` from the side(s) named by `spec`.
    pub fn trim_char(
        &self,
        spec: TrimSpec,
        character: impl IntoExpression<char>,
        x: impl IntoExpression<String>,
    ) -> Expression<String> {
        string(
            Operator::Trim(spec),
            vec![character.into_expression().into_expr(), x.into_expression().into_expr()],
        )
    }

    pub fn lower(&self, x: impl IntoExpression<String>) -> Expression<String> {
        string(Operator::Lower, vec![x.into_expression().into_expr()])
    }

    pub fn upper(&self, x: impl IntoExpression<String>) -> Expression<String> {
        string(Operator::Upper, vec![x.into_expression().into_expr()])
    }

    pub fn length(&self, x: impl IntoExpression<String>) -> Expression<i32> {
        apply(Operator::Length, vec![x.into_expression().into_expr()], DataType::Int32)
    }

    /// 1-based position of `pattern` in `x`, 0 when absent.
    pub fn locate(
        &self,
        x: impl IntoExpression<String>,
        pattern: impl IntoExpression<String>,
    ) -> Expression<i32> {
        let args = vec![x.into_expression().into_expr(), pattern.into_expression().into_expr()];
        apply(Operator::Locate, args, DataType::Int32)
    }

    /// Like [`locate`](Self::locate), searching from position `from`.
    pub fn locate_from(
        &self,
        x: impl IntoExpression<String>,
        pattern: impl IntoExpression<String>,
        from: impl IntoExpression<i32>,
    ) -> Expression<i32> {
        let args = vec![
            x.into_expression().into_expr(),
            pattern.into_expression().into_expr(),
            from.into_expression().into_expr(),
        ];
        apply(Operator::Locate, args, DataType::Int32)
    }
}

fn matching(
    op: Operator,
    x: impl IntoExpression<String>,
    pattern: impl IntoExpression<String>,
    escape: Option<Expr>,
) -> Predicate {
    let mut args: Vec<Expr> = vec![x.into_expression().into_expr(), pattern.into_expression().into_expr()];
    args.extend(escape);
    condition(op, args)
}

fn string(op: Operator, args: Vec<Expr>) -> Expression<String> {
    apply(op, args, DataType::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PathSource;

    fn name() -> Expression<String> {
        let source = PathSource::root("Person", "r0");
        Expression::try_from_expr(Expr::column(source, "name", DataType::String)).unwrap()
    }

    #[test]
    fn test_contains_wraps_in_wildcards() {
        let cb = Algebra::new();
        assert_eq!(cb.contains(name(), "bo"), cb.like(name(), "%bo%"));
    }

    #[test]
    fn test_contains_ignore_case_lowers_both_sides() {
        let cb = Algebra::new();
        let p = cb.contains_ignore_case(name(), "AbC");
        assert_eq!(p, cb.like(cb.lower(name()), "%abc%"));
    }

    #[test]
    fn test_contains_does_not_escape_wildcards() {
        let cb = Algebra::new();
        assert_eq!(cb.contains(name(), "10%"), cb.like(name(), "%10%%"));
    }

    #[test]
    fn test_like_escape_arity() {
        let cb = Algebra::new();
        assert_eq!(cb.like_escape(name(), "a!_%", '!').expr().args().len(), 3);
        assert_eq!(cb.not_like(name(), "a%").expr().operator(), Some(&Operator::NotLike));
    }

    #[test]
    fn test_string_functions() {
        let cb = Algebra::new();
        assert_eq!(cb.length(name()).data_type(), &DataType::Int32);
        assert_eq!(cb.substring_len(name(), 1, 3).expr().args().len(), 3);
        assert_eq!(cb.trim_char(TrimSpec::Leading, '0', name()).expr().args().len(), 2);
        assert_eq!(cb.locate_from(name(), "a", 2).data_type(), &DataType::Int32);
        assert_eq!(cb.concat(name(), "!").data_type(), &DataType::String);
    }
}
