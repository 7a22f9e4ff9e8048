//! Expression AST definitions.
//!
//! `Expr` is the untyped node tree every typed `Expression<V>` wraps. Each
//! node knows its result `DataType`; computed nodes are built through
//! [`Expr::computed`], which checks the operand types against the operator
//! signature before the node exists.

use super::signature;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use criteria_core::{DataType, Result, Value};

/// One association step of a path, optionally narrowed to a subtype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JoinStep {
    /// Association attribute followed.
    pub attribute: String,
    /// Entity this step has been treated as, if narrowed.
    pub treated_as: Option<String>,
}

/// Where a column reference starts: an aliased entity root, optionally
/// navigated through associations. The root and every step may each be
/// narrowed to a subtype.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSource {
    /// Entity name of the query root.
    pub entity: String,
    /// Alias identifying the root within its query tree.
    pub alias: String,
    /// Entity the root has been treated as, if narrowed.
    pub treated_as: Option<String>,
    /// Association steps followed from the root.
    pub joins: Vec<JoinStep>,
}

impl PathSource {
    /// Creates a source for an entity root known by `alias`.
    pub fn root(entity: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            alias: alias.into(),
            treated_as: None,
            joins: Vec::new(),
        }
    }

    /// Returns a source one association further.
    pub fn join(&self, attribute: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.joins.push(JoinStep {
            attribute: attribute.into(),
            treated_as: None,
        });
        next
    }

    /// Returns the same source with its last step narrowed to `entity`.
    pub fn treat(&self, entity: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match next.joins.last_mut() {
            Some(step) => &mut step.treated_as,
            None => &mut next.treated_as,
        };
        *slot = Some(entity.into());
        next
    }

    /// Returns the subtype the path currently ends in, if narrowed.
    pub fn narrowed_to(&self) -> Option<&str> {
        match self.joins.last() {
            Some(step) => step.treated_as.as_deref(),
            None => self.treated_as.as_deref(),
        }
    }

    /// Returns the rendered path, e.g. `treat(r0.manager as Employee).dept`.
    pub fn path(&self) -> String {
        let mut out = self.alias.clone();
        if let Some(entity) = &self.treated_as {
            out = alloc::format!("treat({} as {})", out, entity);
        }
        for step in &self.joins {
            out.push('.');
            out.push_str(&step.attribute);
            if let Some(entity) = &step.treated_as {
                out = alloc::format!("treat({} as {})", out, entity);
            }
        }
        out
    }
}

/// Reference to an attribute of an entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Entity path the attribute is read from.
    pub source: PathSource,
    /// Attribute name.
    pub attribute: String,
    /// Declared attribute type.
    pub data_type: DataType,
}

impl ColumnRef {
    /// Creates a new column reference.
    pub fn new(source: PathSource, attribute: impl Into<String>, data_type: DataType) -> Self {
        Self {
            source,
            attribute: attribute.into(),
            data_type,
        }
    }

    /// Returns the qualified name (alias.joins.attribute).
    pub fn qualified_name(&self) -> String {
        alloc::format!("{}.{}", self.source.path(), self.attribute)
    }
}

/// A placeholder bound at execution time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterRef {
    /// Position assigned by the algebra provider.
    pub id: u32,
    /// Optional name.
    pub name: Option<String>,
    /// Type the bound value must have.
    pub data_type: DataType,
}

/// Aggregate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    Avg,
    Sum,
    SumAsLong,
    SumAsDouble,
    Max,
    Min,
    Greatest,
    Least,
    Count,
    CountDistinct,
}

/// Which side(s) of a string `trim` removes characters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TrimSpec {
    Leading,
    Trailing,
    #[default]
    Both,
}

/// Operators of computed expressions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    // Equality and generic comparison
    Eq,
    Ne,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    In,
    // Numeric comparison
    Gt,
    Ge,
    Lt,
    Le,
    // Logical
    And,
    Or,
    Not,
    IsTrue,
    IsFalse,
    IsNull,
    IsNotNull,
    // Arithmetic
    Neg,
    Abs,
    Sum,
    Prod,
    Diff,
    Quot,
    Mod,
    Sqrt,
    // Casts
    ToLong,
    ToFloat,
    ToDouble,
    ToBigDecimal,
    ToBigInteger,
    ToString,
    // Aggregates
    Aggregate(AggregateFunc),
    // String
    Like,
    NotLike,
    Concat,
    Substring,
    Trim(TrimSpec),
    Lower,
    Upper,
    Length,
    Locate,
    // Date/time
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    // Collection
    IsEmpty,
    IsNotEmpty,
    Size,
    IsMember,
    IsNotMember,
    // Conditional
    Coalesce,
    NullIf,
    // Subquery
    Exists,
    All,
    Any,
    Some,
    /// Database function with a declared result type.
    Function { name: String, returns: DataType },
}

impl Operator {
    /// Returns the operator name used in error messages and rendering.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq => "equal",
            Operator::Ne => "notEqual",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqualTo",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEqual => "lessThanOrEqualTo",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::IsTrue => "isTrue",
            Operator::IsFalse => "isFalse",
            Operator::IsNull => "isNull",
            Operator::IsNotNull => "isNotNull",
            Operator::Neg => "neg",
            Operator::Abs => "abs",
            Operator::Sum => "sum",
            Operator::Prod => "prod",
            Operator::Diff => "diff",
            Operator::Quot => "quot",
            Operator::Mod => "mod",
            Operator::Sqrt => "sqrt",
            Operator::ToLong => "toLong",
            Operator::ToFloat => "toFloat",
            Operator::ToDouble => "toDouble",
            Operator::ToBigDecimal => "toBigDecimal",
            Operator::ToBigInteger => "toBigInteger",
            Operator::ToString => "toString",
            Operator::Aggregate(func) => match func {
                AggregateFunc::Avg => "avg",
                AggregateFunc::Sum => "sum",
                AggregateFunc::SumAsLong => "sumAsLong",
                AggregateFunc::SumAsDouble => "sumAsDouble",
                AggregateFunc::Max => "max",
                AggregateFunc::Min => "min",
                AggregateFunc::Greatest => "greatest",
                AggregateFunc::Least => "least",
                AggregateFunc::Count => "count",
                AggregateFunc::CountDistinct => "countDistinct",
            },
            Operator::Like => "like",
            Operator::NotLike => "notLike",
            Operator::Concat => "concat",
            Operator::Substring => "substring",
            Operator::Trim(_) => "trim",
            Operator::Lower => "lower",
            Operator::Upper => "upper",
            Operator::Length => "length",
            Operator::Locate => "locate",
            Operator::CurrentDate => "currentDate",
            Operator::CurrentTime => "currentTime",
            Operator::CurrentTimestamp => "currentTimestamp",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::Size => "size",
            Operator::IsMember => "isMember",
            Operator::IsNotMember => "isNotMember",
            Operator::Coalesce => "coalesce",
            Operator::NullIf => "nullif",
            Operator::Exists => "exists",
            Operator::All => "all",
            Operator::Any => "any",
            Operator::Some => "some",
            Operator::Function { .. } => "function",
        }
    }

    /// Returns true for operators producing a boolean condition.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
                | Operator::Between
                | Operator::In
                | Operator::Gt
                | Operator::Ge
                | Operator::Lt
                | Operator::Le
                | Operator::And
                | Operator::Or
                | Operator::Not
                | Operator::IsTrue
                | Operator::IsFalse
                | Operator::IsNull
                | Operator::IsNotNull
                | Operator::Like
                | Operator::NotLike
                | Operator::IsEmpty
                | Operator::IsNotEmpty
                | Operator::IsMember
                | Operator::IsNotMember
                | Operator::Exists
        )
    }
}

/// Sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A sort key: an expression and a direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    expr: Expr,
    direction: SortOrder,
}

impl Order {
    /// Creates a sort key.
    pub fn new(expr: Expr, direction: SortOrder) -> Self {
        Self { expr, direction }
    }

    /// Returns the sorted expression.
    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns the direction.
    #[inline]
    pub fn direction(&self) -> SortOrder {
        self.direction
    }

    /// Returns true for ascending order.
    #[inline]
    pub fn is_ascending(&self) -> bool {
        self.direction == SortOrder::Asc
    }

    /// Returns the same key with the direction flipped.
    pub fn reverse(&self) -> Self {
        let direction = match self.direction {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        };
        Self {
            expr: self.expr.clone(),
            direction,
        }
    }
}

/// One `when ... then ...` arm of a case expression.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseBranch {
    /// Condition (searched case) or compared value (simple case).
    pub when: Expr,
    /// Result when the arm matches.
    pub then: Expr,
}

/// A nested query used as an operand.
#[derive(Clone, Debug, PartialEq)]
pub struct SubqueryDef {
    pub roots: Vec<PathSource>,
    pub selection: Option<Box<Expr>>,
    pub restrictions: Vec<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Vec<Expr>,
    pub distinct: bool,
    pub data_type: DataType,
}

/// Expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Literal value with its declared type.
    Literal { value: Value, data_type: DataType },
    /// Execution-time parameter.
    Parameter(ParameterRef),
    /// Attribute of an entity.
    Column(ColumnRef),
    /// An entity root or join itself.
    Entity {
        source: PathSource,
        data_type: DataType,
    },
    /// Operator applied to operands.
    Computed {
        op: Operator,
        args: Vec<Expr>,
        data_type: DataType,
    },
    /// CASE expression; `operand` is set for the simple form.
    Case {
        operand: Option<Box<Expr>>,
        branches: Vec<CaseBranch>,
        otherwise: Option<Box<Expr>>,
        data_type: DataType,
    },
    /// Nested query.
    Subquery(Box<SubqueryDef>),
}

impl Expr {
    /// Creates a literal expression, inferring the type from the value.
    ///
    /// Null and empty lists carry no type; use [`Expr::typed_literal`].
    pub fn literal(value: impl Into<Value>) -> Option<Self> {
        let value = value.into();
        let data_type = value.data_type()?;
        Some(Expr::Literal { value, data_type })
    }

    /// Creates a literal expression with an explicit type.
    pub fn typed_literal(value: Value, data_type: DataType) -> Self {
        Expr::Literal { value, data_type }
    }

    /// Creates a typed null literal.
    pub fn null(data_type: DataType) -> Self {
        Expr::Literal {
            value: Value::Null,
            data_type,
        }
    }

    /// Creates a column reference expression.
    pub fn column(source: PathSource, attribute: impl Into<String>, data_type: DataType) -> Self {
        Expr::Column(ColumnRef::new(source, attribute, data_type))
    }

    /// Applies `op` to `args`, checking the operator signature first.
    pub fn computed(op: Operator, args: Vec<Expr>) -> Result<Self> {
        let data_type = signature::check(&op, &args)?;
        log::trace!("built {} -> {}", op.name(), data_type);
        Ok(Expr::Computed {
            op,
            args,
            data_type,
        })
    }

    /// Builds a computed node whose operand types are already guaranteed by
    /// the typed layer.
    pub(crate) fn computed_trusted(op: Operator, args: Vec<Expr>, data_type: DataType) -> Self {
        debug_assert!(
            signature::check(&op, &args).is_ok(),
            "typed {} built with ill-typed operands",
            op.name()
        );
        Expr::Computed {
            op,
            args,
            data_type,
        }
    }

    /// Builds a case expression, checking arm and result types.
    pub fn case(
        operand: Option<Expr>,
        branches: Vec<CaseBranch>,
        otherwise: Option<Expr>,
        data_type: DataType,
    ) -> Result<Self> {
        signature::check_case(operand.as_ref(), &branches, otherwise.as_ref(), &data_type)?;
        Ok(Expr::Case {
            operand: operand.map(Box::new),
            branches,
            otherwise: otherwise.map(Box::new),
            data_type,
        })
    }

    /// Returns the result type of this expression.
    pub fn data_type(&self) -> &DataType {
        match self {
            Expr::Literal { data_type, .. } => data_type,
            Expr::Parameter(p) => &p.data_type,
            Expr::Column(c) => &c.data_type,
            Expr::Entity { data_type, .. } => data_type,
            Expr::Computed { data_type, .. } => data_type,
            Expr::Case { data_type, .. } => data_type,
            Expr::Subquery(def) => &def.data_type,
        }
    }

    /// Returns true if this expression yields a boolean.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        *self.data_type() == DataType::Boolean
    }

    /// Returns the operator if this is a computed node.
    pub fn operator(&self) -> Option<&Operator> {
        match self {
            Expr::Computed { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Returns the operands if this is a computed node.
    pub fn args(&self) -> &[Expr] {
        match self {
            Expr::Computed { args, .. } => args,
            _ => &[],
        }
    }

    /// Returns true for the empty AND (`conjunction`).
    pub fn is_conjunction(&self) -> bool {
        matches!(self, Expr::Computed { op: Operator::And, args, .. } if args.is_empty())
    }

    /// Returns true for the empty OR (`disjunction`).
    pub fn is_disjunction(&self) -> bool {
        matches!(self, Expr::Computed { op: Operator::Or, args, .. } if args.is_empty())
    }

    /// Calls `f` for every parameter in this tree, nested queries included.
    pub fn visit_parameters<'e>(&'e self, f: &mut impl FnMut(&'e ParameterRef)) {
        match self {
            Expr::Parameter(p) => f(p),
            Expr::Literal { .. } | Expr::Column(_) | Expr::Entity { .. } => {}
            Expr::Computed { args, .. } => {
                for arg in args {
                    arg.visit_parameters(f);
                }
            }
            Expr::Case {
                operand,
                branches,
                otherwise,
                ..
            } => {
                if let Some(operand) = operand {
                    operand.visit_parameters(f);
                }
                for branch in branches {
                    branch.when.visit_parameters(f);
                    branch.then.visit_parameters(f);
                }
                if let Some(otherwise) = otherwise {
                    otherwise.visit_parameters(f);
                }
            }
            Expr::Subquery(def) => {
                let nested = def
                    .selection
                    .iter()
                    .map(|s| s.as_ref())
                    .chain(&def.restrictions)
                    .chain(&def.group_by)
                    .chain(&def.having);
                for expr in nested {
                    expr.visit_parameters(f);
                }
            }
        }
    }

    /// Returns the column references in this tree, in visiting order.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'e>(&'e self, out: &mut Vec<&'e ColumnRef>) {
        match self {
            Expr::Column(c) => out.push(c),
            Expr::Computed { args, .. } => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
            Expr::Case {
                operand,
                branches,
                otherwise,
                ..
            } => {
                if let Some(operand) = operand {
                    operand.collect_columns(out);
                }
                for branch in branches {
                    branch.when.collect_columns(out);
                    branch.then.collect_columns(out);
                }
                if let Some(otherwise) = otherwise {
                    otherwise.collect_columns(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn name() -> Expr {
        Expr::column(PathSource::root("Person", "r0"), "name", DataType::String)
    }

    fn age() -> Expr {
        Expr::column(PathSource::root("Person", "r0"), "age", DataType::Int32)
    }

    #[test]
    fn test_column_ref() {
        let source = PathSource::root("Person", "r0").join("address");
        let col = ColumnRef::new(source, "city", DataType::String);
        assert_eq!(col.qualified_name(), "r0.address.city");
    }

    #[test]
    fn test_roots_differ_by_alias() {
        let outer = ColumnRef::new(PathSource::root("Person", "r0"), "age", DataType::Int32);
        let inner = ColumnRef::new(PathSource::root("Person", "s0_r0"), "age", DataType::Int32);
        assert_ne!(outer, inner);
        assert_eq!(inner.qualified_name(), "s0_r0.age");
    }

    #[test]
    fn test_treat_applies_to_last_step() {
        let root = PathSource::root("Person", "r0").treat("Employee");
        assert_eq!(root.narrowed_to(), Some("Employee"));

        let dept = root.join("dept");
        assert_eq!(dept.narrowed_to(), None);
        assert_eq!(dept.treated_as.as_deref(), Some("Employee"));
        assert_eq!(dept.path(), "treat(r0 as Employee).dept");

        let narrowed = dept.treat("Lab");
        assert_eq!(narrowed.narrowed_to(), Some("Lab"));
        assert_eq!(narrowed.path(), "treat(treat(r0 as Employee).dept as Lab)");
    }

    #[test]
    fn test_literal_inference() {
        let lit = Expr::literal(42i64).unwrap();
        assert_eq!(lit.data_type(), &DataType::Int64);
        assert!(Expr::literal(Value::Null).is_none());
        assert_eq!(Expr::null(DataType::String).data_type(), &DataType::String);
    }

    #[test]
    fn test_computed_checks_signature() {
        let sum = Expr::computed(Operator::Sum, vec![age(), Expr::literal(1i32).unwrap()]);
        assert_eq!(sum.unwrap().data_type(), &DataType::Int32);

        let err = Expr::computed(Operator::Sum, vec![name(), age()]).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_conjunction_detection() {
        let conj = Expr::computed(Operator::And, vec![]).unwrap();
        assert!(conj.is_conjunction());
        assert!(!conj.is_disjunction());
    }

    #[test]
    fn test_visit_parameters() {
        let param = Expr::Parameter(ParameterRef {
            id: 0,
            name: Some("min".into()),
            data_type: DataType::Int32,
        });
        let cmp = Expr::computed(Operator::Gt, vec![age(), param]).unwrap();
        let mut seen = vec![];
        cmp.visit_parameters(&mut |p| seen.push(p.id));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_columns() {
        let cmp = Expr::computed(Operator::Eq, vec![name(), Expr::literal("x").unwrap()]).unwrap();
        let cols = cmp.columns();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].attribute, "name");
    }

    #[test]
    fn test_order_reverse() {
        let order = Order::new(age(), SortOrder::Asc);
        assert!(order.is_ascending());
        assert!(!order.reverse().is_ascending());
    }
}
