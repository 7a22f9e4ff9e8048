//! Text rendering of expressions, used for logging and diagnostics.

use super::expr::{AggregateFunc, Expr, Operator, Order, SortOrder, TrimSpec};
use core::fmt;
use criteria_core::Value;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, data_type } => match value {
                Value::Null => write!(f, "null::{}", data_type),
                other => write_value(f, other),
            },
            Expr::Parameter(p) => match &p.name {
                Some(name) => write!(f, ":{}", name),
                None => write!(f, "?{}", p.id),
            },
            Expr::Column(c) => f.write_str(&c.qualified_name()),
            Expr::Entity { source, .. } => f.write_str(&source.path()),
            Expr::Computed { op, args, .. } => write_computed(f, op, args),
            Expr::Case {
                operand,
                branches,
                otherwise,
                ..
            } => {
                f.write_str("case")?;
                if let Some(operand) = operand {
                    write!(f, " {}", operand)?;
                }
                for branch in branches {
                    write!(f, " when {} then {}", branch.when, branch.then)?;
                }
                if let Some(otherwise) = otherwise {
                    write!(f, " else {}", otherwise)?;
                }
                f.write_str(" end")
            }
            Expr::Subquery(def) => {
                f.write_str("(select ")?;
                if def.distinct {
                    f.write_str("distinct ")?;
                }
                match &def.selection {
                    Some(selection) => write!(f, "{}", selection)?,
                    None => f.write_str("*")?,
                }
                for (i, root) in def.roots.iter().enumerate() {
                    f.write_str(if i == 0 { " from " } else { ", " })?;
                    write!(f, "{} {}", root.entity, root.alias)?;
                }
                write_clause(f, " where ", " and ", &def.restrictions)?;
                write_clause(f, " group by ", ", ", &def.group_by)?;
                write_clause(f, " having ", " and ", &def.having)?;
                f.write_str(")")
            }
        }
    }
}

fn write_computed(f: &mut fmt::Formatter<'_>, op: &Operator, args: &[Expr]) -> fmt::Result {
    let infix = match op {
        Operator::Eq => Some("="),
        Operator::Ne => Some("<>"),
        Operator::GreaterThan | Operator::Gt => Some(">"),
        Operator::GreaterThanOrEqual | Operator::Ge => Some(">="),
        Operator::LessThan | Operator::Lt => Some("<"),
        Operator::LessThanOrEqual | Operator::Le => Some("<="),
        Operator::Sum => Some("+"),
        Operator::Diff => Some("-"),
        Operator::Prod => Some("*"),
        Operator::Quot => Some("/"),
        Operator::Like => Some("like"),
        Operator::NotLike => Some("not like"),
        Operator::IsMember => Some("member of"),
        Operator::IsNotMember => Some("not member of"),
        _ => None,
    };
    if let (Some(symbol), [left, right, rest @ ..]) = (infix, args) {
        write!(f, "({} {} {}", left, symbol, right)?;
        if let Some(escape) = rest.first() {
            write!(f, " escape {}", escape)?;
        }
        return f.write_str(")");
    }

    match (op, args) {
        (Operator::And, []) => f.write_str("true"),
        (Operator::Or, []) => f.write_str("false"),
        (Operator::And | Operator::Or, _) => {
            let joiner = if *op == Operator::And { " and " } else { " or " };
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(joiner)?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(")")
        }
        (Operator::Not, [arg]) => write!(f, "not {}", arg),
        (Operator::IsNull, [arg]) => write!(f, "{} is null", arg),
        (Operator::IsNotNull, [arg]) => write!(f, "{} is not null", arg),
        (Operator::IsTrue, [arg]) => write!(f, "{} = true", arg),
        (Operator::IsFalse, [arg]) => write!(f, "{} = false", arg),
        (Operator::IsEmpty, [arg]) => write!(f, "{} is empty", arg),
        (Operator::IsNotEmpty, [arg]) => write!(f, "{} is not empty", arg),
        (Operator::Between, [v, low, high]) => write!(f, "({} between {} and {})", v, low, high),
        (Operator::In, [subject, alternatives @ ..]) => {
            write!(f, "{} in (", subject)?;
            write_list(f, alternatives)?;
            f.write_str(")")
        }
        (Operator::Neg, [arg]) => write!(f, "-{}", arg),
        (Operator::Mod, [a, b]) => write!(f, "mod({}, {})", a, b),
        (Operator::Aggregate(AggregateFunc::CountDistinct), [arg]) => {
            write!(f, "count(distinct {})", arg)
        }
        (Operator::Trim(spec), _) => {
            let spec = match spec {
                TrimSpec::Leading => "leading",
                TrimSpec::Trailing => "trailing",
                TrimSpec::Both => "both",
            };
            write!(f, "trim({} ", spec)?;
            write_list(f, args)?;
            f.write_str(")")
        }
        (Operator::Function { name, .. }, _) => {
            write!(f, "function('{}'", name)?;
            for arg in args {
                write!(f, ", {}", arg)?;
            }
            f.write_str(")")
        }
        (Operator::CurrentDate | Operator::CurrentTime | Operator::CurrentTimestamp, []) => {
            f.write_str(op.name())
        }
        _ => {
            write!(f, "{}(", op.name())?;
            write_list(f, args)?;
            f.write_str(")")
        }
    }
}

fn write_clause(f: &mut fmt::Formatter<'_>, head: &str, sep: &str, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        f.write_str(if i == 0 { head } else { sep })?;
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Boolean(v) => write!(f, "{}", v),
        Value::Int32(v) => write!(f, "{}", v),
        Value::Int64(v) => write!(f, "{}L", v),
        Value::Float32(v) => write!(f, "{}F", v),
        Value::Float64(v) => write!(f, "{}D", v),
        Value::BigDecimal(v) => write!(f, "{}BD", v),
        Value::BigInteger(v) => write!(f, "{}BI", v),
        Value::Char(v) => write!(f, "'{}'", v),
        Value::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
        Value::Date(v) => write!(f, "{{d {}}}", v.days()),
        Value::Time(v) => write!(f, "{{t {}}}", v.millis()),
        Value::Timestamp(v) => write!(f, "{{ts {}}}", v.millis()),
        Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        Value::List(items) => {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str(")")
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction() {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        write!(f, "{} {}", self.expr(), direction)
    }
}
