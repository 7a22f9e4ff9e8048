//! Operator type signatures.
//!
//! `check` returns the result type of an operator applied to the given
//! operands, or the type error that rejects the combination. Nothing is
//! coerced: an operand outside the signature is an error.

use super::expr::{AggregateFunc, CaseBranch, Expr, Operator};
use alloc::format;
use criteria_core::{DataType, Error, Result};

/// Returns the result type of `op` applied to `args`.
pub fn check(op: &Operator, args: &[Expr]) -> Result<DataType> {
    let name = op.name();
    match op {
        Operator::Eq | Operator::Ne => {
            arity(name, args, 2, "2")?;
            compatible(name, args[0].data_type(), args[1].data_type())?;
            Ok(DataType::Boolean)
        }
        Operator::GreaterThan
        | Operator::GreaterThanOrEqual
        | Operator::LessThan
        | Operator::LessThanOrEqual => {
            arity(name, args, 2, "2")?;
            all_comparable(name, args)?;
            compatible(name, args[0].data_type(), args[1].data_type())?;
            Ok(DataType::Boolean)
        }
        Operator::Between => {
            arity(name, args, 3, "3")?;
            all_comparable(name, args)?;
            compatible(name, args[0].data_type(), args[1].data_type())?;
            compatible(name, args[0].data_type(), args[2].data_type())?;
            Ok(DataType::Boolean)
        }
        Operator::In => {
            let (subject, alternatives) = args
                .split_first()
                .ok_or_else(|| Error::arity(name, "at least 1", 0))?;
            for alternative in alternatives {
                compatible(name, subject.data_type(), alternative.data_type())?;
            }
            Ok(DataType::Boolean)
        }
        Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
            arity(name, args, 2, "2")?;
            all_numeric(name, args)?;
            Ok(DataType::Boolean)
        }
        Operator::And | Operator::Or => {
            all_boolean(name, args)?;
            Ok(DataType::Boolean)
        }
        Operator::Not | Operator::IsTrue | Operator::IsFalse => {
            arity(name, args, 1, "1")?;
            all_boolean(name, args)?;
            Ok(DataType::Boolean)
        }
        Operator::IsNull | Operator::IsNotNull => {
            arity(name, args, 1, "1")?;
            Ok(DataType::Boolean)
        }
        Operator::Neg | Operator::Abs => {
            arity(name, args, 1, "1")?;
            all_numeric(name, args)?;
            Ok(args[0].data_type().clone())
        }
        Operator::Sum | Operator::Prod | Operator::Diff | Operator::Quot => {
            arity(name, args, 2, "2")?;
            all_numeric(name, args)?;
            exact(name, args[1].data_type(), args[0].data_type())?;
            Ok(args[0].data_type().clone())
        }
        Operator::Mod => {
            arity(name, args, 2, "2")?;
            for arg in args {
                exact(name, arg.data_type(), &DataType::Int32)?;
            }
            Ok(DataType::Int32)
        }
        Operator::Sqrt => {
            arity(name, args, 1, "1")?;
            all_numeric(name, args)?;
            Ok(DataType::Float64)
        }
        Operator::ToLong => numeric_cast(name, args, DataType::Int64),
        Operator::ToFloat => numeric_cast(name, args, DataType::Float32),
        Operator::ToDouble => numeric_cast(name, args, DataType::Float64),
        Operator::ToBigDecimal => numeric_cast(name, args, DataType::BigDecimal),
        Operator::ToBigInteger => numeric_cast(name, args, DataType::BigInteger),
        Operator::ToString => {
            arity(name, args, 1, "1")?;
            exact(name, args[0].data_type(), &DataType::Char)?;
            Ok(DataType::String)
        }
        Operator::Aggregate(func) => {
            arity(name, args, 1, "1")?;
            aggregate(name, *func, args[0].data_type())
        }
        Operator::Like | Operator::NotLike => {
            if !(2..=3).contains(&args.len()) {
                return Err(Error::arity(name, "2 or 3", args.len()));
            }
            exact(name, args[0].data_type(), &DataType::String)?;
            exact(name, args[1].data_type(), &DataType::String)?;
            if let Some(escape) = args.get(2) {
                exact(name, escape.data_type(), &DataType::Char)?;
            }
            Ok(DataType::Boolean)
        }
        Operator::Concat => {
            arity(name, args, 2, "2")?;
            all_strings(name, args)?;
            Ok(DataType::String)
        }
        Operator::Substring => {
            if !(2..=3).contains(&args.len()) {
                return Err(Error::arity(name, "2 or 3", args.len()));
            }
            exact(name, args[0].data_type(), &DataType::String)?;
            for arg in &args[1..] {
                exact(name, arg.data_type(), &DataType::Int32)?;
            }
            Ok(DataType::String)
        }
        Operator::Trim(_) => match args {
            [subject] => {
                exact(name, subject.data_type(), &DataType::String)?;
                Ok(DataType::String)
            }
            [character, subject] => {
                exact(name, character.data_type(), &DataType::Char)?;
                exact(name, subject.data_type(), &DataType::String)?;
                Ok(DataType::String)
            }
            _ => Err(Error::arity(name, "1 or 2", args.len())),
        },
        Operator::Lower | Operator::Upper => {
            arity(name, args, 1, "1")?;
            all_strings(name, args)?;
            Ok(DataType::String)
        }
        Operator::Length => {
            arity(name, args, 1, "1")?;
            all_strings(name, args)?;
            Ok(DataType::Int32)
        }
        Operator::Locate => {
            if !(2..=3).contains(&args.len()) {
                return Err(Error::arity(name, "2 or 3", args.len()));
            }
            all_strings(name, &args[..2])?;
            if let Some(from) = args.get(2) {
                exact(name, from.data_type(), &DataType::Int32)?;
            }
            Ok(DataType::Int32)
        }
        Operator::CurrentDate => nullary(name, args, DataType::Date),
        Operator::CurrentTime => nullary(name, args, DataType::Time),
        Operator::CurrentTimestamp => nullary(name, args, DataType::Timestamp),
        Operator::IsEmpty | Operator::IsNotEmpty => {
            arity(name, args, 1, "1")?;
            element(name, args[0].data_type())?;
            Ok(DataType::Boolean)
        }
        Operator::Size => {
            arity(name, args, 1, "1")?;
            element(name, args[0].data_type())?;
            Ok(DataType::Int32)
        }
        Operator::IsMember | Operator::IsNotMember => {
            arity(name, args, 2, "2")?;
            let element_type = element(name, args[1].data_type())?;
            compatible(name, element_type, args[0].data_type())?;
            Ok(DataType::Boolean)
        }
        Operator::Coalesce => {
            let (first, rest) = args
                .split_first()
                .ok_or_else(|| Error::arity(name, "at least 1", 0))?;
            for arg in rest {
                exact(name, arg.data_type(), first.data_type())?;
            }
            Ok(first.data_type().clone())
        }
        Operator::NullIf => {
            arity(name, args, 2, "2")?;
            compatible(name, args[0].data_type(), args[1].data_type())?;
            Ok(args[0].data_type().clone())
        }
        Operator::Exists => {
            arity(name, args, 1, "1")?;
            subquery(name, &args[0])?;
            Ok(DataType::Boolean)
        }
        Operator::All | Operator::Any | Operator::Some => {
            arity(name, args, 1, "1")?;
            subquery(name, &args[0])?;
            Ok(args[0].data_type().clone())
        }
        Operator::Function { returns, .. } => Ok(returns.clone()),
    }
}

/// Checks a case expression.
///
/// Searched arms need boolean conditions; simple arms need values comparable
/// with the operand. Every result, and the fallback, must fit `data_type`.
pub fn check_case(
    operand: Option<&Expr>,
    branches: &[CaseBranch],
    otherwise: Option<&Expr>,
    data_type: &DataType,
) -> Result<()> {
    const NAME: &str = "selectCase";
    for branch in branches {
        match operand {
            Some(operand) => compatible(NAME, operand.data_type(), branch.when.data_type())?,
            None => exact(NAME, branch.when.data_type(), &DataType::Boolean)?,
        }
        compatible(NAME, data_type, branch.then.data_type())?;
    }
    if let Some(otherwise) = otherwise {
        compatible(NAME, data_type, otherwise.data_type())?;
    }
    Ok(())
}

fn aggregate(name: &'static str, func: AggregateFunc, input: &DataType) -> Result<DataType> {
    match func {
        AggregateFunc::Avg => {
            numeric(name, input)?;
            Ok(DataType::Float64)
        }
        AggregateFunc::Sum | AggregateFunc::Max | AggregateFunc::Min => {
            numeric(name, input)?;
            Ok(input.clone())
        }
        AggregateFunc::SumAsLong => {
            exact(name, input, &DataType::Int32)?;
            Ok(DataType::Int64)
        }
        AggregateFunc::SumAsDouble => {
            exact(name, input, &DataType::Float32)?;
            Ok(DataType::Float64)
        }
        AggregateFunc::Greatest | AggregateFunc::Least => {
            if !input.is_comparable() {
                return Err(Error::type_mismatch(name, "comparable", input.clone()));
            }
            Ok(input.clone())
        }
        AggregateFunc::Count | AggregateFunc::CountDistinct => Ok(DataType::Int64),
    }
}

fn arity(name: &'static str, args: &[Expr], n: usize, expected: &'static str) -> Result<()> {
    if args.len() != n {
        return Err(Error::arity(name, expected, args.len()));
    }
    Ok(())
}

fn nullary(name: &'static str, args: &[Expr], result: DataType) -> Result<DataType> {
    arity(name, args, 0, "0")?;
    Ok(result)
}

fn numeric(name: &'static str, found: &DataType) -> Result<()> {
    if !found.is_numeric() {
        return Err(Error::type_mismatch(name, "numeric", found.clone()));
    }
    Ok(())
}

fn all_numeric(name: &'static str, args: &[Expr]) -> Result<()> {
    args.iter().try_for_each(|arg| numeric(name, arg.data_type()))
}

fn all_comparable(name: &'static str, args: &[Expr]) -> Result<()> {
    args.iter().try_for_each(|arg| {
        if arg.data_type().is_comparable() {
            Ok(())
        } else {
            Err(Error::type_mismatch(name, "comparable", arg.data_type().clone()))
        }
    })
}

fn all_boolean(name: &'static str, args: &[Expr]) -> Result<()> {
    args.iter()
        .try_for_each(|arg| exact(name, arg.data_type(), &DataType::Boolean))
}

fn all_strings(name: &'static str, args: &[Expr]) -> Result<()> {
    args.iter()
        .try_for_each(|arg| exact(name, arg.data_type(), &DataType::String))
}

fn exact(name: &'static str, found: &DataType, expected: &DataType) -> Result<()> {
    if found != expected {
        return Err(Error::type_mismatch(
            name,
            format!("{}", expected),
            found.clone(),
        ));
    }
    Ok(())
}

fn compatible(name: &'static str, expected: &DataType, found: &DataType) -> Result<()> {
    if !expected.is_compatible(found) {
        return Err(Error::type_mismatch(
            name,
            format!("{}", expected),
            found.clone(),
        ));
    }
    Ok(())
}

fn element<'t>(name: &'static str, found: &'t DataType) -> Result<&'t DataType> {
    found
        .element_type()
        .ok_or_else(|| Error::type_mismatch(name, "collection", found.clone()))
}

fn numeric_cast(name: &'static str, args: &[Expr], target: DataType) -> Result<DataType> {
    arity(name, args, 1, "1")?;
    all_numeric(name, args)?;
    Ok(target)
}

fn subquery(name: &'static str, arg: &Expr) -> Result<()> {
    match arg {
        Expr::Subquery(_) => Ok(()),
        other => Err(Error::type_mismatch(
            name,
            "subquery",
            other.data_type().clone(),
        )),
    }
}
