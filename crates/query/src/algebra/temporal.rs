//! Current date and time.

use super::{apply, Algebra};
use crate::ast::{Expression, Operator};
use alloc::vec::Vec;
use criteria_core::{DataType, Date, Time, Timestamp};

impl Algebra {
    pub fn current_date(&self) -> Expression<Date> {
        apply(Operator::CurrentDate, Vec::new(), DataType::Date)
    }

    pub fn current_time(&self) -> Expression<Time> {
        apply(Operator::CurrentTime, Vec::new(), DataType::Time)
    }

    pub fn current_timestamp(&self) -> Expression<Timestamp> {
        apply(Operator::CurrentTimestamp, Vec::new(), DataType::Timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_current_values_compare_with_literals() {
        let cb = Algebra::new();
        let p = cb.less_than(cb.current_date(), Date::from_days(20_000));
        assert_eq!(p.to_string(), "(currentDate < {d 20000})");
        assert_eq!(cb.current_timestamp().data_type(), &DataType::Timestamp);
        assert_eq!(cb.current_time().data_type(), &DataType::Time);
    }
}
