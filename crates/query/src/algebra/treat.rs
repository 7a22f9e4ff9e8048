//! Type narrowing.
//!
//! `treat` views a root or join of entity `X` as its subtype `Y`. The
//! `Subtype<X>` bound is the only check; nothing is verified at run time.

use super::Algebra;
use crate::root::{Join, Root};
use criteria_core::schema::{Entity, Subtype};

/// Paths that can be narrowed to the subtype `Y`.
pub trait Treatable<Y> {
    /// The narrowed path.
    type Output;

    fn treat_as(&self) -> Self::Output;
}

impl<X: Entity, Y: Subtype<X>> Treatable<Y> for Root<X> {
    type Output = Root<Y>;

    fn treat_as(&self) -> Root<Y> {
        self.narrow()
    }
}

impl<Z, X: Entity, Y: Subtype<X>> Treatable<Y> for Join<Z, X> {
    type Output = Join<Z, Y>;

    fn treat_as(&self) -> Join<Z, Y> {
        self.narrow()
    }
}

impl Algebra {
    /// Narrows `path` to the subtype `Y`: `cb.treat::<Employee, _>(&person)`.
    pub fn treat<Y, P: Treatable<Y>>(&self, path: &P) -> P::Output {
        path.treat_as()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, JoinStep};
    use crate::root::EntityPath;
    use alloc::string::ToString;
    use criteria_core::schema::{EntityBuilder, EntityModel};
    use criteria_core::DataType;

    struct Person;

    impl Entity for Person {
        fn model() -> EntityModel {
            EntityBuilder::new("Person")
                .unwrap()
                .attribute("name", DataType::String)
                .unwrap()
                .association("manager", "Person")
                .unwrap()
                .build()
                .unwrap()
        }
    }

    struct Employee;

    impl Entity for Employee {
        fn model() -> EntityModel {
            EntityBuilder::new("Employee")
                .unwrap()
                .extends(&Person::model())
                .unwrap()
                .attribute("salary", DataType::BigDecimal)
                .unwrap()
                .association("dept", "Dept")
                .unwrap()
                .build()
                .unwrap()
        }
    }

    impl Subtype<Person> for Employee {}

    struct Dept;

    impl Entity for Dept {
        fn model() -> EntityModel {
            EntityBuilder::new("Dept")
                .unwrap()
                .attribute("title", DataType::String)
                .unwrap()
                .association("head", "Person")
                .unwrap()
                .build()
                .unwrap()
        }
    }

    fn person() -> Root<Person> {
        Root::new("r0".into())
    }

    #[test]
    fn test_treat_root_exposes_subtype_attributes() {
        let cb = Algebra::new();
        let person = person();
        assert!(person.get_big_decimal("salary").is_err());

        let employee = cb.treat::<Employee, _>(&person);
        let salary = employee.get_big_decimal("salary").unwrap();
        match salary.expr() {
            Expr::Column(c) => {
                assert_eq!(c.source.entity, "Person");
                assert_eq!(c.source.treated_as.as_deref(), Some("Employee"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(salary.to_string(), "treat(r0 as Employee).salary");
        assert!(employee.get_string("name").is_ok());
    }

    #[test]
    fn test_treat_join() {
        let cb = Algebra::new();
        let manager = person().join::<Person>("manager").unwrap();
        let treated = cb.treat::<Employee, _>(&manager);
        assert_eq!(treated.source().path(), "treat(r0.manager as Employee)");
        assert_eq!(
            treated.expression().data_type(),
            &DataType::Entity("Employee".into())
        );
    }

    #[test]
    fn test_join_after_treat_keeps_narrowing() {
        let cb = Algebra::new();
        let employee = cb.treat::<Employee, _>(&person());
        let dept = employee.join::<Dept>("dept").unwrap();
        let title = dept.get_string("title").unwrap();

        match title.expr() {
            Expr::Column(c) => {
                assert_eq!(c.source.treated_as.as_deref(), Some("Employee"));
                assert_eq!(
                    c.source.joins,
                    [JoinStep {
                        attribute: "dept".into(),
                        treated_as: None,
                    }]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(title.to_string(), "treat(r0 as Employee).dept.title");
        assert_eq!(dept.expression().data_type(), &DataType::Entity("Dept".into()));
    }

    #[test]
    fn test_treat_after_join_after_treat() {
        let cb = Algebra::new();
        let employee = cb.treat::<Employee, _>(&person());
        let head = employee
            .join::<Dept>("dept")
            .unwrap()
            .join::<Person>("head")
            .unwrap();
        let narrowed = cb.treat::<Employee, _>(&head);

        let salary = narrowed.get_big_decimal("salary").unwrap();
        assert_eq!(
            salary.to_string(),
            "treat(treat(r0 as Employee).dept.head as Employee).salary"
        );
        assert_eq!(
            narrowed.expression().data_type(),
            &DataType::Entity("Employee".into())
        );
        assert!(head.get_big_decimal("salary").is_err());
    }
}
