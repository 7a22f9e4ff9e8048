//! End-to-end tests of the execution boundary against a stub session.
//!
//! The stub records every query definition it is asked to run and returns a
//! fixed set of rows, so the tests can inspect exactly what the modifier
//! assembled.

use criteria_core::schema::{Entity, EntityBuilder, EntityModel};
use criteria_core::{DataType, Error, ExecutionError, Value};
use criteria_query::ast::{Expr, Operator};
use criteria_query::{
    query, query_all, query_with, Algebra, Executor, Order, Predicate, ProvisionOptions,
    QueryDefinition, Selection, Session, SessionFactory,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct Person {
    name: String,
    age: i32,
}

impl Entity for Person {
    fn model() -> EntityModel {
        EntityBuilder::new("Person")
            .unwrap()
            .required("id", DataType::Int64)
            .unwrap()
            .attribute("name", DataType::String)
            .unwrap()
            .attribute("age", DataType::Int32)
            .unwrap()
            .build()
            .unwrap()
    }
}

/// What the stub saw when asked to execute.
#[derive(Debug, Default)]
struct Captured {
    selection: Option<Selection>,
    restriction: Option<Predicate>,
    orders: Vec<Order>,
    distinct: bool,
}

#[derive(Default)]
struct Shared {
    captured: RefCell<Vec<Captured>>,
    opened: Cell<usize>,
    closed: Cell<usize>,
}

struct StubFactory {
    shared: Rc<Shared>,
    fail_open: bool,
    fail_execute: bool,
}

impl StubFactory {
    fn new() -> Self {
        Self {
            shared: Rc::new(Shared::default()),
            fail_open: false,
            fail_execute: false,
        }
    }
}

struct StubSession {
    algebra: Algebra,
    shared: Rc<Shared>,
    fail_execute: bool,
}

impl Drop for StubSession {
    fn drop(&mut self) {
        self.shared.closed.set(self.shared.closed.get() + 1);
    }
}

impl SessionFactory for StubFactory {
    type Session = StubSession;

    fn open_session(&self) -> Result<StubSession, ExecutionError> {
        if self.fail_open {
            return Err("database unavailable".into());
        }
        self.shared.opened.set(self.shared.opened.get() + 1);
        Ok(StubSession {
            algebra: Algebra::new(),
            shared: Rc::clone(&self.shared),
            fail_execute: self.fail_execute,
        })
    }
}

impl Session for StubSession {
    fn algebra(&self) -> &Algebra {
        &self.algebra
    }
}

impl Executor<Person> for StubSession {
    fn execute(&mut self, query: &QueryDefinition<Person>) -> Result<Vec<Person>, ExecutionError> {
        if self.fail_execute {
            return Err("connection reset".into());
        }
        self.shared.captured.borrow_mut().push(Captured {
            selection: query.selection().cloned(),
            restriction: query.restriction(),
            orders: query.order_list().to_vec(),
            distinct: query.is_distinct(),
        });
        Ok(vec![Person {
            name: "Alice".into(),
            age: 30,
        }])
    }
}

fn column_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Column(c) => Some(c.attribute.as_str()),
        _ => None,
    }
}

#[test]
fn test_filter_and_order_reach_the_executor() {
    let factory = StubFactory::new();
    let rows = query::<Person, _, _>(&factory, |ctx| {
        let cb = ctx.algebra()?;
        let name = ctx.get_string("name")?;
        let age = ctx.get_int("age")?;
        ctx.where_(cb.equal(&name, "Alice"))?;
        ctx.order_by([cb.asc(&age)])?;
        Ok(())
    })
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Alice");

    let captured = factory.shared.captured.borrow();
    assert_eq!(captured.len(), 1);
    let seen = &captured[0];

    let restriction = seen.restriction.as_ref().expect("restriction");
    let filter = restriction.expr();
    assert_eq!(filter.operator(), Some(&Operator::Eq));
    assert_eq!(column_name(&filter.args()[0]), Some("name"));
    assert!(matches!(
        &filter.args()[1],
        Expr::Literal { value: Value::String(s), .. } if s == "Alice"
    ));

    assert_eq!(seen.orders.len(), 1);
    assert!(seen.orders[0].is_ascending());
    assert_eq!(column_name(seen.orders[0].expr()), Some("age"));

    assert!(matches!(seen.selection, Some(Selection::Single(Expr::Entity { .. }))));
    assert_eq!(factory.shared.closed.get(), 1);
}

#[test]
fn test_query_all_selects_root_without_filter() {
    let factory = StubFactory::new();
    let rows: Vec<Person> = query_all(&factory).unwrap();
    assert_eq!(rows.len(), 1);

    let captured = factory.shared.captured.borrow();
    assert!(captured[0].restriction.is_none());
    assert!(captured[0].orders.is_empty());
    assert!(captured[0].selection.is_some());
    assert!(!captured[0].distinct);
}

#[test]
fn test_query_with_presets_distinct() {
    let factory = StubFactory::new();
    let options = ProvisionOptions {
        distinct: true,
        select_root: false,
    };
    query_with::<Person, _, _>(&factory, options, |_| Ok(())).unwrap();

    let captured = factory.shared.captured.borrow();
    assert!(captured[0].distinct);
    assert!(captured[0].selection.is_none());
}

#[test]
fn test_modifier_error_propagates_unchanged() {
    let factory = StubFactory::new();
    let err = query::<Person, _, _>(&factory, |ctx| {
        ctx.get_int("salary")?;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, Error::AttributeNotFound { ref attribute, .. } if attribute == "salary"));
    assert!(factory.shared.captured.borrow().is_empty());
    assert_eq!(factory.shared.opened.get(), 1);
    assert_eq!(factory.shared.closed.get(), 1);
}

#[test]
fn test_type_mismatch_in_modifier_propagates() {
    let factory = StubFactory::new();
    let err = query::<Person, _, _>(&factory, |ctx| {
        ctx.get_string("age")?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, Error::AttributeType { .. }));
}

#[test]
fn test_execution_error_is_wrapped_with_source() {
    let mut factory = StubFactory::new();
    factory.fail_execute = true;
    let err = query::<Person, _, _>(&factory, |ctx| {
        let cb = ctx.algebra()?;
        let age = ctx.get_int("age")?;
        ctx.where_(cb.gt(&age, 18))?;
        Ok(())
    })
    .unwrap_err();

    match err {
        Error::Execution(source) => assert_eq!(source.to_string(), "connection reset"),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(factory.shared.closed.get(), 1);
}

#[test]
fn test_open_failure_is_an_execution_error() {
    let mut factory = StubFactory::new();
    factory.fail_open = true;
    let err = query_all::<Person, _>(&factory).unwrap_err();
    assert!(matches!(err, Error::Execution(_)));
    assert_eq!(factory.shared.opened.get(), 0);
    assert_eq!(factory.shared.closed.get(), 0);
}

#[test]
fn test_each_query_gets_its_own_session() {
    let factory = StubFactory::new();
    for _ in 0..3 {
        query::<Person, _, _>(&factory, |ctx| {
            ctx.distinct(true)?;
            Ok(())
        })
        .unwrap();
    }
    assert_eq!(factory.shared.opened.get(), 3);
    assert_eq!(factory.shared.closed.get(), 3);
    assert!(factory.shared.captured.borrow().iter().all(|c| c.distinct));
}
