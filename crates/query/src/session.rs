//! Execution boundary.
//!
//! A [`SessionFactory`] opens a session per query; the session supplies the
//! algebra provider and runs finished query definitions. [`query`] ties the
//! two together: open, provision a bound context, let the caller shape the
//! query, execute, close.
//!
//! The session is owned by the call and dropped on every path, so closing
//! belongs in the session's `Drop`.

use crate::algebra::Algebra;
use crate::context::Context;
use crate::query::QueryDefinition;
use alloc::vec::Vec;
use criteria_core::schema::Entity;
use criteria_core::{Error, ExecutionError, Result};
use log::{debug, warn};

/// Opens sessions against a data store.
pub trait SessionFactory {
    type Session: Session;

    /// Opens a session. Failures are reported as execution errors.
    fn open_session(&self) -> core::result::Result<Self::Session, ExecutionError>;
}

/// A scoped connection to a data store.
pub trait Session {
    /// Returns the algebra provider of this session.
    fn algebra(&self) -> &Algebra;
}

/// A session able to run queries returning `T`.
pub trait Executor<T>: Session {
    /// Runs `query` and materializes the rows.
    fn execute(&mut self, query: &QueryDefinition<T>) -> core::result::Result<Vec<T>, ExecutionError>;
}

/// How a fresh query is provisioned before the modifier runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Preset the distinct flag.
    pub distinct: bool,
    /// Select the root entity.
    pub select_root: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            distinct: false,
            select_root: true,
        }
    }
}

/// Runs a query for all rows of `T`.
pub fn query_all<T, F>(factory: &F) -> Result<Vec<T>>
where
    T: Entity,
    F: SessionFactory,
    F::Session: Executor<T>,
{
    query_with(factory, ProvisionOptions::default(), |_| Ok(()))
}

/// Runs a query for `T` shaped by `modifier`.
pub fn query<T, F, M>(factory: &F, modifier: M) -> Result<Vec<T>>
where
    T: Entity,
    F: SessionFactory,
    F::Session: Executor<T>,
    M: FnOnce(&mut Context<'_, T>) -> Result<()>,
{
    query_with(factory, ProvisionOptions::default(), modifier)
}

/// Runs a query for `T` with explicit provisioning options.
///
/// Errors from the modifier are returned as-is; errors from opening the
/// session or executing are wrapped in [`Error::Execution`] with the source
/// unchanged.
pub fn query_with<T, F, M>(factory: &F, options: ProvisionOptions, modifier: M) -> Result<Vec<T>>
where
    T: Entity,
    F: SessionFactory,
    F::Session: Executor<T>,
    M: FnOnce(&mut Context<'_, T>) -> Result<()>,
{
    let mut session = factory.open_session().map_err(|e| {
        warn!("failed to open session: {}", e);
        Error::execution(e)
    })?;

    let mut definition = QueryDefinition::<T>::new();
    let root = definition.from::<T>();
    if options.select_root {
        definition.select(&root);
    }
    definition.distinct(options.distinct);

    {
        let mut context = Context::new()
            .plus(&mut definition)
            .plus(session.algebra())
            .plus(&root);
        modifier(&mut context)?;
    }

    debug!("executing {:?}", definition);
    session.execute(&definition).map_err(|e| {
        warn!("query on {} failed: {}", T::entity_name(), e);
        Error::execution(e)
    })
}
