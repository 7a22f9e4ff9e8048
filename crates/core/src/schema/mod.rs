//! Entity metadata consumed by query construction.
//!
//! Entities describe "the table of T": a name, a set of typed attributes and an
//! optional supertype used by `treat`.

mod attribute;
mod entity;

pub use attribute::Attribute;
pub use entity::{Entity, EntityBuilder, EntityModel, Subtype};
