//! Attribute definition for entity metadata.

use crate::types::DataType;
use alloc::string::String;

/// A named, typed attribute of an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    name: String,
    /// Declared data type.
    data_type: DataType,
    /// Whether the attribute allows null values.
    nullable: bool,
    /// Attribute position in the entity (0-based).
    index: usize,
}

impl Attribute {
    /// Creates a new attribute definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            index: 0,
        }
    }

    /// Sets whether this attribute is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Returns the attribute name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared data type.
    #[inline]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns whether this attribute is nullable.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the attribute position.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}
