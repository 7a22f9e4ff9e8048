//! Entity definition for query metadata.

use super::attribute::Attribute;
use crate::error::{Error, Result};
use crate::types::DataType;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// A host type that maps to a queryable entity.
pub trait Entity {
    /// Returns the metadata describing this entity.
    fn model() -> EntityModel;

    /// Returns the entity name.
    fn entity_name() -> String {
        Self::model().name().into()
    }
}

/// Marks `Self` as a subtype of the entity `S`.
///
/// `treat` only accepts narrowing along this relation, so an invalid
/// reinterpretation is rejected by the compiler rather than at execution.
pub trait Subtype<S: Entity>: Entity {}

/// Metadata for a single entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityModel {
    /// Entity name.
    name: String,
    /// Attribute definitions, inherited ones first.
    attributes: Vec<Attribute>,
    /// Name of the direct supertype, if any.
    supertype: Option<String>,
}

impl EntityModel {
    /// Returns the entity name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the direct supertype name.
    #[inline]
    pub fn supertype(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    /// Gets an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Looks up an attribute and checks it is declared with the requested type.
    pub fn resolve(&self, name: &str, requested: &DataType) -> Result<&Attribute> {
        let attribute = self
            .get_attribute(name)
            .ok_or_else(|| Error::attribute_not_found(&self.name, name))?;
        if attribute.data_type() != requested {
            return Err(Error::attribute_type(
                &self.name,
                name,
                attribute.data_type().clone(),
                requested.clone(),
            ));
        }
        Ok(attribute)
    }

    /// Returns the data type representing a reference to this entity.
    pub fn data_type(&self) -> DataType {
        DataType::Entity(self.name.clone())
    }
}

/// Builder for entity metadata.
pub struct EntityBuilder {
    name: String,
    attributes: Vec<Attribute>,
    supertype: Option<String>,
}

impl EntityBuilder {
    /// Creates a new entity builder.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        Ok(Self {
            name,
            attributes: Vec::new(),
            supertype: None,
        })
    }

    /// Validates a name follows naming rules.
    fn check_naming_rules(name: &str) -> Result<()> {
        let Some(first) = name.chars().next() else {
            return Err(Error::invalid_schema("Name cannot be empty"));
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(Error::invalid_schema(format!(
                "Name must start with letter or underscore: {}",
                name
            )));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_schema(format!(
                "Name contains invalid characters: {}",
                name
            )));
        }
        Ok(())
    }

    /// Inherits all attributes of `parent` and records it as the supertype.
    pub fn extends(mut self, parent: &EntityModel) -> Result<Self> {
        for attribute in parent.attributes() {
            self = self.push(attribute.clone())?;
        }
        self.supertype = Some(parent.name().into());
        Ok(self)
    }

    /// Adds a nullable attribute.
    pub fn attribute(self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        self.push(Attribute::new(name, data_type))
    }

    /// Adds an attribute that never holds null.
    pub fn required(self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        self.push(Attribute::new(name, data_type).nullable(false))
    }

    /// Adds a reference to another entity.
    pub fn association(self, name: impl Into<String>, target: &str) -> Result<Self> {
        self.attribute(name, DataType::Entity(target.into()))
    }

    fn push(mut self, attribute: Attribute) -> Result<Self> {
        if self.get(attribute.name()).is_some() {
            return Err(Error::invalid_schema(format!(
                "Attribute already exists: {}",
                attribute.name()
            )));
        }
        let index = self.attributes.len();
        self.attributes.push(attribute.with_index(index));
        Ok(self)
    }

    fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Builds the entity metadata.
    pub fn build(self) -> Result<EntityModel> {
        if self.attributes.is_empty() {
            return Err(Error::invalid_schema(format!(
                "Entity {} declares no attributes",
                self.name
            )));
        }
        Ok(EntityModel {
            name: self.name,
            attributes: self.attributes,
            supertype: self.supertype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> EntityModel {
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

    #[test]
    fn test_entity_builder() {
        let model = person();
        assert_eq!(model.name(), "Person");
        assert_eq!(model.attributes().len(), 3);
        assert_eq!(model.get_attribute("age").unwrap().index(), 2);
        assert!(!model.get_attribute("id").unwrap().is_nullable());
    }

    #[test]
    fn test_naming_rules() {
        assert!(EntityBuilder::new("").is_err());
        assert!(EntityBuilder::new("1abc").is_err());
        assert!(EntityBuilder::new("a-b").is_err());
        assert!(EntityBuilder::new("_ok").is_ok());
    }

    #[test]
    fn test_duplicate_attribute() {
        let result = EntityBuilder::new("T")
            .unwrap()
            .attribute("a", DataType::Int32)
            .unwrap()
            .attribute("a", DataType::String);
        assert!(matches!(result, Err(Error::InvalidSchema { .. })));
    }

    #[test]
    fn test_empty_entity_rejected() {
        assert!(EntityBuilder::new("Empty").unwrap().build().is_err());
    }

    #[test]
    fn test_resolve_checks_declared_type() {
        let model = person();
        assert!(model.resolve("name", &DataType::String).is_ok());
        assert!(matches!(
            model.resolve("name", &DataType::Int32),
            Err(Error::AttributeType { .. })
        ));
        assert!(matches!(
            model.resolve("nickname", &DataType::String),
            Err(Error::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_extends_inherits_attributes() {
        let base = person();
        let employee = EntityBuilder::new("Employee")
            .unwrap()
            .extends(&base)
            .unwrap()
            .attribute("salary", DataType::BigDecimal)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(employee.supertype(), Some("Person"));
        assert!(employee.get_attribute("name").is_some());
        assert_eq!(employee.get_attribute("salary").unwrap().index(), 3);
    }
}
