//! Attribute schemas for managed resource types.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::{type_name, ResourceData};
use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    Map,
}

impl AttributeType {
    fn name(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Int => "integer",
            AttributeType::Map => "map",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int => value.is_i64(),
            AttributeType::Map => value.is_object(),
        }
    }
}

/// How an attribute is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be set in configuration.
    Required,
    /// May be set in configuration.
    Optional,
    /// May be set; the server fills it in when it is not.
    OptionalComputed,
    /// Only ever set from server responses.
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub kind: AttributeType,
    pub presence: Presence,
    pub description: &'static str,
}

impl Attribute {
    pub fn required(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            presence: Presence::Required,
            description,
        }
    }

    pub fn optional(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            presence: Presence::Optional,
            description,
        }
    }

    pub fn optional_computed(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            presence: Presence::OptionalComputed,
            description,
        }
    }

    pub fn computed(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            presence: Presence::Computed,
            description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    /// Check that every required attribute is set and every set attribute is
    /// known and of the declared type.
    pub fn validate(&self, data: &ResourceData) -> Result<(), ProviderError> {
        for (name, value) in data.attributes() {
            let attr = self
                .attributes
                .get(name.as_str())
                .ok_or_else(|| ProviderError::UnknownAttribute(name.clone()))?;
            if !value.is_null() && !attr.kind.matches(value) {
                return Err(ProviderError::AttributeType {
                    name: name.clone(),
                    expected: attr.kind.name(),
                    found: type_name(value),
                });
            }
        }

        for (name, attr) in &self.attributes {
            if attr.presence == Presence::Required && data.get(name).is_none() {
                return Err(ProviderError::MissingAttribute(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .with("name", Attribute::required(AttributeType::String, "Name"))
            .with("order", Attribute::optional(AttributeType::Int, "Order"))
            .with("slug", Attribute::computed(AttributeType::String, "Slug"))
    }

    #[test]
    fn accepts_valid_data() {
        let data = ResourceData::from_json(json!({ "name": "API", "order": 2, "slug": null })).unwrap();
        assert!(schema().validate(&data).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let data = ResourceData::from_json(json!({ "order": 2 })).unwrap();
        let err = schema().validate(&data).unwrap_err();
        assert_eq!(err.attribute(), Some("name"));
    }

    #[test]
    fn unknown_attribute() {
        let data = ResourceData::from_json(json!({ "name": "API", "colour": "red" })).unwrap();
        assert!(matches!(
            schema().validate(&data),
            Err(ProviderError::UnknownAttribute(ref k)) if k == "colour"
        ));
    }

    #[test]
    fn wrong_type() {
        let data = ResourceData::from_json(json!({ "name": "API", "order": "2" })).unwrap();
        let err = schema().validate(&data).unwrap_err();
        assert_eq!(err.to_string(), "attribute `order` must be a integer, got string");
    }
}
