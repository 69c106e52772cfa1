//! # Component Attributes
//!
//! Attribute instances carried by components, and the declarations a
//! component type makes about them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared value kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Identifier of another component
    Reference,
    /// Identifiers of the components this one links to
    Link,
}

impl AttributeKind {
    /// Whether `value` has a shape this kind can hold.
    ///
    /// Null is accepted by every kind: an attribute may be declared before
    /// it receives a value.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (_, AttributeValue::Null) => true,
            (AttributeKind::String, AttributeValue::String(_)) => true,
            (AttributeKind::Reference, AttributeValue::String(_)) => true,
            (AttributeKind::Number, AttributeValue::Number(_)) => true,
            (AttributeKind::Boolean, AttributeValue::Boolean(_)) => true,
            (AttributeKind::Array, AttributeValue::Array(_)) => true,
            (AttributeKind::Object, AttributeValue::Object(_)) => true,
            // An empty JSON list cannot be told apart from an empty attribute list
            (AttributeKind::Object, AttributeValue::Array(items)) => items.is_empty(),
            (AttributeKind::Link, AttributeValue::Array(items)) => items
                .iter()
                .all(|item| matches!(item, AttributeValue::String(_))),
            _ => false,
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::String => "String",
            AttributeKind::Number => "Number",
            AttributeKind::Boolean => "Boolean",
            AttributeKind::Array => "Array",
            AttributeKind::Object => "Object",
            AttributeKind::Reference => "Reference",
            AttributeKind::Link => "Link",
        };
        f.write_str(name)
    }
}

/// Value held by an attribute instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<AttributeValue>),
    /// Nested attribute list
    Object(Vec<ComponentAttribute>),
}

impl AttributeValue {
    /// Short name of the value's shape, for error messages
    pub fn shape(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Number(_) => "number",
            AttributeValue::String(_) => "string",
            AttributeValue::Array(_) => "array",
            AttributeValue::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// String items of an array value, skipping anything else
    pub fn string_items(&self) -> Vec<&str> {
        match self {
            AttributeValue::Array(items) => items.iter().filter_map(|item| item.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(items: Vec<AttributeValue>) -> Self {
        AttributeValue::Array(items)
    }
}

/// One attribute instance owned by a component.
///
/// The name is fixed at construction; only the value and its kind can be
/// replaced afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAttribute {
    name: String,

    #[serde(default)]
    value: AttributeValue,

    #[serde(rename = "type")]
    attribute_type: AttributeKind,
}

impl ComponentAttribute {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
        attribute_type: AttributeKind,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attribute_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn attribute_type(&self) -> AttributeKind {
        self.attribute_type
    }

    /// Replace value and kind together
    pub fn set_value(&mut self, value: impl Into<AttributeValue>, attribute_type: AttributeKind) {
        self.value = value.into();
        self.attribute_type = attribute_type;
    }
}

/// Declaration of one attribute on a component type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAttributeDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub attribute_type: AttributeKind,

    /// Target component type of a `Link` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_ref: Option<String>,
}

impl ComponentAttributeDefinition {
    pub fn new(name: impl Into<String>, attribute_type: AttributeKind) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            link_ref: None,
        }
    }

    /// `Link` attribute pointing at components of `target_type`
    pub fn link(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeKind::Link,
            link_ref: Some(target_type.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_accepted_by_every_kind() {
        for kind in [
            AttributeKind::String,
            AttributeKind::Number,
            AttributeKind::Boolean,
            AttributeKind::Array,
            AttributeKind::Object,
            AttributeKind::Reference,
            AttributeKind::Link,
        ] {
            assert!(kind.accepts(&AttributeValue::Null), "{kind} should accept null");
        }
    }

    #[test]
    fn test_link_requires_string_items() {
        let ids = AttributeValue::Array(vec!["db".into(), "cache".into()]);
        assert!(AttributeKind::Link.accepts(&ids));

        let mixed = AttributeValue::Array(vec!["db".into(), 3.0.into()]);
        assert!(!AttributeKind::Link.accepts(&mixed));
        assert!(AttributeKind::Array.accepts(&mixed));
    }

    #[test]
    fn test_scalar_shapes() {
        assert!(AttributeKind::String.accepts(&"x".into()));
        assert!(AttributeKind::Reference.accepts(&"server_1".into()));
        assert!(!AttributeKind::Number.accepts(&"1".into()));
        assert!(AttributeKind::Boolean.accepts(&true.into()));
    }

    #[test]
    fn test_attribute_json_shape() {
        let json = r#"{
            "name": "tags",
            "type": "Object",
            "value": [
                { "name": "env", "type": "String", "value": "prod" }
            ]
        }"#;

        let attr: ComponentAttribute = serde_json::from_str(json).unwrap();
        assert_eq!(attr.name(), "tags");
        assert_eq!(attr.attribute_type(), AttributeKind::Object);
        match attr.value() {
            AttributeValue::Object(nested) => {
                assert_eq!(nested.len(), 1);
                assert_eq!(nested[0].value().as_str(), Some("prod"));
            }
            other => panic!("Expected nested attributes, got {other:?}"),
        }
    }

    #[test]
    fn test_set_value_keeps_name() {
        let mut attr = ComponentAttribute::new("port", 80.0, AttributeKind::Number);
        attr.set_value("eighty", AttributeKind::String);

        assert_eq!(attr.name(), "port");
        assert_eq!(attr.attribute_type(), AttributeKind::String);
    }
}
