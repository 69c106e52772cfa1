//! # Component Type Schemas
//!
//! A `ComponentTypeSchema` is the structural contract of one component type:
//! where it may be placed, what it may contain, and which attributes it
//! carries. Schemas are built from `SchemaProps` and validated eagerly, so
//! a schema that exists is always well formed.
//!
//! ## Hierarchy policy
//!
//! - Empty `parent_types` means the type can only live at the root.
//! - Empty `children_types` means the type is a leaf.
//! - A type that is not a container never accepts children, whatever its
//!   `children_types` say.

use crate::{
    AttributeKind, AttributeValue, ComponentAttribute, ComponentAttributeDefinition, SchemaError,
    SchemaResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroU32;

/// Display behaviour overriding the default rendering of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum DisplayType {
    Workflow,
}

/// Construction properties for a `ComponentTypeSchema`.
///
/// Every field has a default, so JSON definitions only need to spell out
/// what differs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaProps {
    /// Registry key of the type, required
    #[serde(rename = "type")]
    pub type_name: String,

    /// Icon name shown for the type
    pub icon: Option<String>,

    /// Render template of the type
    pub model: Option<String>,

    pub parent_types: Vec<String>,

    pub children_types: Vec<String>,

    pub defined_attributes: Vec<ComponentAttributeDefinition>,

    pub is_container: bool,

    pub display_type: Option<DisplayType>,

    /// Always recompute children layout instead of keeping manual placement
    pub prevent_children_movement: bool,

    /// Override of the row-layout count, must be positive
    pub children_per_line: Option<i64>,
}

impl SchemaProps {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_types = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children_types = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, definition: ComponentAttributeDefinition) -> Self {
        self.defined_attributes.push(definition);
        self
    }

    pub fn with_children_per_line(mut self, count: i64) -> Self {
        self.children_per_line = Some(count);
        self
    }

    /// Validate and build the schema
    pub fn build(self) -> SchemaResult<ComponentTypeSchema> {
        ComponentTypeSchema::new(self)
    }
}

/// Structural contract for one component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SchemaProps")]
pub struct ComponentTypeSchema {
    #[serde(rename = "type")]
    type_name: String,
    icon: Option<String>,
    model: Option<String>,
    parent_types: Vec<String>,
    children_types: Vec<String>,
    defined_attributes: Vec<ComponentAttributeDefinition>,
    is_container: bool,
    display_type: Option<DisplayType>,
    prevent_children_movement: bool,
    children_per_line: Option<NonZeroU32>,
}

impl ComponentTypeSchema {
    /// Build a schema, rejecting an empty type or a non-positive
    /// `children_per_line`.
    pub fn new(props: SchemaProps) -> SchemaResult<Self> {
        let type_name = props.type_name.trim().to_string();
        if type_name.is_empty() {
            return Err(SchemaError::invalid_schema(
                props.type_name,
                "type must not be empty",
            ));
        }

        let children_per_line = match props.children_per_line {
            None => None,
            Some(count) if count <= 0 => {
                return Err(SchemaError::invalid_schema(
                    &type_name,
                    format!("childrenPerLine must be a positive integer, got {count}"),
                ));
            }
            Some(count) => {
                let count = u32::try_from(count)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or_else(|| {
                        SchemaError::invalid_schema(
                            &type_name,
                            format!("childrenPerLine {count} is out of range"),
                        )
                    })?;
                Some(count)
            }
        };

        let mut defined_attributes = props.defined_attributes;
        for definition in &mut defined_attributes {
            if let Some(target) = definition.link_ref.as_mut() {
                *target = target.trim().to_string();
            }
        }

        let mut declared = HashSet::new();
        for definition in &defined_attributes {
            if definition.name.is_empty() {
                return Err(SchemaError::invalid_schema(
                    &type_name,
                    "attribute declarations need a name",
                ));
            }
            if !declared.insert(definition.name.as_str()) {
                return Err(SchemaError::invalid_schema(
                    &type_name,
                    format!("attribute '{}' is declared twice", definition.name),
                ));
            }
            if definition.link_ref.is_some() && definition.attribute_type != AttributeKind::Link {
                return Err(SchemaError::invalid_schema(
                    &type_name,
                    format!("attribute '{}' has a linkRef but is not a Link", definition.name),
                ));
            }
        }

        Ok(Self {
            type_name,
            icon: props.icon,
            model: props.model,
            parent_types: normalize(props.parent_types),
            children_types: normalize(props.children_types),
            defined_attributes,
            is_container: props.is_container,
            display_type: props.display_type,
            prevent_children_movement: props.prevent_children_movement,
            children_per_line,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn parent_types(&self) -> &[String] {
        &self.parent_types
    }

    pub fn children_types(&self) -> &[String] {
        &self.children_types
    }

    pub fn defined_attributes(&self) -> &[ComponentAttributeDefinition] {
        &self.defined_attributes
    }

    pub fn is_container(&self) -> bool {
        self.is_container
    }

    pub fn display_type(&self) -> Option<DisplayType> {
        self.display_type
    }

    pub fn prevent_children_movement(&self) -> bool {
        self.prevent_children_movement
    }

    /// Row-layout override, `None` meaning the layout default
    pub fn children_per_line(&self) -> Option<u32> {
        self.children_per_line.map(NonZeroU32::get)
    }

    pub fn defined_attribute(&self, name: &str) -> Option<&ComponentAttributeDefinition> {
        self.defined_attributes.iter().find(|def| def.name == name)
    }

    /// Whether a component of this type may sit under `candidate`.
    /// `None` proposes the root.
    pub fn validate_parent(&self, candidate: Option<&str>) -> bool {
        match candidate {
            Some(parent) => self.parent_types.iter().any(|t| t == parent),
            None => self.parent_types.is_empty(),
        }
    }

    /// Whether a component of type `candidate` may be a direct child
    pub fn validate_child(&self, candidate: &str) -> bool {
        self.is_container && self.children_types.iter().any(|t| t == candidate)
    }

    pub fn validate_attribute(
        &self,
        name: &str,
        value: &AttributeValue,
        attribute_type: AttributeKind,
    ) -> SchemaResult<()> {
        let definition = self
            .defined_attribute(name)
            .ok_or_else(|| SchemaError::unknown_attribute(&self.type_name, name))?;

        if definition.attribute_type != attribute_type {
            return Err(SchemaError::type_mismatch(
                name,
                definition.attribute_type,
                attribute_type.to_string(),
            ));
        }

        if !attribute_type.accepts(value) {
            return Err(SchemaError::type_mismatch(
                name,
                definition.attribute_type,
                value.shape(),
            ));
        }

        Ok(())
    }

    /// Validate an attribute instance against its declaration
    pub fn validate_component_attribute(&self, attribute: &ComponentAttribute) -> SchemaResult<()> {
        self.validate_attribute(attribute.name(), attribute.value(), attribute.attribute_type())
    }
}

impl TryFrom<SchemaProps> for ComponentTypeSchema {
    type Error = SchemaError;

    fn try_from(props: SchemaProps) -> Result<Self, Self::Error> {
        Self::new(props)
    }
}

/// Trim type references the way the type key is trimmed, keeping the
/// first occurrence of each
fn normalize(types: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    types
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
