//! # Schema Registry
//!
//! Read-only collection of component type schemas, keyed by type.
//!
//! Building a registry checks that type keys are unique and that every
//! hierarchy and link reference points at a type of the same registry.
//! Once built, the registry answers structural questions about component
//! graphs.

use crate::{
    AttributeKind, Component, ComponentTypeSchema, SchemaError, SchemaProps, SchemaResult,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Link declared by a `Link` attribute of a component type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDefinition {
    /// Type declaring the link attribute
    pub source_type: String,

    /// Name of the link attribute
    pub attribute_name: String,

    /// Type the link points to
    pub target_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ComponentTypeSchema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry, checking uniqueness and reference closure
    pub fn build(schemas: impl IntoIterator<Item = ComponentTypeSchema>) -> SchemaResult<Self> {
        let mut registry = Self::default();

        for schema in schemas {
            let key = schema.type_name().to_string();
            if registry.index.contains_key(&key) {
                return Err(SchemaError::DuplicateType(key));
            }
            registry.index.insert(key, registry.schemas.len());
            registry.schemas.push(schema);
        }

        registry.check_references()?;
        Ok(registry)
    }

    /// Build schemas from raw props, then the registry
    pub fn from_props(props: impl IntoIterator<Item = SchemaProps>) -> SchemaResult<Self> {
        let schemas = props
            .into_iter()
            .map(ComponentTypeSchema::new)
            .collect::<SchemaResult<Vec<_>>>()?;
        Self::build(schemas)
    }

    fn check_references(&self) -> SchemaResult<()> {
        for schema in &self.schemas {
            let references = schema
                .parent_types()
                .iter()
                .map(|t| ("parentTypes", t))
                .chain(schema.children_types().iter().map(|t| ("childrenTypes", t)))
                .chain(
                    schema
                        .defined_attributes()
                        .iter()
                        .filter_map(|def| def.link_ref.as_ref())
                        .map(|t| ("definedAttributes.linkRef", t)),
                );

            for (field, reference) in references {
                if !self.index.contains_key(reference) {
                    return Err(SchemaError::UnknownTypeReference {
                        type_name: schema.type_name().to_string(),
                        field,
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<&ComponentTypeSchema> {
        self.index.get(type_name).map(|&i| &self.schemas[i])
    }

    /// Like `get`, failing with `UnknownType`
    pub fn require(&self, type_name: &str) -> SchemaResult<&ComponentTypeSchema> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    /// Schemas in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentTypeSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Every link declared in the registry, in registration order
    pub fn link_definitions(&self) -> Vec<LinkDefinition> {
        self.schemas
            .iter()
            .flat_map(|schema| {
                schema
                    .defined_attributes()
                    .iter()
                    .filter(|def| def.attribute_type == AttributeKind::Link)
                    .filter_map(move |def| {
                        def.link_ref.as_ref().map(|target| LinkDefinition {
                            source_type: schema.type_name().to_string(),
                            attribute_name: def.name.clone(),
                            target_type: target.clone(),
                        })
                    })
            })
            .collect()
    }

    /// Validate a component subtree placed under `parent_type`
    /// (`None` for the root): attributes, placement, container-ness and
    /// every child, recursively.
    pub fn validate_component(
        &self,
        component: &Component,
        parent_type: Option<&str>,
    ) -> SchemaResult<()> {
        let schema = self.require(&component.component_type)?;

        if !schema.validate_parent(parent_type) {
            let reason = match parent_type {
                Some(_) => "parent type is not allowed",
                None => "type cannot be placed at the root",
            };
            return Err(SchemaError::illegal_hierarchy(
                &component.component_type,
                parent_type,
                reason,
            ));
        }

        let mut seen = HashSet::new();
        for attribute in component.attributes() {
            if !seen.insert(attribute.name()) {
                return Err(SchemaError::DuplicateAttribute {
                    type_name: component.component_type.clone(),
                    name: attribute.name().to_string(),
                });
            }
            schema.validate_component_attribute(attribute)?;
        }

        if !component.children.is_empty() && !schema.is_container() {
            return Err(SchemaError::illegal_hierarchy(
                &component.children[0].component_type,
                Some(schema.type_name()),
                "parent is not a container",
            ));
        }

        for child in &component.children {
            if !schema.validate_child(&child.component_type) {
                return Err(SchemaError::illegal_hierarchy(
                    &child.component_type,
                    Some(schema.type_name()),
                    "child type is not allowed",
                ));
            }
            self.validate_component(child, Some(schema.type_name()))?;
        }

        Ok(())
    }

    /// Validate every root of a document
    pub fn validate_components(&self, roots: &[Component]) -> SchemaResult<()> {
        roots
            .iter()
            .try_for_each(|root| self.validate_component(root, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentAttributeDefinition;

    #[test]
    fn test_duplicate_type_rejected() {
        let result = SchemaRegistry::from_props([SchemaProps::new("disk"), SchemaProps::new("disk")]);
        assert_eq!(result.err(), Some(SchemaError::DuplicateType("disk".to_string())));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let result = SchemaRegistry::from_props([
            SchemaProps::new("server").container().with_children(["disk"]),
        ]);
        assert!(matches!(
            result,
            Err(SchemaError::UnknownTypeReference { field: "childrenTypes", .. })
        ));

        let result = SchemaRegistry::from_props([SchemaProps::new("server")
            .with_attribute(ComponentAttributeDefinition::link("backup", "bucket"))]);
        assert!(matches!(
            result,
            Err(SchemaError::UnknownTypeReference { field: "definedAttributes.linkRef", .. })
        ));
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = SchemaRegistry::from_props([
            SchemaProps::new("network"),
            SchemaProps::new("server").with_parents(["network"]),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("server"));
        assert!(registry.get("disk").is_none());
        assert_eq!(registry.require("disk").err(), Some(SchemaError::UnknownType("disk".into())));

        let types: Vec<_> = registry.iter().map(|s| s.type_name()).collect();
        assert_eq!(types, ["network", "server"]);
    }

    #[test]
    fn test_link_definitions() {
        let registry = SchemaRegistry::from_props([
            SchemaProps::new("server")
                .with_attribute(ComponentAttributeDefinition::new("name", AttributeKind::String))
                .with_attribute(ComponentAttributeDefinition::link("depends_on", "database")),
            SchemaProps::new("database"),
        ])
        .unwrap();

        assert_eq!(
            registry.link_definitions(),
            vec![LinkDefinition {
                source_type: "server".into(),
                attribute_name: "depends_on".into(),
                target_type: "database".into(),
            }]
        );
    }
}
