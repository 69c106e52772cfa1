use crate::{AttributeValue, ComponentAttribute};
use serde::{Deserialize, Serialize};

/// Node of the component graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Identifier, unique within one document
    pub id: String,

    /// Registry key of the component's type
    #[serde(rename = "type")]
    pub component_type: String,

    #[serde(default)]
    attributes: Vec<ComponentAttribute>,

    #[serde(default)]
    pub children: Vec<Component>,
}

impl Component {
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: ComponentAttribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn attributes(&self) -> &[ComponentAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&ComponentAttribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&AttributeValue> {
        self.attribute(name).map(ComponentAttribute::value)
    }

    /// Attach an attribute, replacing the value and kind of an existing
    /// attribute with the same name
    pub fn set_attribute(&mut self, attribute: ComponentAttribute) {
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name() == attribute.name())
        {
            Some(existing) => {
                let kind = attribute.attribute_type();
                existing.set_value(attribute.value().clone(), kind);
            }
            None => self.attributes.push(attribute),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<ComponentAttribute> {
        let index = self.attributes.iter().position(|attr| attr.name() == name)?;
        Some(self.attributes.remove(index))
    }

    /// Depth-first search for a component by id, including self
    pub fn find(&self, id: &str) -> Option<&Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Component> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}
