use crate::{Component, ComponentAttribute};

/// Visitor pattern for traversing the component graph immutably
///
/// Default implementations walk the entire tree depth-first, parents before
/// children. Override specific visit_* methods to act on nodes.
pub trait ComponentVisitor: Sized {
    fn visit_component(&mut self, component: &Component, parent: Option<&Component>) {
        walk_component(self, component, parent);
    }

    fn visit_attribute(&mut self, _component: &Component, _attribute: &ComponentAttribute) {
        // Leaf node, no children to walk
    }
}

pub fn walk_components<V: ComponentVisitor>(visitor: &mut V, components: &[Component]) {
    for component in components {
        visitor.visit_component(component, None);
    }
}

pub fn walk_component<V: ComponentVisitor>(
    visitor: &mut V,
    component: &Component,
    _parent: Option<&Component>,
) {
    for attribute in component.attributes() {
        visitor.visit_attribute(component, attribute);
    }
    for child in &component.children {
        visitor.visit_component(child, Some(component));
    }
}
