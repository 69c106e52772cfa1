//! # Plugkit Schema
//!
//! Component type schemas and the structural rules they impose on a
//! component graph.
//!
//! ```text
//! SchemaProps ──build──▶ ComponentTypeSchema ──▶ SchemaRegistry
//!                                                     │
//!                         Component graph ◀─validate──┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use plugkit_schema::{
//!     AttributeKind, Component, ComponentAttribute, ComponentAttributeDefinition,
//!     SchemaProps, SchemaRegistry,
//! };
//!
//! let registry = SchemaRegistry::from_props([
//!     SchemaProps::new("network").container().with_children(["server"]),
//!     SchemaProps::new("server")
//!         .with_parents(["network"])
//!         .with_attribute(ComponentAttributeDefinition::new("name", AttributeKind::String)),
//! ])?;
//!
//! let lan = Component::new("lan", "network").with_child(
//!     Component::new("web", "server")
//!         .with_attribute(ComponentAttribute::new("name", "web-1", AttributeKind::String)),
//! );
//! registry.validate_component(&lan, None)?;
//! # Ok::<(), plugkit_schema::SchemaError>(())
//! ```

mod attribute;
mod component;
mod definition;
mod error;
mod registry;
mod visitor;

pub use attribute::{AttributeKind, AttributeValue, ComponentAttribute, ComponentAttributeDefinition};
pub use component::Component;
pub use definition::{ComponentTypeSchema, DisplayType, SchemaProps};
pub use error::{SchemaError, SchemaResult};
pub use registry::{LinkDefinition, SchemaRegistry};
pub use visitor::{walk_component, walk_components, ComponentVisitor};
