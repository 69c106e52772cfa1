//! # Collaborator Contracts
//!
//! Capabilities the orchestrator composes. Any implementation of a trait
//! can be injected; the orchestrator never builds one itself.
//!
//! Every call made on behalf of an operation receives that operation's
//! `OperationContext`, so collaborators can attach their own events and
//! logs to the right correlation id.

use crate::{
    store::resolve_links, CollaboratorResult, CorrelationId, EventError, Link, OperationContext,
    PluginEvent,
};
use plugkit_common::{FileInformation, FileInput};
use plugkit_schema::{Component, LinkDefinition, SchemaRegistry, SchemaResult};
use std::sync::Arc;

/// Opaque resources consumed by the drawer (icons, templates, ...)
pub type Resources = serde_json::Value;

/// How an operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every delegated call returned normally; a success event is recorded
    Success,

    /// A delegated call failed; the id is released without a terminal event
    Failure,
}

/// Holds the event log, the schema registry and the component graph shared
/// by the other collaborators
pub trait DataStore: Send + Sync {
    /// Emit a non-terminal event.
    ///
    /// An event without id starts an operation and returns its new id. An
    /// event with an id reports progress of a running operation. Terminal
    /// statuses are rejected with `EventError::ReservedStatus`; operations
    /// end through `close`.
    fn emit_event(&self, event: PluginEvent) -> Result<CorrelationId, EventError>;

    /// End the operation `ctx` belongs to. Contexts are only created and
    /// owned by the orchestrator, so no collaborator can end an operation
    /// while it is still delegating work.
    fn close(&self, ctx: OperationContext, outcome: Outcome) -> Result<(), EventError>;

    /// Derive link definitions from the installed schemas
    fn init_link_definitions(&self, ctx: &OperationContext) -> CollaboratorResult<()>;

    /// Install the schema registry built by metadata
    fn set_registry(&self, registry: SchemaRegistry);

    fn registry(&self) -> Option<Arc<SchemaRegistry>>;

    fn link_definitions(&self) -> Vec<LinkDefinition>;

    /// Replace the component graph, rejecting a graph the installed
    /// registry does not allow
    fn replace_components(&self, components: Vec<Component>) -> SchemaResult<()>;

    /// Snapshot of the root components
    fn components(&self) -> Vec<Component>;

    fn find_component(&self, id: &str) -> Option<Component> {
        self.components()
            .iter()
            .find_map(|root| root.find(id))
            .cloned()
    }

    /// Resolve concrete links from the graph's link attributes
    fn links(&self) -> Vec<Link> {
        resolve_links(&self.link_definitions(), &self.components())
    }
}

pub trait Drawer: Send + Sync {
    fn set_resources(&mut self, resources: Resources);

    /// Draw the component graph into the target identified by `target_id`
    fn draw(&self, target_id: &str) -> CollaboratorResult<()>;
}

/// Loads and validates the component type schemas
pub trait Metadata: Send + Sync {
    fn parse(&self, ctx: &OperationContext) -> CollaboratorResult<()>;
}

pub trait Parser: Send + Sync {
    /// Convert file inputs into components
    fn parse(&self, ctx: &OperationContext, inputs: &[FileInput]) -> CollaboratorResult<()>;

    /// Read the components' configuration (layout, positions, ...)
    fn parse_configuration(&self, ctx: &OperationContext, file: &FileInput)
        -> CollaboratorResult<()>;

    fn is_parsable(&self, file_information: &FileInformation) -> bool;
}

pub trait Renderer: Send + Sync {
    /// Write the components' configuration into `file`
    fn render_configuration(
        &self,
        ctx: &OperationContext,
        file: &mut FileInput,
    ) -> CollaboratorResult<()>;

    /// Produce output files, in order
    fn render(&self, ctx: &OperationContext, files: &[FileInput])
        -> CollaboratorResult<Vec<FileInput>>;
}

/// Turns components and their links into files.
///
/// Composed into a `Renderer` by `StoreRenderer`.
pub trait ComponentRenderer: Send + Sync {
    /// `files` are the inputs handed to the render operation
    fn render(
        &self,
        components: &[Component],
        links: &[Link],
        files: &[FileInput],
    ) -> CollaboratorResult<Vec<FileInput>>;

    fn render_configuration(
        &self,
        _components: &[Component],
        _file: &mut FileInput,
    ) -> CollaboratorResult<()> {
        Ok(())
    }
}
