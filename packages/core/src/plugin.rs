//! # Plugin Orchestrator
//!
//! Composes the data store, drawer, metadata, parser and renderer behind one
//! lifecycle API, and runs `init`, `parse` and `render` as observable units
//! of work:
//!
//! 1. A begin event allocates a fresh correlation id
//! 2. Every delegated call receives an `OperationContext` with that id
//! 3. The operation is closed with a single `success` event once all calls
//!    returned normally
//!
//! A failing call aborts the unit immediately. Its error reaches the caller
//! unchanged and the id is closed without a terminal event; nothing is
//! rolled back. Only the orchestrator closes operations, so the id stays
//! open for every delegated call of the unit.

use crate::{
    DataStore, Drawer, EventAction, EventError, EventKind, Metadata, OperationContext, Outcome,
    Parser, PluginEvent, PluginResult, Renderer, Resources,
};
use plugkit_common::{FileInformation, FileInput};
use std::sync::Arc;
use tracing::{field, info, instrument, warn, Span};

pub struct Plugin {
    data: Arc<dyn DataStore>,
    drawer: Box<dyn Drawer>,
    metadata: Box<dyn Metadata>,
    parser: Box<dyn Parser>,
    renderer: Box<dyn Renderer>,
}

impl Plugin {
    pub fn new(
        data: Arc<dyn DataStore>,
        drawer: Box<dyn Drawer>,
        metadata: Box<dyn Metadata>,
        parser: Box<dyn Parser>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            data,
            drawer,
            metadata,
            parser,
            renderer,
        }
    }

    pub fn data(&self) -> &Arc<dyn DataStore> {
        &self.data
    }

    /// Load the schemas and derive link definitions. Call once, before any
    /// other operation.
    #[instrument(skip_all, fields(id = field::Empty))]
    pub fn init(&self) -> PluginResult<()> {
        let event = PluginEvent::begin(EventKind::Plugin, EventAction::Init);

        self.run(event, |ctx| {
            self.metadata.parse(ctx)?;
            self.data.init_link_definitions(ctx)?;
            Ok(())
        })
    }

    /// Hand the resource bag to the drawer
    pub fn init_resources(&mut self, resources: Resources) {
        self.drawer.set_resources(resources);
    }

    /// Draw the component graph into the target identified by `target_id`
    pub fn draw(&self, target_id: &str) -> PluginResult<()> {
        Ok(self.drawer.draw(target_id)?)
    }

    /// Convert `inputs` into components, then read the configuration
    /// `file`. An empty `inputs` parses the configuration only.
    #[instrument(skip_all, fields(id = field::Empty, inputs = inputs.len()))]
    pub fn parse(&self, file: &FileInput, inputs: &[FileInput]) -> PluginResult<()> {
        let event = PluginEvent::begin(EventKind::Parser, EventAction::Read)
            .with_files(file_paths(inputs, file))
            .global();

        self.run(event, |ctx| {
            self.parser.parse(ctx, inputs)?;
            self.parser.parse_configuration(ctx, file)?;
            Ok(())
        })
    }

    pub fn is_parsable(&self, file_information: &FileInformation) -> bool {
        self.parser.is_parsable(file_information)
    }

    /// Render the configuration into `configuration_file`, then the
    /// components. Returns the rendered files followed by the configuration
    /// file.
    #[instrument(skip_all, fields(id = field::Empty, files = files.len()))]
    pub fn render(
        &self,
        mut configuration_file: FileInput,
        files: &[FileInput],
    ) -> PluginResult<Vec<FileInput>> {
        let event = PluginEvent::begin(EventKind::Render, EventAction::Write)
            .with_files(file_paths(files, &configuration_file))
            .global();

        self.run(event, |ctx| {
            self.renderer.render_configuration(ctx, &mut configuration_file)?;

            let mut rendered = self.renderer.render(ctx, files)?;
            rendered.push(configuration_file);
            Ok(rendered)
        })
    }

    /// Run one unit of work under a fresh correlation id
    fn run<T>(
        &self,
        event: PluginEvent,
        work: impl FnOnce(&OperationContext) -> PluginResult<T>,
    ) -> PluginResult<T> {
        let ctx = self.begin(event)?;

        match work(&ctx) {
            Ok(value) => {
                self.complete(ctx)?;
                Ok(value)
            }
            Err(err) => {
                let id = ctx.id();
                warn!(%id, error = %err, "Operation failed");
                if let Err(close_err) = self.data.close(ctx, Outcome::Failure) {
                    warn!(%id, error = %close_err, "Failed operation could not be closed");
                }
                Err(err)
            }
        }
    }

    fn begin(&self, event: PluginEvent) -> PluginResult<OperationContext> {
        let kind = event.kind.ok_or(EventError::MissingField("type"))?;
        let action = event.action.ok_or(EventError::MissingField("action"))?;
        let files = event.files.len();

        let id = self.data.emit_event(event)?;
        Span::current().record("id", field::display(id));
        info!(%id, ?kind, ?action, files, "Operation started");

        Ok(OperationContext::new(id, kind, action))
    }

    fn complete(&self, ctx: OperationContext) -> PluginResult<()> {
        let (id, kind) = (ctx.id(), ctx.kind());
        self.data.close(ctx, Outcome::Success)?;
        info!(%id, ?kind, "Operation succeeded");
        Ok(())
    }
}

/// Paths of `files`, then the path of `last`
fn file_paths(files: &[FileInput], last: &FileInput) -> Vec<String> {
    files
        .iter()
        .chain(std::iter::once(last))
        .map(|file| file.path.clone())
        .collect()
}
