//! Collaborators that do nothing, for bootstrapping a plugin that only
//! needs part of the lifecycle. They are never injected implicitly.

use crate::{CollaboratorResult, Drawer, Metadata, OperationContext, Parser, Renderer, Resources};
use plugkit_common::{FileInformation, FileInput};

/// Keeps the resources it receives and draws nothing
#[derive(Debug, Default)]
pub struct NoopDrawer {
    resources: Option<Resources>,
}

impl NoopDrawer {
    pub fn resources(&self) -> Option<&Resources> {
        self.resources.as_ref()
    }
}

impl Drawer for NoopDrawer {
    fn set_resources(&mut self, resources: Resources) {
        self.resources = Some(resources);
    }

    fn draw(&self, _target_id: &str) -> CollaboratorResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopMetadata;

impl Metadata for NoopMetadata {
    fn parse(&self, _ctx: &OperationContext) -> CollaboratorResult<()> {
        Ok(())
    }
}

/// Accepts no file
#[derive(Debug, Default)]
pub struct NoopParser;

impl Parser for NoopParser {
    fn parse(&self, _ctx: &OperationContext, _inputs: &[FileInput]) -> CollaboratorResult<()> {
        Ok(())
    }

    fn parse_configuration(
        &self,
        _ctx: &OperationContext,
        _file: &FileInput,
    ) -> CollaboratorResult<()> {
        Ok(())
    }

    fn is_parsable(&self, _file_information: &FileInformation) -> bool {
        false
    }
}

/// Renders no file and leaves the configuration untouched
#[derive(Debug, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_configuration(
        &self,
        _ctx: &OperationContext,
        _file: &mut FileInput,
    ) -> CollaboratorResult<()> {
        Ok(())
    }

    fn render(
        &self,
        _ctx: &OperationContext,
        _files: &[FileInput],
    ) -> CollaboratorResult<Vec<FileInput>> {
        Ok(Vec::new())
    }
}
