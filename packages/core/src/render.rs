use crate::{CollaboratorResult, ComponentRenderer, DataStore, OperationContext, Renderer};
use plugkit_common::FileInput;
use std::sync::Arc;
use tracing::debug;

/// `Renderer` feeding the components and links of a data store, along with
/// the render inputs, to a `ComponentRenderer`
pub struct StoreRenderer<R> {
    store: Arc<dyn DataStore>,
    inner: R,
}

impl<R: ComponentRenderer> StoreRenderer<R> {
    pub fn new(store: Arc<dyn DataStore>, inner: R) -> Self {
        Self { store, inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ComponentRenderer> Renderer for StoreRenderer<R> {
    fn render_configuration(
        &self,
        ctx: &OperationContext,
        file: &mut FileInput,
    ) -> CollaboratorResult<()> {
        debug!(id = %ctx.id(), path = %file.path, "Rendering configuration");
        self.inner.render_configuration(&self.store.components(), file)
    }

    fn render(
        &self,
        ctx: &OperationContext,
        files: &[FileInput],
    ) -> CollaboratorResult<Vec<FileInput>> {
        let components = self.store.components();
        let links = self.store.links();
        let rendered = self.inner.render(&components, &links, files)?;

        debug!(
            id = %ctx.id(),
            inputs = files.len(),
            outputs = rendered.len(),
            links = links.len(),
            "Components rendered"
        );
        Ok(rendered)
    }
}
