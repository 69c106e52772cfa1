//! # Plugkit Core
//!
//! Plugin substrate for documents made of typed, hierarchical components.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Plugin: init / parse / render / draw        │
//! │  - one correlation id per operation         │
//! │  - OperationContext threaded through calls  │
//! │  - closed once, success event on success    │
//! └─────────────────────────────────────────────┘
//!        ↓            ↓            ↓         ↓
//!    Metadata      Parser      Renderer   Drawer
//!        ↓            ↓            ↓
//! ┌─────────────────────────────────────────────┐
//! │ DataStore: events, schemas, links, graph    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Collaborators are injected explicitly; `MemoryDataStore`, `JsonMetadata`,
//! `StoreRenderer` and the no-op collaborators are ready-made
//! implementations.
//!
//! ## Usage
//!
//! ```rust
//! use plugkit_core::{
//!     DataStoreOptions, FileInput, JsonMetadata, MemoryDataStore, NoopDrawer, NoopParser,
//!     NoopRenderer, Plugin,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryDataStore::new(DataStoreOptions::default()));
//! store.subscribe(|event| println!("{:?} {:?}", event.id, event.status));
//!
//! let metadata = JsonMetadata::from_json(
//!     store.clone(),
//!     r#"{ "components": [{ "type": "server" }] }"#,
//! );
//! let plugin = Plugin::new(
//!     store.clone(),
//!     Box::new(NoopDrawer::default()),
//!     Box::new(metadata),
//!     Box::new(NoopParser),
//!     Box::new(NoopRenderer),
//! );
//!
//! plugin.init()?;
//! let files = plugin.render(FileInput::empty("config.json"), &[])?;
//! assert_eq!(files.len(), 1);
//! # Ok::<(), plugkit_core::PluginError>(())
//! ```

mod collaborators;
mod context;
mod error;
mod event;
mod metadata;
mod noop;
mod options;
mod plugin;
mod render;
mod store;

pub use collaborators::{
    ComponentRenderer, DataStore, Drawer, Metadata, Outcome, Parser, Renderer, Resources,
};
pub use context::OperationContext;
pub use error::{CollaboratorError, CollaboratorResult, EventError, PluginError, PluginResult};
pub use event::{CorrelationId, EventAction, EventKind, EventStatus, PluginEvent};
pub use metadata::{JsonMetadata, MetadataDocument};
pub use noop::{NoopDrawer, NoopMetadata, NoopParser, NoopRenderer};
pub use options::{DataStoreOptions, TerminalPolicy};
pub use plugin::Plugin;
pub use render::StoreRenderer;
pub use store::{EventListener, Link, MemoryDataStore};

// Re-export schema and file types for convenience
pub use plugkit_common::{FileInformation, FileInput};
pub use plugkit_schema as schema;
