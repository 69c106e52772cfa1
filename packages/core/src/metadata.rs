//! JSON-described component type schemas.
//!
//! ```json
//! {
//!   "components": [
//!     { "type": "network", "isContainer": true, "childrenTypes": ["server"] },
//!     { "type": "server", "parentTypes": ["network"],
//!       "definedAttributes": [{ "name": "name", "type": "String" }] }
//!   ]
//! }
//! ```

use crate::{CollaboratorResult, DataStore, Metadata, OperationContext};
use plugkit_common::FileSystem;
use plugkit_schema::{SchemaProps, SchemaRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Metadata file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    #[serde(default)]
    pub components: Vec<SchemaProps>,
}

enum MetadataSource {
    Inline(String),
    File {
        fs: Arc<dyn FileSystem>,
        path: PathBuf,
    },
}

/// `Metadata` reading schemas from a JSON document and installing the
/// resulting registry in the data store
pub struct JsonMetadata {
    store: Arc<dyn DataStore>,
    source: MetadataSource,
}

impl JsonMetadata {
    pub fn from_json(store: Arc<dyn DataStore>, json: impl Into<String>) -> Self {
        Self {
            store,
            source: MetadataSource::Inline(json.into()),
        }
    }

    /// Read the document from `path` each time metadata is parsed
    pub fn from_path(
        store: Arc<dyn DataStore>,
        fs: Arc<dyn FileSystem>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            source: MetadataSource::File {
                fs,
                path: path.into(),
            },
        }
    }

    fn load(&self) -> CollaboratorResult<MetadataDocument> {
        let document = match &self.source {
            MetadataSource::Inline(json) => serde_json::from_str(json)?,
            MetadataSource::File { fs, path } => {
                let json = fs.read_to_string(path)?;
                serde_json::from_str(&json)?
            }
        };
        Ok(document)
    }
}

impl Metadata for JsonMetadata {
    fn parse(&self, ctx: &OperationContext) -> CollaboratorResult<()> {
        let document = self.load()?;
        let registry = SchemaRegistry::from_props(document.components)?;

        debug!(id = %ctx.id(), types = registry.len(), "Schema registry built");
        self.store.set_registry(registry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollaboratorError, EventAction, EventKind, MemoryDataStore, PluginEvent};
    use plugkit_common::MockFileSystem;
    use plugkit_schema::SchemaError;

    const METADATA: &str = r#"{
        "components": [
            { "type": "network", "isContainer": true, "childrenTypes": ["server"] },
            {
                "type": "server",
                "parentTypes": ["network"],
                "definedAttributes": [{ "name": "name", "type": "String" }]
            }
        ]
    }"#;

    fn context(store: &MemoryDataStore) -> OperationContext {
        let id = store
            .emit_event(PluginEvent::begin(EventKind::Plugin, EventAction::Init))
            .unwrap();
        OperationContext::new(id, EventKind::Plugin, EventAction::Init)
    }

    #[test]
    fn test_inline_metadata() {
        let store = Arc::new(MemoryDataStore::default());
        let metadata = JsonMetadata::from_json(store.clone(), METADATA);

        metadata.parse(&context(&store)).unwrap();

        let registry = store.registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("server").unwrap().validate_parent(Some("network")));
    }

    #[test]
    fn test_file_metadata() {
        let mut fs = MockFileSystem::new();
        fs.add_file("metadata.json", METADATA);

        let store = Arc::new(MemoryDataStore::default());
        let metadata = JsonMetadata::from_path(store.clone(), Arc::new(fs), "metadata.json");

        metadata.parse(&context(&store)).unwrap();
        assert_eq!(store.registry().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_missing_file() {
        let store = Arc::new(MemoryDataStore::default());
        let metadata =
            JsonMetadata::from_path(store.clone(), Arc::new(MockFileSystem::new()), "nope.json");

        assert!(matches!(
            metadata.parse(&context(&store)),
            Err(CollaboratorError::File(_))
        ));
        assert!(store.registry().is_none());
    }

    #[test]
    fn test_invalid_schema_surfaces() {
        let store = Arc::new(MemoryDataStore::default());
        let metadata = JsonMetadata::from_json(
            store.clone(),
            r#"{ "components": [{ "type": "grid", "childrenPerLine": -2 }] }"#,
        );

        assert!(matches!(
            metadata.parse(&context(&store)),
            Err(CollaboratorError::Schema(SchemaError::InvalidSchema { .. }))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let store = Arc::new(MemoryDataStore::default());
        let metadata = JsonMetadata::from_json(store.clone(), "{ components: ");

        assert!(matches!(
            metadata.parse(&context(&store)),
            Err(CollaboratorError::Json(_))
        ));
    }
}
