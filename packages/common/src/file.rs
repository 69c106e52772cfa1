//! File representations exchanged between a plugin and its host.
//!
//! Content is opaque to the plugin core: only parsers and renderers look
//! inside it.

use crate::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file handed to a parser or produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInput {
    /// Path of the file, relative to the host project
    pub path: String,

    /// Raw content, `None` when the file is empty or not loaded yet
    #[serde(default)]
    pub content: Option<String>,
}

impl FileInput {
    pub fn new(path: impl Into<String>, content: Option<String>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// File with a known path and no content
    pub fn empty(path: impl Into<String>) -> Self {
        Self::new(path, None)
    }

    pub fn with_content(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, Some(content.into()))
    }

    /// Content of the file, failing when nothing was loaded
    pub fn require_content(&self) -> CommonResult<&str> {
        self.content
            .as_deref()
            .ok_or_else(|| CommonError::MissingContent(self.path.clone()))
    }

    pub fn information(&self) -> FileInformation {
        FileInformation::new(self.path.clone())
    }
}

/// Metadata used to decide whether a parser accepts a file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileInformation {
    pub path: String,
}

impl FileInformation {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path).extension().and_then(|ext| ext.to_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.path).file_name().and_then(|name| name.to_str())
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl From<&FileInput> for FileInformation {
    fn from(file: &FileInput) -> Self {
        file.information()
    }
}
