use crate::{CommonError, CommonResult, FileInput};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File system abstraction for loading plugin inputs and testing
pub trait FileSystem: Send + Sync {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> CommonResult<String>;

    /// Load a file as a plugin input, keeping the path as given
    fn load(&self, path: &Path) -> CommonResult<FileInput> {
        let content = self.read_to_string(path)?;
        Ok(FileInput::with_content(path.to_string_lossy(), content))
    }
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Mock file system for testing
pub struct MockFileSystem {
    pub files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_load() {
        let mut fs = MockFileSystem::new();
        fs.add_file("defs/metadata.json", "{}");

        assert!(fs.exists(Path::new("defs/metadata.json")));
        let file = fs.load(Path::new("defs/metadata.json")).unwrap();
        assert_eq!(file.path, "defs/metadata.json");
        assert_eq!(file.content.as_deref(), Some("{}"));
    }

    #[test]
    fn test_mock_missing_file() {
        let fs = MockFileSystem::new();
        assert!(matches!(
            fs.read_to_string(Path::new("nope.json")),
            Err(CommonError::NotFound(_))
        ));
    }

    #[test]
    fn test_real_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, r#"{ "components": [] }"#).unwrap();

        let fs = RealFileSystem;
        assert!(fs.exists(&path));
        let file = fs.load(&path).unwrap();
        assert_eq!(file.content.as_deref(), Some(r#"{ "components": [] }"#));

        assert!(matches!(
            fs.read_to_string(&dir.path().join("missing.json")),
            Err(CommonError::Io(_))
        ));
    }
}
