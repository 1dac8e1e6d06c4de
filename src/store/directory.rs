//! Documents on the local filesystem

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{ContentStore, FetchError};

/// Serves documents from a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentStore for DirectoryStore {
    async fn fetch_document(&self, path: &str) -> Result<Option<Value>, FetchError> {
        let full_path = self.root.join(path);
        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FetchError::Io {
                    path: full_path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| FetchError::InvalidJson {
                path: full_path.display().to_string(),
                source,
            })
    }
}
