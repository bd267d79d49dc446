/// Source control contract used by the lint command
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Added, copied or modified paths in the index, relative to the repository root
    async fn staged_files(&self, root: &Path) -> Result<Vec<String>>;

    /// Add files to the index
    async fn stage(&self, root: &Path, files: &[PathBuf]) -> Result<()>;
}
