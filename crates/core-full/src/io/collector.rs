use super::filters::FileFilter;
/// Glob based file collector with filter support
use glob::glob;
use kiln_core::error::{KilnError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct FileCollector<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> FileCollector<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Expand project-relative patterns under `root`.
    ///
    /// Results are absolute, sorted and free of duplicates.
    pub fn collect(&self, root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();

        for pattern in patterns {
            let full = root.join(pattern).to_string_lossy().replace('\\', "/");
            let entries = glob(&full)
                .map_err(|e| KilnError::other(format!("Invalid pattern '{pattern}': {e}")))?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() && self.filter.should_include(&path) => {
                        files.insert(path);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Skipping unreadable path: {}", e),
                }
            }
        }

        Ok(files.into_iter().collect())
    }

    /// Collect on the blocking pool
    pub async fn collect_async(self, root: PathBuf, patterns: Vec<String>) -> Result<Vec<PathBuf>>
    where
        F: 'static,
    {
        tokio::task::spawn_blocking(move || self.collect(&root, &patterns))
            .await
            .map_err(|e| KilnError::other(format!("File collection aborted: {e}")))?
    }
}
