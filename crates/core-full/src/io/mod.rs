// I/O operations module
// Handles source collection, copying and output cleanup

pub mod collector;
pub mod filters;

pub use collector::FileCollector;
pub use filters::{ExtensionFilter, FileFilter, IgnoreFilter, SourceFileFilter};

use kiln_core::context::is_nested_relative;
use kiln_core::error::{KilnError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write a file, creating parent directories
pub async fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Target of `file` below `out_dir`, keeping its layout relative to `base`
pub fn mirror_path(file: &Path, base: &Path, out_dir: &Path) -> PathBuf {
    let relative = file.strip_prefix(base).unwrap_or(file);
    out_dir.join(relative)
}

/// Copy files below `out_dir`, keeping their layout relative to `base`
pub async fn copy_preserving(files: &[PathBuf], base: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(files.len());

    for file in files {
        let target = mirror_path(file, base, out_dir);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &target).await?;
        copied.push(target);
    }

    debug!("Copied {} file(s) to {:?}", copied.len(), out_dir);
    Ok(copied)
}

/// Remove directories below `root`; missing ones are skipped.
///
/// Fails before removing anything when a directory is not strictly below `root`.
pub async fn clean_dirs(root: &Path, dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        let relative = dir.strip_prefix(root).unwrap_or(dir);
        if !is_nested_relative(relative) {
            return Err(KilnError::config(format!(
                "Refusing to remove {:?}: not inside {:?}",
                dir, root
            )));
        }
    }

    for dir in dirs {
        let path = root.join(dir);
        if path.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
            debug!("Removed {:?}", path);
        }
    }
    Ok(())
}

/// Path relative to `root`, or the path itself when outside of it
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_refuses_dirs_outside_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("dist/main")).unwrap();

        for dir in [".", "..", "dist/../..", "/"] {
            let dirs = vec![PathBuf::from("dist/main"), PathBuf::from(dir)];
            let err = clean_dirs(root, &dirs).await.unwrap_err();
            assert!(matches!(err, KilnError::Config(_)), "{dir}: {err}");
        }
        assert!(root.join("src").is_dir());
        assert!(root.join("dist/main").is_dir());

        clean_dirs(root, &[PathBuf::from("dist/main"), root.join("dist/esm5")])
            .await
            .unwrap();
        assert!(!root.join("dist/main").exists());
        assert!(root.join("src").is_dir());
    }
}
