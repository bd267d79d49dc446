/// File filter implementations
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File filter trait
pub trait FileFilter: Send + Sync {
    fn should_include(&self, path: &Path) -> bool;
}

/// Accept files by extension
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl FileFilter for ExtensionFilter {
    fn should_include(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Skip TypeScript declaration files
pub struct SourceFileFilter {
    inner: ExtensionFilter,
}

impl SourceFileFilter {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            inner: ExtensionFilter::new(extensions),
        }
    }
}

impl FileFilter for SourceFileFilter {
    fn should_include(&self, path: &Path) -> bool {
        let declaration = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".d.ts"));
        !declaration && self.inner.should_include(path)
    }
}

/// Rules of a gitignore-style file such as `.eslintignore`
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    root: PathBuf,
    rules: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: impl Into<PathBuf>, content: &str) -> Self {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);

        for line in content.lines() {
            if let Err(e) = builder.add_line(None, line) {
                warn!("Ignoring invalid ignore pattern '{}': {}", line.trim(), e);
            }
        }

        let rules = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build ignore rules: {}", e);
            Gitignore::empty()
        });
        Self { root, rules }
    }

    /// Read the ignore file; a missing file ignores nothing
    pub fn load(root: &Path, file: &Path) -> Self {
        match std::fs::read_to_string(root.join(file)) {
            Ok(content) => Self::new(root, &content),
            Err(_) => Self::new(root, ""),
        }
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if relative.has_root() {
            return false;
        }
        self.rules
            .matched_path_or_any_parents(relative, false)
            .is_ignore()
    }
}

impl FileFilter for IgnoreFilter {
    fn should_include(&self, path: &Path) -> bool {
        !self.is_ignored(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        let filter = ExtensionFilter::new(&["ts", "tsx"]);
        assert!(filter.should_include(Path::new("src/a.tsx")));
        assert!(!filter.should_include(Path::new("src/a.scss")));
        assert!(!filter.should_include(Path::new("src/Makefile")));
    }

    #[test]
    fn test_source_filter_skips_declarations() {
        let filter = SourceFileFilter::new(&["ts"]);
        assert!(filter.should_include(Path::new("src/a.ts")));
        assert!(!filter.should_include(Path::new("src/types.d.ts")));
    }

    #[test]
    fn test_ignore_filter() {
        let filter = IgnoreFilter::new("/work", "# generated\nsrc/legacy/\n*.spec.ts\n\n");

        assert!(filter.is_ignored(Path::new("/work/src/legacy/old.ts")));
        assert!(filter.is_ignored(Path::new("/work/src/a.spec.ts")));
        assert!(!filter.is_ignored(Path::new("/work/src/a.ts")));
        assert!(filter.should_include(Path::new("src/b.tsx")));
    }

    #[test]
    fn test_ignore_filter_matches_nested_dirs_and_negations() {
        let filter = IgnoreFilter::new("/work", "generated\n*.ts\n!src/keep.ts\n");

        assert!(filter.is_ignored(Path::new("/work/src/generated/api.tsx")));
        assert!(filter.is_ignored(Path::new("/work/generated/deep/x.js")));
        assert!(filter.is_ignored(Path::new("/work/src/a.ts")));
        assert!(!filter.is_ignored(Path::new("/work/src/keep.ts")));
        assert!(!filter.is_ignored(Path::new("/work/src/a.tsx")));
    }

    #[test]
    fn test_missing_ignore_file_ignores_nothing() {
        let filter = IgnoreFilter::load(Path::new("/nonexistent"), Path::new(".eslintignore"));
        assert!(!filter.is_ignored(Path::new("/nonexistent/src/a.ts")));
    }
}
