/// Style preprocessor contract
use super::SourceSet;
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("valid comment pattern"));

/// One style compilation
#[derive(Debug, Clone)]
pub struct StyleJob {
    pub sources: SourceSet,
    pub out_dir: PathBuf,
    /// Concatenate every compiled sheet into this file name
    pub extract_to: Option<String>,
    pub include_paths: Vec<PathBuf>,
}

impl StyleJob {
    /// Sources compiled on their own; SCSS partials are only imported
    pub fn entry_files(&self) -> Vec<&PathBuf> {
        self.sources
            .files
            .iter()
            .filter(|file| !is_partial(file))
            .collect()
    }
}

#[async_trait]
pub trait StylePreprocessor: Send + Sync {
    /// Compile one stylesheet to CSS
    async fn compile_file(&self, file: &Path, include_paths: &[PathBuf]) -> Result<String>;
}

/// `_name.scss` files are partials
pub fn is_partial(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "scss")
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('_'))
}

pub fn strip_css_comments(css: &str) -> String {
    CSS_COMMENT.replace_all(css, "").into_owned()
}

/// Concatenate compiled sheets in source order
pub fn concat_css<'a>(sheets: impl IntoIterator<Item = &'a str>) -> String {
    let mut joined = String::new();
    for sheet in sheets {
        let sheet = sheet.trim_end();
        if sheet.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('\n');
        }
        joined.push_str(sheet);
    }
    joined.push('\n');
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let css = "/* header\n multi */\n.a { color: red; /* inline */ }\n";
        assert_eq!(strip_css_comments(css), "\n.a { color: red;  }\n");
    }

    #[test]
    fn test_partials() {
        assert!(is_partial(Path::new("src/_vars.scss")));
        assert!(!is_partial(Path::new("src/vars.scss")));
        assert!(!is_partial(Path::new("src/_vars.less")));
    }

    #[test]
    fn test_concat_skips_empty_sheets() {
        assert_eq!(concat_css([".a{}\n", "", ".b{}"]), ".a{}\n.b{}\n");
    }
}
