//! Import-path rewriting for transpiled output.
//!
//! Style references are pointed at their compiled CSS, and in whole-project
//! builds package-absolute imports of local packages become relative paths.

use crate::config::PackageInfo;
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static SCSS_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\.scss$").expect("valid scss pattern"));

static MODULE_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<lead>\bfrom\s*|\bimport\s*\(?\s*|\brequire\s*\(\s*)(?P<open>['"])(?P<spec>[^'"\r\n]+)(?P<close>['"])"#,
    )
    .expect("valid specifier pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRewrite {
    style_extraction: bool,
    packages: Vec<PackageInfo>,
}

impl ImportRewrite {
    pub fn new(style_extraction: bool, packages: Vec<PackageInfo>) -> Self {
        Self {
            style_extraction,
            packages,
        }
    }

    /// Rewrite one module reference made by `importer`.
    ///
    /// `importer` is the project-relative path of the importing source file.
    /// Rewriting is idempotent; anything not matched is returned unchanged.
    pub fn rewrite(&self, specifier: &str, importer: &Path) -> String {
        if self.style_extraction && SCSS_REFERENCE.is_match(specifier) {
            return SCSS_REFERENCE.replace(specifier, "$1.css").into_owned();
        }

        for package in &self.packages {
            if package.package_name.as_deref() == Some(specifier) {
                let from = importer.parent().unwrap_or_else(|| Path::new(""));
                return relative_specifier(from, &package.source_dir());
            }
        }

        specifier.to_string()
    }

    /// Rewrite every module specifier found in a JavaScript source
    pub fn rewrite_source(&self, source: &str, importer: &Path) -> String {
        MODULE_SPECIFIER
            .replace_all(source, |caps: &Captures| {
                format!(
                    "{}{}{}{}",
                    &caps["lead"],
                    &caps["open"],
                    self.rewrite(&caps["spec"], importer),
                    &caps["close"]
                )
            })
            .into_owned()
    }

    pub fn is_noop(&self) -> bool {
        !self.style_extraction && self.packages.is_empty()
    }
}

/// `/`-separated relative path that always starts with `.`
fn relative_specifier(from: &Path, to: &Path) -> String {
    let relative = pathdiff::diff_paths(to, from).unwrap_or_else(|| to.to_path_buf());
    let joined = normalize(&relative);

    if joined.is_empty() {
        ".".to_string()
    } else if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

fn normalize(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect();
    PathBuf::from_iter(parts.iter())
        .to_string_lossy()
        .replace('\\', "/")
}
