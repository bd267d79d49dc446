//! Contracts of the external build tools.
//!
//! Each tool is reached through a trait so phases stay independent of how
//! the tool is actually invoked.

pub mod bundle;
pub mod lint;
pub mod rewrite;
pub mod style;
pub mod transform;
pub mod vcs;

pub use bundle::{BundleAsset, BundleConfig, BundleEntry, BundleMode, BundleOutcome, Bundler};
pub use lint::{
    Formatter, LintFileResult, LintMessage, LintReport, LintRequest, Linter, Severity, TypeChecker,
};
pub use rewrite::ImportRewrite;
pub use style::{StyleJob, StylePreprocessor};
pub use transform::{ModuleFormat, TransformJob, TransformOptions, Transpiler};
pub use vcs::SourceControl;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// A tool plugin or preset referenced by package name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

/// Concrete files handed to a tool, with the directory their layout is relative to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    pub base: PathBuf,
    pub files: Vec<PathBuf>,
}

impl SourceSet {
    pub fn new(base: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            base: base.into(),
            files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of the files relative to `base`
    pub fn relative_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| file.strip_prefix(&self.base).unwrap_or(file).to_path_buf())
            .collect()
    }
}
