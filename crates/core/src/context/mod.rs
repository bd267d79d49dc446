/// Per-invocation pipeline context
pub mod mapper;
pub mod shape;

pub use mapper::{BuildPlan, is_nested_relative, map_config};
pub use shape::{Mode, ProjectShape};

use crate::config::{PackageInfo, WrapContent, constants};
use crate::tools::{BundleEntry, ImportRewrite};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the distributions a library build emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputTarget {
    /// CommonJS modules
    Main,
    /// ES modules
    Module,
    /// ES modules without import rewriting, shipping raw styles
    Esm5,
}

impl OutputTarget {
    pub const ALL: &'static [OutputTarget] =
        &[OutputTarget::Main, OutputTarget::Module, OutputTarget::Esm5];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Module => "module",
            Self::Esm5 => "esm5",
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output directories, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub main: PathBuf,
    pub module: PathBuf,
    pub esm5: Option<PathBuf>,
}

impl OutputDirs {
    pub fn get(&self, target: OutputTarget) -> Option<&Path> {
        match target {
            OutputTarget::Main => Some(&self.main),
            OutputTarget::Module => Some(&self.module),
            OutputTarget::Esm5 => self.esm5.as_deref(),
        }
    }

    /// All present directories with their target
    pub fn iter(&self) -> impl Iterator<Item = (OutputTarget, &Path)> {
        OutputTarget::ALL
            .iter()
            .filter_map(|target| self.get(*target).map(|dir| (*target, dir)))
    }
}

/// Where a phase looks for its sources, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceScope {
    /// Output layout is relative to this directory
    pub base: PathBuf,
    /// Subdirectories of `base` to search; empty means `base` itself
    pub dirs: Vec<PathBuf>,
}

impl SourceScope {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            dirs: Vec::new(),
        }
    }

    pub fn with_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.dirs = dirs;
        self
    }

    /// Directories to search, relative to the project root
    pub fn roots(&self) -> Vec<PathBuf> {
        if self.dirs.is_empty() {
            vec![self.base.clone()]
        } else {
            self.dirs.iter().map(|dir| self.base.join(dir)).collect()
        }
    }

    /// Glob patterns matching the given extensions, relative to the project root
    pub fn patterns(&self, extensions: &[&str]) -> Vec<String> {
        let mut patterns = Vec::new();
        for root in self.roots() {
            for ext in extensions {
                let pattern = root.join("**").join(format!("*.{ext}"));
                patterns.push(pattern.to_string_lossy().replace('\\', "/"));
            }
        }
        patterns
    }
}

/// Everything a phase needs to know, fixed before any phase starts
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    pub shape: ProjectShape,
    /// Package this context builds, for multi-package projects
    pub package: Option<String>,
    pub watch: bool,
    pub production: bool,
    pub whole_project: bool,
    /// Absolute project root; every other path is relative to it
    pub project_root: PathBuf,
    pub source_root: PathBuf,
    pub output_dirs: OutputDirs,
    /// Scratch directory owned by the entry bundling phase
    pub staging_dir: PathBuf,
    /// Application bundle directory
    pub bundle_dir: PathBuf,
    pub script_scope: SourceScope,
    pub style_scope: SourceScope,
    pub css_extract: bool,
    pub out_file_name: String,
    pub out_css_file_name: String,
    pub component_entries: Option<IndexMap<String, PathBuf>>,
    pub app_entry: BundleEntry,
    pub analysis_entry: BundleEntry,
    pub wrap_content: Option<WrapContent>,
    /// Packages whose absolute imports are rewritten to relative paths
    pub known_packages: Vec<PackageInfo>,
}

impl PipelineContext {
    /// Absolute path of a project-relative path
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(path)
    }

    /// Absolute output directory of a target
    pub fn output_dir(&self, target: OutputTarget) -> Option<PathBuf> {
        self.output_dirs.get(target).map(|dir| self.resolve(dir))
    }

    /// Human readable label used in logs
    pub fn label(&self) -> String {
        match &self.package {
            Some(package) => format!("{} ({})", self.shape, package),
            None => self.shape.to_string(),
        }
    }

    /// Import rewriting applied to the given target's transpiled output
    pub fn import_rewrite(&self, target: OutputTarget) -> Option<ImportRewrite> {
        match target {
            OutputTarget::Esm5 => None,
            OutputTarget::Main | OutputTarget::Module => Some(ImportRewrite::new(
                self.css_extract,
                self.known_packages.clone(),
            )),
        }
    }

    /// Include path handed to style preprocessors
    pub fn style_include_paths(&self) -> Vec<PathBuf> {
        vec![self.resolve("node_modules")]
    }

    /// CSS artifact names produced by the entry bundle
    pub fn entry_style_names(&self) -> Vec<String> {
        self.component_entries
            .as_ref()
            .map(|entries| entries.keys().map(|name| format!("{name}.css")).collect())
            .unwrap_or_default()
    }

    /// Root entry of a component source tree
    pub fn component_entry(&self) -> PathBuf {
        self.source_root.join(constants::COMPONENT_ENTRY)
    }
}
