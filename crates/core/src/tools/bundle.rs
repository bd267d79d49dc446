/// Bundler contract
use super::PluginSpec;
use crate::config::WrapContent;
use crate::error::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleMode {
    Development,
    Production,
}

impl BundleMode {
    pub fn from_production(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Development
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleEntry {
    Single(PathBuf),
    Named(IndexMap<String, PathBuf>),
}

impl BundleEntry {
    /// Entry with every path made absolute under `root`
    pub fn resolved(&self, root: &std::path::Path) -> Self {
        match self {
            Self::Single(path) => Self::Single(root.join(path)),
            Self::Named(entries) => Self::Named(
                entries
                    .iter()
                    .map(|(name, path)| (name.clone(), root.join(path)))
                    .collect(),
            ),
        }
    }
}

/// Configuration handed to the bundler, after the bundle pipes ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    pub entry: BundleEntry,
    pub mode: BundleMode,
    pub output_dir: PathBuf,
    pub output_file_name: String,
    pub output_css_file_name: Option<String>,
    pub plugins: Vec<PluginSpec>,
    pub source_maps: bool,
    pub watch: bool,
    #[serde(skip)]
    pub wrap_content: Option<WrapContent>,
}

impl BundleConfig {
    pub fn new(entry: BundleEntry, mode: BundleMode, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            entry,
            mode,
            output_dir: output_dir.into(),
            output_file_name: "[name].js".to_string(),
            output_css_file_name: None,
            plugins: Vec::new(),
            source_maps: mode == BundleMode::Development,
            watch: false,
            wrap_content: None,
        }
    }

    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    pub fn with_output_css_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_css_file_name = Some(name.into());
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_plugin(mut self, plugin: PluginSpec) -> Self {
        self.plugins.push(plugin);
        self
    }
}

/// An emitted asset and the chunks it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAsset {
    pub name: String,
    #[serde(default)]
    pub chunk_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutcome {
    pub assets: Vec<BundleAsset>,
}

impl BundleOutcome {
    /// Assets of the `main` chunk that get header and footer wrapped around them.
    ///
    /// Every file of the chunk qualifies except workers.
    pub fn wrappable_assets(&self) -> Vec<&BundleAsset> {
        self.assets
            .iter()
            .filter(|asset| !asset.name.contains("worker.js"))
            .filter(|asset| asset.chunk_names.iter().any(|chunk| chunk == "main"))
            .collect()
    }
}

/// Wrap emitted content with a header and footer
pub fn wrap_content(content: &str, wrap: &WrapContent) -> String {
    let mut wrapped = String::with_capacity(wrap.header.len() + content.len() + wrap.footer.len());
    wrapped.push_str(&wrap.header);
    wrapped.push_str(content);
    wrapped.push_str(&wrap.footer);
    wrapped
}

#[async_trait]
pub trait Bundler: Send + Sync {
    /// Run the bundler. In watch mode this only returns on failure.
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutcome>;
}
