//! Per-entry component bundles
//!
//! `bundle-entries` bundles every declared component entry into the staging
//! directory. `prune-entry-styles` then copies the per-entry stylesheets into
//! the main and module outputs and removes the staging directory.

use crate::toolchain::Toolchain;
use async_trait::async_trait;
use kiln_core::context::{OutputTarget, PipelineContext, ProjectShape};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::{ConfigPipes, Phase, PhaseReport};
use kiln_core::tools::{BundleConfig, BundleEntry, BundleMode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub const BUNDLE_ENTRIES: &str = "bundle-entries";
pub const PRUNE_ENTRY_STYLES: &str = "prune-entry-styles";

pub struct BundleEntriesPhase {
    tools: Toolchain,
    pipes: Arc<ConfigPipes>,
}

impl BundleEntriesPhase {
    pub fn new(tools: Toolchain, pipes: Arc<ConfigPipes>) -> Self {
        Self { tools, pipes }
    }

    /// Bundler configuration after the bundle pipes ran
    pub fn config(&self, ctx: &PipelineContext) -> Result<BundleConfig> {
        let entries = ctx
            .component_entries
            .clone()
            .ok_or_else(|| KilnError::config("componentEntries is not set"))?;

        let base = BundleConfig::new(
            BundleEntry::Named(entries).resolved(&ctx.project_root),
            BundleMode::Production,
            ctx.resolve(&ctx.staging_dir),
        )
        .with_output_file_name("[name].js")
        .with_output_css_file_name("[name].css");

        self.pipes.apply_bundle(base)
    }
}

#[async_trait]
impl Phase for BundleEntriesPhase {
    fn name(&self) -> String {
        BUNDLE_ENTRIES.to_string()
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        ProjectShape::LIBRARY
    }

    fn enabled(&self, ctx: &PipelineContext) -> bool {
        ctx.component_entries.is_some()
    }

    fn inputs(&self, ctx: &PipelineContext) -> Vec<String> {
        ctx.component_entries
            .iter()
            .flat_map(|entries| entries.values())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        Some(ctx.staging_dir.clone())
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        let config = self.config(ctx)?;
        let outcome = self.tools.bundler.bundle(&config).await?;

        let files = outcome
            .assets
            .iter()
            .map(|asset| config.output_dir.join(&asset.name))
            .collect();
        Ok(PhaseReport::new(self.name(), files))
    }
}

#[derive(Debug, Default)]
pub struct PruneEntryStylesPhase;

#[async_trait]
impl Phase for PruneEntryStylesPhase {
    fn name(&self) -> String {
        PRUNE_ENTRY_STYLES.to_string()
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        ProjectShape::LIBRARY
    }

    fn depends_on(&self) -> Vec<String> {
        vec![BUNDLE_ENTRIES.to_string()]
    }

    fn enabled(&self, ctx: &PipelineContext) -> bool {
        ctx.component_entries.is_some()
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        Some(ctx.staging_dir.clone())
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        let staging = ctx.resolve(&ctx.staging_dir);
        let keep = ctx.entry_style_names();

        let mut copied = Vec::new();
        for name in &keep {
            let source = staging.join(name);
            if !source.is_file() {
                debug!("Entry produced no stylesheet: {}", name);
                continue;
            }

            for target in [OutputTarget::Main, OutputTarget::Module] {
                if let Some(dir) = ctx.output_dir(target) {
                    tokio::fs::create_dir_all(&dir).await?;
                    let destination = dir.join(name);
                    tokio::fs::copy(&source, &destination).await?;
                    copied.push(destination);
                }
            }
        }

        // Scripts of the entry bundles are discarded with the staging directory
        if staging.is_dir() {
            tokio::fs::remove_dir_all(&staging).await?;
            debug!("Removed staging directory {:?}", staging);
        }

        Ok(PhaseReport::new(self.name(), copied))
    }
}
