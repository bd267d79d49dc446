/// Application and analysis bundles
use crate::toolchain::Toolchain;
use async_trait::async_trait;
use kiln_core::config::WrapContent;
use kiln_core::context::{PipelineContext, ProjectShape};
use kiln_core::error::Result;
use kiln_core::pipeline::{ConfigPipes, Phase, PhaseReport};
use kiln_core::tools::bundle::wrap_content;
use kiln_core::tools::{BundleConfig, BundleMode, BundleOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct BundleAppPhase {
    tools: Toolchain,
    pipes: Arc<ConfigPipes>,
}

impl BundleAppPhase {
    pub fn new(tools: Toolchain, pipes: Arc<ConfigPipes>) -> Self {
        Self { tools, pipes }
    }

    pub fn config(&self, ctx: &PipelineContext) -> Result<BundleConfig> {
        let base = BundleConfig::new(
            ctx.app_entry.resolved(&ctx.project_root),
            BundleMode::from_production(ctx.production),
            ctx.resolve(&ctx.bundle_dir),
        )
        .with_output_file_name(ctx.out_file_name.clone())
        .with_output_css_file_name(ctx.out_css_file_name.clone())
        .with_watch(ctx.watch);

        self.pipes.apply_bundle(base)
    }
}

#[async_trait]
impl Phase for BundleAppPhase {
    fn name(&self) -> String {
        "bundle-app".to_string()
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        &[ProjectShape::SingleProject]
    }

    fn watchable(&self) -> bool {
        true
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        Some(ctx.bundle_dir.clone())
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        let config = self.config(ctx)?;
        let outcome = self.tools.bundler.bundle(&config).await?;

        if let Some(wrap) = &config.wrap_content {
            wrap_assets(&outcome, &config.output_dir, wrap).await?;
        }

        Ok(PhaseReport::new(self.name(), asset_paths(&outcome, &config.output_dir)))
    }
}

pub struct BundleAnalysisPhase {
    tools: Toolchain,
    pipes: Arc<ConfigPipes>,
}

impl BundleAnalysisPhase {
    pub fn new(tools: Toolchain, pipes: Arc<ConfigPipes>) -> Self {
        Self { tools, pipes }
    }

    pub fn config(&self, ctx: &PipelineContext) -> Result<BundleConfig> {
        let base = BundleConfig::new(
            ctx.analysis_entry.resolved(&ctx.project_root),
            BundleMode::Production,
            ctx.resolve(&ctx.bundle_dir),
        )
        .with_output_css_file_name(ctx.out_css_file_name.clone());

        self.pipes.apply_bundle(base)
    }
}

#[async_trait]
impl Phase for BundleAnalysisPhase {
    fn name(&self) -> String {
        "bundle-analysis".to_string()
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        &[ProjectShape::SingleProject, ProjectShape::SingleComponent]
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        Some(ctx.bundle_dir.clone())
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        let config = self.config(ctx)?;
        let outcome = self.tools.bundler.bundle(&config).await?;
        Ok(PhaseReport::new(self.name(), asset_paths(&outcome, &config.output_dir)))
    }
}

fn asset_paths(outcome: &BundleOutcome, output_dir: &Path) -> Vec<PathBuf> {
    outcome
        .assets
        .iter()
        .map(|asset| output_dir.join(&asset.name))
        .collect()
}

/// Wrap header and footer around the emitted main chunk
pub async fn wrap_assets(outcome: &BundleOutcome, output_dir: &Path, wrap: &WrapContent) -> Result<()> {
    for asset in outcome.wrappable_assets() {
        let path = output_dir.join(&asset.name);
        let content = tokio::fs::read_to_string(&path).await?;
        tokio::fs::write(&path, wrap_content(&content, wrap)).await?;
        debug!("Wrapped {:?}", path);
    }
    Ok(())
}
