/// SCSS and LESS compilation into one output target
use super::{collect_sources, watch_scope};
use crate::io::{self, ExtensionFilter};
use crate::toolchain::Toolchain;
use crate::tools::CONCURRENT_TOOL_RUNS;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use kiln_core::config::constants::STYLE_EXTENSIONS;
use kiln_core::context::{OutputTarget, PipelineContext, ProjectShape};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::{Phase, PhaseReport};
use kiln_core::tools::StyleJob;
use kiln_core::tools::style::{concat_css, strip_css_comments};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct StylePhase {
    target: OutputTarget,
    tools: Toolchain,
}

impl StylePhase {
    pub fn new(target: OutputTarget, tools: Toolchain) -> Self {
        Self { target, tools }
    }

    async fn job(&self, ctx: &PipelineContext) -> Result<StyleJob> {
        let out_dir = ctx
            .output_dir(self.target)
            .ok_or_else(|| KilnError::config(format!("no {} output for {}", self.target, ctx.label())))?;

        let sources = collect_sources(
            ctx,
            &ctx.style_scope,
            STYLE_EXTENSIONS,
            ExtensionFilter::new(STYLE_EXTENSIONS),
        )
        .await?;

        Ok(StyleJob {
            sources,
            out_dir,
            extract_to: ctx.css_extract.then(|| ctx.out_css_file_name.clone()),
            include_paths: ctx.style_include_paths(),
        })
    }

    async fn build(&self, ctx: &PipelineContext) -> Result<Vec<PathBuf>> {
        let job = self.job(ctx).await?;
        let entries = job.entry_files();
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let styles = &self.tools.styles;
        let include_paths = &job.include_paths;
        let pending: Vec<_> = entries
            .iter()
            .copied()
            .map(|file| async move {
                let css = styles.compile_file(file, include_paths).await?;
                Ok::<_, KilnError>(strip_css_comments(&css))
            })
            .collect();
        let compiled: Vec<String> = stream::iter(pending)
            .buffered(CONCURRENT_TOOL_RUNS)
            .try_collect()
            .await?;

        match &job.extract_to {
            Some(name) => {
                let target = job.out_dir.join(name);
                io::write_file(&target, concat_css(compiled.iter().map(String::as_str))).await?;
                debug!("Extracted {} stylesheet(s) into {:?}", compiled.len(), target);
                Ok(vec![target])
            }
            None => {
                let mut written = Vec::with_capacity(entries.len());
                for (file, css) in entries.iter().zip(compiled) {
                    let target = io::mirror_path(file, &job.sources.base, &job.out_dir)
                        .with_extension("css");
                    io::write_file(&target, css).await?;
                    written.push(target);
                }
                Ok(written)
            }
        }
    }
}

#[async_trait]
impl Phase for StylePhase {
    fn name(&self) -> String {
        format!("styles:{}", self.target)
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        ProjectShape::LIBRARY
    }

    fn watchable(&self) -> bool {
        true
    }

    /// Entry bundles carry their own styles
    fn enabled(&self, ctx: &PipelineContext) -> bool {
        ctx.component_entries.is_none() && ctx.output_dirs.get(self.target).is_some()
    }

    fn inputs(&self, ctx: &PipelineContext) -> Vec<String> {
        ctx.style_scope.patterns(STYLE_EXTENSIONS)
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        ctx.output_dirs.get(self.target).map(Path::to_path_buf)
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        if ctx.watch {
            // Partials affect every sheet importing them
            return watch_scope(
                &self.name(),
                ctx,
                &ctx.style_scope,
                ExtensionFilter::new(STYLE_EXTENSIONS),
                |_| async move { self.build(ctx).await.map(|_| ()) },
            )
            .await;
        }

        let files = self.build(ctx).await?;
        Ok(PhaseReport::new(self.name(), files))
    }
}
