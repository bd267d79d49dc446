/// TS/TSX transpilation into one output target
use super::{collect_sources, restrict, watch_scope};
use crate::io::{self, SourceFileFilter};
use crate::toolchain::Toolchain;
use async_trait::async_trait;
use kiln_core::config::constants::SCRIPT_EXTENSIONS;
use kiln_core::context::{OutputTarget, PipelineContext, ProjectShape};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::{ConfigPipes, Phase, PhaseReport};
use kiln_core::tools::{ImportRewrite, ModuleFormat, TransformJob, TransformOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct TransformPhase {
    target: OutputTarget,
    tools: Toolchain,
    pipes: Arc<ConfigPipes>,
}

impl TransformPhase {
    pub fn new(target: OutputTarget, tools: Toolchain, pipes: Arc<ConfigPipes>) -> Self {
        Self {
            target,
            tools,
            pipes,
        }
    }

    fn module_format(&self) -> ModuleFormat {
        match self.target {
            OutputTarget::Main => ModuleFormat::CommonJs,
            OutputTarget::Module | OutputTarget::Esm5 => ModuleFormat::EsModules,
        }
    }

    /// Transpiler options after the transform pipes ran
    pub fn options(&self, ctx: &PipelineContext) -> Result<TransformOptions> {
        let base = TransformOptions::new(self.module_format())
            .with_source_maps(!ctx.production)
            .with_import_rewrite(ctx.import_rewrite(self.target));
        self.pipes.apply_transform(base)
    }

    async fn build(&self, ctx: &PipelineContext, changed: Option<&[PathBuf]>) -> Result<Vec<PathBuf>> {
        let out_dir = ctx
            .output_dir(self.target)
            .ok_or_else(|| KilnError::config(format!("no {} output for {}", self.target, ctx.label())))?;

        let sources = collect_sources(
            ctx,
            &ctx.script_scope,
            SCRIPT_EXTENSIONS,
            SourceFileFilter::new(SCRIPT_EXTENSIONS),
        )
        .await?;
        let sources = restrict(sources, changed);
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let options = self.options(ctx)?;
        let job = TransformJob {
            sources,
            out_dir,
            options,
        };
        let emitted = self.tools.transpiler.transform(&job).await?;

        if let Some(rewrite) = &job.options.import_rewrite
            && !rewrite.is_noop()
        {
            for file in &job.sources.files {
                let out = io::mirror_path(file, &job.sources.base, &job.out_dir).with_extension("js");
                let importer = io::relative_to(file, &ctx.project_root);
                rewrite_emitted(rewrite, &out, &importer).await?;
            }
        }

        Ok(emitted)
    }
}

/// Apply import rewriting to one emitted file
async fn rewrite_emitted(rewrite: &ImportRewrite, out: &Path, importer: &Path) -> Result<()> {
    if !out.is_file() {
        return Ok(());
    }

    let source = tokio::fs::read_to_string(out).await?;
    let rewritten = rewrite.rewrite_source(&source, importer);
    if rewritten != source {
        tokio::fs::write(out, rewritten).await?;
        debug!("Rewrote imports in {:?}", out);
    }
    Ok(())
}

#[async_trait]
impl Phase for TransformPhase {
    fn name(&self) -> String {
        format!("transform:{}", self.target)
    }

    fn applies_to(&self) -> &'static [ProjectShape] {
        ProjectShape::LIBRARY
    }

    fn watchable(&self) -> bool {
        true
    }

    fn enabled(&self, ctx: &PipelineContext) -> bool {
        ctx.output_dirs.get(self.target).is_some()
    }

    fn inputs(&self, ctx: &PipelineContext) -> Vec<String> {
        ctx.script_scope.patterns(SCRIPT_EXTENSIONS)
    }

    fn output(&self, ctx: &PipelineContext) -> Option<PathBuf> {
        ctx.output_dirs.get(self.target).map(Path::to_path_buf)
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport> {
        if ctx.watch {
            return watch_scope(
                &self.name(),
                ctx,
                &ctx.script_scope,
                SourceFileFilter::new(SCRIPT_EXTENSIONS),
                |changed| async move { self.build(ctx, Some(changed.as_slice())).await.map(|_| ()) },
            )
            .await;
        }

        let files = self.build(ctx, None).await?;
        Ok(PhaseReport::new(self.name(), files))
    }
}
