/// Copy static resources into one output target
use super::{collect_sources, restrict, watch_scope};
use crate::io::{self, ExtensionFilter};
use async_trait::async_trait;
use kiln_core::config::constants::{RAW_STYLE_EXTENSIONS, RESOURCE_EXTENSIONS};
use kiln_core::context::{OutputTarget, PipelineContext, ProjectShape};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::{Phase, PhaseReport};
use std::path::{Path, PathBuf};

pub struct ResourcePhase {
    target: OutputTarget,
}

impl ResourcePhase {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    /// esm5 ships raw stylesheets next to the code
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut extensions = RESOURCE_EXTENSIONS.to_vec();
        if self.target == OutputTarget::Esm5 {
            extensions.extend_from_slice(RAW_STYLE_EXTENSIONS);
        }
        extensions
    }

    async fn build(&self, ctx: &PipelineContext, changed: Option<&[PathBuf]>) -> Result<Vec<PathBuf>> {
        let out_dir = ctx
            .output_dir(self.target)
            .ok_or_else(|| KilnError::config(format!("no {} output for {}", self.target, ctx.label())))?;

        let extensions = self.extensions();
        let sources = collect_sources(
            ctx,
            &ctx.script_scope,
            &extensions,
            ExtensionFilter::new(&extensions),
        )
        .await?;
        let sources = restrict(sources, changed);

        io::copy_preserving(&sources.files, &sources.base, &out_dir).await
    }
}

#[async_trait]
impl Phase for ResourcePhase {
    fn name(&self) -> String {
        format!("resources:{}", self.target)
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
        ctx.script_scope.patterns(&self.extensions())
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
                ExtensionFilter::new(&self.extensions()),
                |changed| async move { self.build(ctx, Some(changed.as_slice())).await.map(|_| ()) },
            )
            .await;
        }

        let files = self.build(ctx, None).await?;
        Ok(PhaseReport::new(self.name(), files))
    }
}
