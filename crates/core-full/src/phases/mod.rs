//! Concrete build phases
//!
//! File-driven phases build once per invocation; in watch mode they instead
//! watch their source roots and rebuild what changed.

pub mod bundle;
pub mod entries;
pub mod register;
pub mod resources;
pub mod styles;
pub mod transform;

pub use bundle::{BundleAnalysisPhase, BundleAppPhase};
pub use entries::{BundleEntriesPhase, PruneEntryStylesPhase};
pub use register::{analysis_catalog, build_catalog};
pub use resources::ResourcePhase;
pub use styles::StylePhase;
pub use transform::TransformPhase;

use crate::io::{FileCollector, FileFilter};
use crate::watch::watch_and_rebuild;
use kiln_core::context::{PipelineContext, SourceScope};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::PhaseReport;
use kiln_core::tools::SourceSet;
use std::future::Future;
use std::path::PathBuf;

/// Sources of a scope accepted by `filter`
pub(crate) async fn collect_sources<F>(
    ctx: &PipelineContext,
    scope: &SourceScope,
    extensions: &[&str],
    filter: F,
) -> Result<SourceSet>
where
    F: FileFilter + 'static,
{
    let patterns = scope.patterns(extensions);
    let files = FileCollector::new(filter)
        .collect_async(ctx.project_root.clone(), patterns)
        .await?;
    Ok(SourceSet::new(ctx.resolve(&scope.base), files))
}

/// Keep only the files that changed
pub(crate) fn restrict(sources: SourceSet, changed: Option<&[PathBuf]>) -> SourceSet {
    match changed {
        Some(changed) => SourceSet {
            files: sources
                .files
                .into_iter()
                .filter(|file| changed.contains(file))
                .collect(),
            base: sources.base,
        },
        None => sources,
    }
}

/// Watch the scope roots of a phase and rebuild on changes. Never resolves unless
/// the watcher fails.
pub(crate) async fn watch_scope<F, R, Fut>(
    phase: &str,
    ctx: &PipelineContext,
    scope: &SourceScope,
    filter: F,
    rebuild: R,
) -> Result<PhaseReport>
where
    F: FileFilter,
    R: FnMut(Vec<PathBuf>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let roots: Vec<PathBuf> = scope.roots().iter().map(|root| ctx.resolve(root)).collect();
    let label = format!("{} {}", ctx.label(), phase);

    watch_and_rebuild(&label, roots, filter, rebuild).await?;
    Err(KilnError::watch(format!("{label} stopped watching")))
}
