// Phase contract - one named unit of build work
use crate::context::{PipelineContext, ProjectShape};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait Phase: Send + Sync {
    fn name(&self) -> String;

    /// Shapes this phase is selected for
    fn applies_to(&self) -> &'static [ProjectShape];

    /// Whether the phase keeps running in watch mode
    fn watchable(&self) -> bool {
        false
    }

    /// Phases that must finish before this one starts
    fn depends_on(&self) -> Vec<String> {
        Vec::new()
    }

    /// Context-dependent switch, e.g. a target the context does not emit
    fn enabled(&self, _ctx: &PipelineContext) -> bool {
        true
    }

    /// Source patterns the phase reads, relative to the project root
    fn inputs(&self, _ctx: &PipelineContext) -> Vec<String> {
        Vec::new()
    }

    /// Directory the phase writes to, relative to the project root
    fn output(&self, _ctx: &PipelineContext) -> Option<PathBuf> {
        None
    }

    /// Run against a read-only context. In watch mode watchable phases do not return.
    async fn run(&self, ctx: &PipelineContext) -> Result<PhaseReport>;
}

/// What a finished phase produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: String,
    pub files: Vec<PathBuf>,
}

impl PhaseReport {
    pub fn new(phase: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            phase: phase.into(),
            files,
        }
    }

    pub fn empty(phase: impl Into<String>) -> Self {
        Self::new(phase, Vec::new())
    }
}

/// Reports of one context, stage by stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextReport {
    pub package: Option<String>,
    pub stages: Vec<Vec<PhaseReport>>,
}

impl ContextReport {
    pub fn phases(&self) -> impl Iterator<Item = &PhaseReport> {
        self.stages.iter().flatten()
    }
}

/// Result of a whole composed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub contexts: Vec<ContextReport>,
}

impl PipelineReport {
    pub fn file_count(&self) -> usize {
        self.contexts
            .iter()
            .flat_map(|c| c.phases())
            .map(|p| p.files.len())
            .sum()
    }

    pub fn phase_names(&self) -> Vec<&str> {
        self.contexts
            .iter()
            .flat_map(|c| c.phases())
            .map(|p| p.phase.as_str())
            .collect()
    }
}
