//! Pipeline Composer
//!
//! Selects the phases that apply to a context and runs them in stages:
//! phases of a stage run concurrently, stages run strictly in order.
//! The first failing phase fails the whole run.

use super::core::{ContextReport, Phase, PhaseReport, PipelineReport};
use crate::context::{BuildPlan, PipelineContext};
use crate::error::{KilnError, Result};
use futures::future::try_join_all;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

pub struct Composer {
    name: String,
    phases: Vec<Box<dyn Phase>>,
}

impl Composer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a phase. Its dependencies must already be part of the composer.
    pub fn add_phase(mut self, phase: Box<dyn Phase>) -> Result<Self> {
        let name = phase.name();

        if self.phases.iter().any(|existing| existing.name() == name) {
            return Err(KilnError::config(format!(
                "Phase '{}' is added to '{}' more than once",
                name, self.name
            )));
        }

        let known: Vec<String> = self.phases.iter().map(|p| p.name()).collect();
        let missing: Vec<String> = phase
            .depends_on()
            .into_iter()
            .filter(|dep| !known.contains(dep))
            .collect();

        if !missing.is_empty() {
            return Err(KilnError::config(format!(
                "Phase '{}' depends on {:?} which are not part of '{}'.\n\
                 Available phases: {:?}\n\
                 Tip: add dependencies before the phases that need them",
                name, missing, self.name, known
            )));
        }

        debug!(
            "Adding phase '{}' to '{}' (depends on {:?})",
            name,
            self.name,
            phase.depends_on()
        );
        self.phases.push(phase);
        Ok(self)
    }

    pub fn add_phases(mut self, phases: Vec<Box<dyn Phase>>) -> Result<Self> {
        for phase in phases {
            self = self.add_phase(phase)?;
        }
        Ok(self)
    }

    pub fn phase_names(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Phases applying to the context's shape, enabled for it, and compatible
    /// with its watch flag
    pub fn select(&self, ctx: &PipelineContext) -> Vec<&dyn Phase> {
        self.phases
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.applies_to().contains(&ctx.shape))
            .filter(|p| !ctx.watch || p.watchable())
            .filter(|p| p.enabled(ctx))
            .collect()
    }

    /// Group the selected phases into stages by dependency depth.
    ///
    /// A dependency on a phase that is not selected counts as satisfied.
    pub fn stages(&self, ctx: &PipelineContext) -> Vec<Vec<&dyn Phase>> {
        let selected = self.select(ctx);
        let mut depth: HashMap<String, usize> = HashMap::new();
        let mut stages: Vec<Vec<&dyn Phase>> = Vec::new();

        // Registration order guarantees dependencies come first
        for phase in selected {
            let level = phase
                .depends_on()
                .iter()
                .filter_map(|dep| depth.get(dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);

            depth.insert(phase.name(), level);
            if stages.len() <= level {
                stages.resize_with(level + 1, Vec::new);
            }
            stages[level].push(phase);
        }

        stages
    }

    /// Run every context of the plan concurrently
    pub async fn compose(&self, plan: &BuildPlan) -> Result<PipelineReport> {
        if plan.is_empty() {
            return Err(KilnError::config(format!(
                "'{}' has no context to run for shape {}",
                self.name, plan.shape
            )));
        }

        if plan.contexts.iter().all(|ctx| self.select(ctx).is_empty()) {
            return Err(KilnError::config(format!(
                "No phase of '{}' applies to shape {}{}",
                self.name,
                plan.shape,
                if plan.mode.watch { " in watch mode" } else { "" }
            )));
        }

        debug!(
            "Composing '{}' over {} context(s)",
            self.name,
            plan.contexts.len()
        );

        let contexts = try_join_all(plan.contexts.iter().map(|ctx| self.run_context(ctx))).await?;
        Ok(PipelineReport { contexts })
    }

    /// Run the stages of one context in order
    pub async fn run_context(&self, ctx: &PipelineContext) -> Result<ContextReport> {
        let stages = self.stages(ctx);
        let mut report = ContextReport {
            package: ctx.package.clone(),
            stages: Vec::with_capacity(stages.len()),
        };

        for (index, stage) in stages.iter().enumerate() {
            debug!(
                "[{}] stage {}: {:?}",
                ctx.label(),
                index + 1,
                stage.iter().map(|p| p.name()).collect::<Vec<_>>()
            );

            let reports = try_join_all(stage.iter().map(|phase| run_phase(*phase, ctx))).await?;
            report.stages.push(reports);
        }

        if !ctx.watch {
            info!("[{}] {} finished", ctx.label(), self.name);
        }
        Ok(report)
    }
}

async fn run_phase(phase: &dyn Phase, ctx: &PipelineContext) -> Result<PhaseReport> {
    let name = phase.name();
    let started = Instant::now();
    debug!("[{}] phase '{}' started", ctx.label(), name);

    let report = phase
        .run(ctx)
        .await
        .map_err(|e| KilnError::phase(name.clone(), e))?;

    debug!(
        "[{}] phase '{}' finished in {}ms ({} files)",
        ctx.label(),
        name,
        started.elapsed().as_millis(),
        report.files.len()
    );
    Ok(report)
}
