/// Phase catalogs of the commands
use super::{
    BundleAnalysisPhase, BundleAppPhase, BundleEntriesPhase, PruneEntryStylesPhase, ResourcePhase,
    StylePhase, TransformPhase,
};
use crate::toolchain::Toolchain;
use kiln_core::context::OutputTarget;
use kiln_core::error::Result;
use kiln_core::pipeline::{Composer, ConfigPipes, Phase};
use std::sync::Arc;

/// Phases of `build` and `dev`
pub fn build_catalog(tools: &Toolchain, pipes: Arc<ConfigPipes>) -> Result<Composer> {
    let mut phases: Vec<Box<dyn Phase>> = Vec::new();

    for target in OutputTarget::ALL {
        phases.push(Box::new(TransformPhase::new(*target, tools.clone(), pipes.clone())));
    }
    for target in [OutputTarget::Main, OutputTarget::Module] {
        phases.push(Box::new(StylePhase::new(target, tools.clone())));
    }
    for target in OutputTarget::ALL {
        phases.push(Box::new(ResourcePhase::new(*target)));
    }
    phases.push(Box::new(BundleEntriesPhase::new(tools.clone(), pipes.clone())));
    phases.push(Box::new(PruneEntryStylesPhase));
    phases.push(Box::new(BundleAppPhase::new(tools.clone(), pipes)));

    Composer::new("build").add_phases(phases)
}

/// Phases of `analyse`
pub fn analysis_catalog(tools: &Toolchain, pipes: Arc<ConfigPipes>) -> Result<Composer> {
    Composer::new("analyse").add_phase(Box::new(BundleAnalysisPhase::new(tools.clone(), pipes)))
}
