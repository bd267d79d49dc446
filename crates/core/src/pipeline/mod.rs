// Pipeline module - phase contract, composer and config pipes

pub mod composer;
pub mod core;
pub mod registry;

pub use composer::Composer;
pub use self::core::{ContextReport, Phase, PhaseReport, PipelineReport};
pub use registry::{ConfigPipe, ConfigPipes, PipeFn, PipeRegistry, PipeTarget, Plugin, register_plugins};
