pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod tools;

pub use context::{BuildPlan, Mode, PipelineContext, ProjectShape, map_config};
pub use error::{KilnError, Result};
