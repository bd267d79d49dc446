/// Centralized error handling for kiln
pub mod kiln;

pub use kiln::{KilnError, Result};
