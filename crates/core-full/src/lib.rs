pub mod commands;
pub mod context;
pub mod io;
pub mod phases;
pub mod plugins;
pub mod process;
pub mod toolchain;
pub mod tools;
pub mod watch;

// Re-export commonly used types
pub use commands::{LintOptions, Session};
pub use context::ProjectConfig;
pub use toolchain::Toolchain;
