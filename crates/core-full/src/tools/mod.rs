//! Node tool adapters
//!
//! Every adapter implements one of the core tool contracts by driving the
//! matching Node CLI through `npx` in the project root.

pub mod babel;
pub mod eslint;
pub mod git;
pub mod prettier;
pub mod style;
pub mod tsc;
pub mod webpack;

pub use babel::BabelTranspiler;
pub use eslint::EslintLinter;
pub use git::GitCli;
pub use prettier::PrettierFormatter;
pub use style::NodeStylePreprocessor;
pub use tsc::TscChecker;
pub use webpack::WebpackBundler;

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

/// Upper bound on tool processes one phase runs at a time
pub const CONCURRENT_TOOL_RUNS: usize = 8;

/// Scratch directory for generated tool configuration
pub fn tool_cache_dir(root: &Path) -> PathBuf {
    root.join("node_modules").join(".cache").join("kiln")
}

/// Stable file name for a generated config, unique per output directory
pub fn generated_config_name(tool: &str, out_dir: &Path, extension: &str) -> String {
    let mut hasher = DefaultHasher::new();
    out_dir.hash(&mut hasher);
    format!("{}.{:016x}.{}", tool, hasher.finish(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_names_differ_per_output() {
        let main = generated_config_name("babel", Path::new("dist/main"), "json");
        let module = generated_config_name("babel", Path::new("dist/module"), "json");

        assert_ne!(main, module);
        assert!(main.starts_with("babel."));
        assert!(main.ends_with(".json"));
        assert_eq!(main, generated_config_name("babel", Path::new("dist/main"), "json"));
    }
}
