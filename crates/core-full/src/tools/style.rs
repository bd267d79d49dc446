/// Sass and Less compilers
use crate::process::{exec_command_capture_stdout, npx};
use async_trait::async_trait;
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::StylePreprocessor;
use std::path::{Path, PathBuf};

pub struct NodeStylePreprocessor {
    root: PathBuf,
}

impl NodeStylePreprocessor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StylePreprocessor for NodeStylePreprocessor {
    async fn compile_file(&self, file: &Path, include_paths: &[PathBuf]) -> Result<String> {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut command = match ext {
            "scss" => {
                let mut command = npx("sass", &self.root);
                command.arg("--no-source-map");
                for path in include_paths {
                    command.arg(format!("--load-path={}", path.display()));
                }
                command
            }
            "less" => {
                let mut command = npx("lessc", &self.root);
                if !include_paths.is_empty() {
                    let joined = std::env::join_paths(include_paths)
                        .map_err(|e| KilnError::tool("lessc", e.to_string()))?;
                    command.arg(format!("--include-path={}", joined.to_string_lossy()));
                }
                command
            }
            other => {
                return Err(KilnError::tool(
                    "style",
                    format!("unsupported stylesheet '{}' ({})", file.display(), other),
                ));
            }
        };

        command.arg(file);
        exec_command_capture_stdout(&mut command).await
    }
}
