/// Prettier formatter
use crate::process::{exec_command_unchecked, npx, output_to_string};
use async_trait::async_trait;
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::Formatter;
use std::path::{Path, PathBuf};

pub struct PrettierFormatter {
    root: PathBuf,
}

impl PrettierFormatter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Formatter for PrettierFormatter {
    async fn format(&self, files: &[PathBuf], ignore_path: Option<&Path>) -> Result<Vec<PathBuf>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut command = npx("prettier", &self.root);
        command.args(["--list-different", "--write"]);
        if let Some(ignore_path) = ignore_path {
            command.arg("--ignore-path").arg(ignore_path);
        }
        command.args(files);

        let output = exec_command_unchecked(&mut command).await?;

        // Exit code 1 only reports differences
        if matches!(output.status.code(), Some(code) if code > 1) || output.status.code().is_none() {
            return Err(KilnError::tool(
                "prettier",
                output_to_string(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_changed(&output_to_string(&output.stdout)))
    }
}

fn parse_changed(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_changed() {
        let changed = parse_changed("src/a.ts\n\n  src/b.tsx  \n");
        assert_eq!(changed, vec![PathBuf::from("src/a.ts"), PathBuf::from("src/b.tsx")]);
    }
}
