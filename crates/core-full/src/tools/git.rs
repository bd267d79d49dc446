/// Git command line client
use crate::process::{create_command, exec_command, exec_command_capture_stdout};
use async_trait::async_trait;
use kiln_core::error::Result;
use kiln_core::tools::SourceControl;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct GitCli;

#[async_trait]
impl SourceControl for GitCli {
    async fn staged_files(&self, root: &Path) -> Result<Vec<String>> {
        let mut command = create_command("git");
        command
            .args(["diff", "--cached", "--name-only", "--diff-filter=ACM"])
            .current_dir(root);

        let stdout = exec_command_capture_stdout(&mut command).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    async fn stage(&self, root: &Path, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let mut command = create_command("git");
        command.arg("add").args(files).current_dir(root);
        exec_command(&mut command).await?;
        Ok(())
    }
}
