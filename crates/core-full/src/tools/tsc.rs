/// TypeScript compiler in check-only mode
use crate::process::{exec_command, npx};
use async_trait::async_trait;
use kiln_core::error::Result;
use kiln_core::tools::TypeChecker;
use std::path::Path;

#[derive(Debug, Default)]
pub struct TscChecker;

#[async_trait]
impl TypeChecker for TscChecker {
    async fn check(&self, project_root: &Path) -> Result<()> {
        let mut command = npx("tsc", project_root);
        command.arg("--noEmit");
        exec_command(&mut command).await?;
        Ok(())
    }
}
