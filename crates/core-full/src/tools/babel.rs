/// Babel CLI transpiler
use crate::io;
use crate::process::{exec_command, npx};
use async_trait::async_trait;
use futures::stream::{self, TryStreamExt};
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::{TransformJob, Transpiler};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct BabelTranspiler {
    root: PathBuf,
}

impl BabelTranspiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn transform_file(&self, file: &Path, out_file: &Path, config: &Path, maps: bool) -> Result<()> {
        if let Some(parent) = out_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut command = npx("babel", &self.root);
        command
            .arg(file)
            .arg("--out-file")
            .arg(out_file)
            .arg("--config-file")
            .arg(config);
        if maps {
            command.args(["--source-maps", "inline"]);
        }

        exec_command(&mut command).await?;
        Ok(())
    }
}

#[async_trait]
impl Transpiler for BabelTranspiler {
    async fn transform(&self, job: &TransformJob) -> Result<Vec<PathBuf>> {
        if job.sources.is_empty() {
            return Ok(Vec::new());
        }

        let config_path = super::tool_cache_dir(&self.root)
            .join(super::generated_config_name("babel", &job.out_dir, "json"));
        let config = serde_json::to_string_pretty(&job.options.to_config())?;
        io::write_file(&config_path, config).await?;

        debug!(
            "Transpiling {} file(s) into {:?}",
            job.sources.files.len(),
            job.out_dir
        );

        let targets: Vec<(PathBuf, PathBuf)> = job
            .sources
            .files
            .iter()
            .map(|file| {
                let out = io::mirror_path(file, &job.sources.base, &job.out_dir).with_extension("js");
                (file.clone(), out)
            })
            .collect();

        stream::iter(targets.iter().map(Ok::<_, KilnError>))
            .try_for_each_concurrent(super::CONCURRENT_TOOL_RUNS, |(file, out)| {
                self.transform_file(file, out, &config_path, job.options.source_maps)
            })
            .await?;

        Ok(targets.into_iter().map(|(_, out)| out).collect())
    }
}
