// Fake tools shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::{
    BundleAsset, BundleConfig, BundleEntry, BundleOutcome, Bundler, Formatter, LintFileResult,
    LintReport, LintRequest, Linter, SourceControl, StylePreprocessor, TransformJob, Transpiler,
    TypeChecker,
};
use kiln_core_full::Toolchain;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct Calls {
    pub bundles: Mutex<Vec<BundleConfig>>,
    pub transforms: Mutex<Vec<PathBuf>>,
    pub staged: Mutex<Vec<PathBuf>>,
    pub lint_requests: Mutex<Vec<LintRequest>>,
    pub type_checks: Mutex<usize>,
}

/// Writes every source file unchanged as `.js`
pub struct CopyTranspiler {
    pub calls: Arc<Calls>,
    pub fail: bool,
}

#[async_trait]
impl Transpiler for CopyTranspiler {
    async fn transform(&self, job: &TransformJob) -> Result<Vec<PathBuf>> {
        if self.fail {
            return Err(KilnError::tool("babel", "Unexpected token (1:4)"));
        }
        self.calls.transforms.lock().unwrap().push(job.out_dir.clone());

        let mut emitted = Vec::new();
        for file in &job.sources.files {
            let relative = file.strip_prefix(&job.sources.base).unwrap();
            let out = job.out_dir.join(relative).with_extension("js");
            std::fs::create_dir_all(out.parent().unwrap())?;
            std::fs::copy(file, &out)?;
            emitted.push(out);
        }
        Ok(emitted)
    }
}

/// Emits one file per named entry, plus a stylesheet when CSS is extracted
pub struct RecordingBundler {
    pub calls: Arc<Calls>,
}

#[async_trait]
impl Bundler for RecordingBundler {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutcome> {
        self.calls.bundles.lock().unwrap().push(config.clone());
        std::fs::create_dir_all(&config.output_dir)?;

        let names: Vec<String> = match &config.entry {
            BundleEntry::Single(_) => vec!["main".to_string()],
            BundleEntry::Named(entries) => entries.keys().cloned().collect(),
        };

        let mut assets = Vec::new();
        for name in names {
            let file = config.output_file_name.replace("[name]", &name);
            std::fs::write(config.output_dir.join(&file), format!("/* {name} */"))?;
            assets.push(BundleAsset {
                name: file,
                chunk_names: vec![name.clone()],
            });

            if let Some(css) = &config.output_css_file_name {
                let css = css.replace("[name]", &name);
                std::fs::write(config.output_dir.join(&css), ".x{}")?;
                assets.push(BundleAsset {
                    name: css,
                    chunk_names: vec![name.clone()],
                });
            }
        }

        std::fs::write(config.output_dir.join("worker.js"), "/* worker */")?;
        assets.push(BundleAsset {
            name: "worker.js".to_string(),
            chunk_names: vec!["main".to_string()],
        });

        Ok(BundleOutcome { assets })
    }
}

/// Returns the stylesheet source with a comment prepended
pub struct EchoStyles;

#[async_trait]
impl StylePreprocessor for EchoStyles {
    async fn compile_file(&self, file: &Path, _include_paths: &[PathBuf]) -> Result<String> {
        let source = std::fs::read_to_string(file)?;
        Ok(format!("/* {} */\n{}", file.display(), source))
    }
}

/// Records how many compilations overlap
#[derive(Default)]
pub struct CountingStyles {
    running: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl StylePreprocessor for CountingStyles {
    async fn compile_file(&self, _file: &Path, _include_paths: &[PathBuf]) -> Result<String> {
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(".x{}".to_string())
    }
}

pub struct FakeLinter {
    pub calls: Arc<Calls>,
    pub results: Vec<LintFileResult>,
}

#[async_trait]
impl Linter for FakeLinter {
    async fn lint(&self, request: &LintRequest) -> Result<LintReport> {
        self.calls.lint_requests.lock().unwrap().push(request.clone());
        Ok(LintReport::new(self.results.clone()))
    }
}

pub struct FakeFormatter {
    pub changed: Vec<PathBuf>,
}

#[async_trait]
impl Formatter for FakeFormatter {
    async fn format(&self, _files: &[PathBuf], _ignore_path: Option<&Path>) -> Result<Vec<PathBuf>> {
        Ok(self.changed.clone())
    }
}

pub struct FakeChecker {
    pub calls: Arc<Calls>,
}

#[async_trait]
impl TypeChecker for FakeChecker {
    async fn check(&self, _project_root: &Path) -> Result<()> {
        *self.calls.type_checks.lock().unwrap() += 1;
        Ok(())
    }
}

pub struct FakeGit {
    pub calls: Arc<Calls>,
    pub staged: Vec<String>,
}

#[async_trait]
impl SourceControl for FakeGit {
    async fn staged_files(&self, _root: &Path) -> Result<Vec<String>> {
        Ok(self.staged.clone())
    }

    async fn stage(&self, _root: &Path, files: &[PathBuf]) -> Result<()> {
        self.calls.staged.lock().unwrap().extend_from_slice(files);
        Ok(())
    }
}

pub struct Fakes {
    pub calls: Arc<Calls>,
    pub fail_transform: bool,
    pub lint_results: Vec<LintFileResult>,
    pub formatted: Vec<PathBuf>,
    pub staged: Vec<String>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            fail_transform: false,
            lint_results: Vec::new(),
            formatted: Vec::new(),
            staged: Vec::new(),
        }
    }
}

impl Fakes {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            bundler: Arc::new(RecordingBundler {
                calls: self.calls.clone(),
            }),
            transpiler: Arc::new(CopyTranspiler {
                calls: self.calls.clone(),
                fail: self.fail_transform,
            }),
            styles: Arc::new(EchoStyles),
            linter: Arc::new(FakeLinter {
                calls: self.calls.clone(),
                results: self.lint_results.clone(),
            }),
            formatter: Arc::new(FakeFormatter {
                changed: self.formatted.clone(),
            }),
            type_checker: Arc::new(FakeChecker {
                calls: self.calls.clone(),
            }),
            source_control: Arc::new(FakeGit {
                calls: self.calls.clone(),
                staged: self.staged.clone(),
            }),
        }
    }
}

/// Write `content` to `root/relative`, creating directories
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative)).unwrap()
}
