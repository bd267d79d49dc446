//! Command implementations behind the CLI
//!
//! A [`Session`] binds a loaded project to a toolchain; every command is a
//! method on it so tests can swap the toolchain for fakes.

use crate::context::ProjectConfig;
use crate::io::{self, ExtensionFilter, FileCollector, IgnoreFilter};
use crate::phases::{analysis_catalog, build_catalog};
use crate::plugins::{AnalyzerPlugin, project_plugins};
use crate::toolchain::Toolchain;
use console::style;
use kiln_core::config::constants::{PACKAGES_DIR, SCRIPT_EXTENSIONS, SRC_DIR};
use kiln_core::context::{BuildPlan, Mode, SourceScope, map_config};
use kiln_core::error::{KilnError, Result};
use kiln_core::pipeline::{ConfigPipes, Plugin, PipelineReport, register_plugins};
use kiln_core::tools::lint::select_staged;
use kiln_core::tools::{LintMessage, LintReport, LintRequest, Severity};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub const ESLINT_IGNORE: &str = ".eslintignore";

/// Flags of the lint command
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Lint every source file instead of the staged ones
    pub all: bool,
    /// Restrict `all` to one package
    pub package: Option<String>,
    pub fix: bool,
    /// Fail when errors are reported
    pub break_on_error: bool,
    pub type_check: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            all: false,
            package: None,
            fix: true,
            break_on_error: true,
            type_check: false,
        }
    }
}

/// Log a labelled step and how long it took
pub async fn step<T, Fut>(label: &str, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    info!("{}...", label);
    let started = Instant::now();
    let result = fut.await;
    if result.is_ok() {
        info!("{} finished in {}ms", label, started.elapsed().as_millis());
    }
    result
}

pub struct Session {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub tools: Toolchain,
}

impl Session {
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfig, tools: Toolchain) -> Self {
        Self {
            root: root.into(),
            config,
            tools,
        }
    }

    /// Load the project in `root` with the Node toolchain
    pub async fn load(root: &Path, whole_project: bool) -> Result<Self> {
        let config = ProjectConfig::load(root, whole_project).await?;
        Ok(Self::new(root, config, Toolchain::node(root)))
    }

    pub fn plan(&self, mode: Mode) -> Result<BuildPlan> {
        map_config(self.config.shape, mode, &self.config.options)
    }

    fn pipes(&self, extra: Vec<Box<dyn Plugin>>) -> Arc<ConfigPipes> {
        let mut pipes = ConfigPipes::new();
        register_plugins(&mut pipes, &project_plugins(&self.config.options));
        register_plugins(&mut pipes, &extra);
        Arc::new(pipes)
    }

    /// One production build
    pub async fn build(&self) -> Result<PipelineReport> {
        let plan = self.plan(Mode::build())?;
        let composer = build_catalog(&self.tools, self.pipes(Vec::new()))?;

        self.clean_plan(&plan).await?;
        let report = step(&format!("Building {}", plan.shape), composer.compose(&plan)).await?;
        info!("Built {} file(s)", report.file_count());
        Ok(report)
    }

    /// Development build followed by watch mode. Only returns on failure.
    pub async fn dev(&self, watch_only: bool) -> Result<()> {
        let pipes = self.pipes(Vec::new());
        let composer = build_catalog(&self.tools, pipes)?;

        if !watch_only {
            let plan = self.plan(Mode::dev())?;
            self.clean_plan(&plan).await?;
            step(&format!("Building {}", plan.shape), composer.compose(&plan)).await?;
        }

        let plan = self.plan(Mode::watch())?;
        info!("Watching for changes...");
        composer.compose(&plan).await?;
        Ok(())
    }

    /// Production bundle with the analyzer attached
    pub async fn analyse(&self) -> Result<PipelineReport> {
        let plan = self.plan(Mode::build())?;
        let composer = analysis_catalog(&self.tools, self.pipes(vec![Box::new(AnalyzerPlugin)]))?;
        step("Analysing bundle", composer.compose(&plan)).await
    }

    /// Remove every output directory of the project
    pub async fn clean(&self) -> Result<()> {
        let plan = self.plan(Mode::build())?;
        self.clean_plan(&plan).await
    }

    async fn clean_plan(&self, plan: &BuildPlan) -> Result<()> {
        let mut dirs = plan.output_dirs();
        for context in &plan.contexts {
            if context.shape == kiln_core::context::ProjectShape::SingleProject {
                dirs.push(context.bundle_dir.clone());
            }
        }
        io::clean_dirs(&self.root, &dirs).await
    }

    /// Files the lint command looks at, ignore file applied
    pub async fn lint_files(&self, options: &LintOptions) -> Result<Vec<PathBuf>> {
        let files = if options.all {
            let scope = match &options.package {
                Some(package) => SourceScope::new(PathBuf::from(PACKAGES_DIR).join(package)),
                None => SourceScope::new(PathBuf::new())
                    .with_dirs(vec![PathBuf::from(SRC_DIR), PathBuf::from(PACKAGES_DIR)]),
            };
            FileCollector::new(ExtensionFilter::new(SCRIPT_EXTENSIONS))
                .collect_async(self.root.clone(), scope.patterns(SCRIPT_EXTENSIONS))
                .await?
        } else {
            let staged = self.tools.source_control.staged_files(&self.root).await?;
            select_staged(staged.iter().map(String::as_str))
                .into_iter()
                .map(|path| self.root.join(path))
                .collect()
        };

        let ignore = IgnoreFilter::load(&self.root, Path::new(ESLINT_IGNORE));
        Ok(files.into_iter().filter(|file| !ignore.is_ignored(file)).collect())
    }

    pub async fn lint(&self, options: &LintOptions) -> Result<LintReport> {
        if options.type_check {
            step("Type checking", self.tools.type_checker.check(&self.root)).await?;
        }

        let files = self.lint_files(options).await?;
        if files.is_empty() {
            info!("No files to lint");
            return Ok(LintReport::default());
        }
        debug!("Linting {} file(s)", files.len());

        let ignore_path = Some(PathBuf::from(ESLINT_IGNORE)).filter(|path| self.root.join(path).is_file());

        let formatted: Vec<PathBuf> = if options.fix {
            step(
                "Formatting",
                self.tools.formatter.format(&files, ignore_path.as_deref()),
            )
            .await?
            .into_iter()
            .map(|path| self.root.join(path))
            .collect()
        } else {
            Vec::new()
        };

        let request = LintRequest {
            files,
            autofix: options.fix,
            ignore_path,
        };
        let report = step("Linting", self.tools.linter.lint(&request)).await?;

        print_report(&report, &self.root);

        if options.break_on_error && report.error_count() > 0 {
            return Err(KilnError::Lint {
                errors: report.error_count(),
                warnings: report.warning_count(),
            });
        }

        if options.fix {
            let fixed = report.fixed_files(&formatted);
            if !fixed.is_empty() {
                println!(
                    "{}",
                    style(format!("{} files autofixed, please recheck your code.", fixed.len())).yellow()
                );
                self.tools.source_control.stage(&self.root, &fixed).await?;
            }
        }
        Ok(report)
    }
}

/// Warnings first, then errors, then the summary
fn print_report(report: &LintReport, root: &Path) {
    for (file, message) in report.warnings().into_iter().chain(report.errors()) {
        println!("{}", format_message(file, message, root));
    }

    if report.error_count() + report.warning_count() > 0 {
        let summary = report.summary();
        if report.error_count() > 0 {
            println!("\n{}", style(summary).red().bold());
        } else {
            println!("\n{}", style(summary).yellow().bold());
        }
    }
}

pub fn format_message(file: &Path, message: &LintMessage, root: &Path) -> String {
    let location = format!(
        "{}:{}:{}",
        io::relative_to(file, root).display(),
        message.line,
        message.column
    );
    let severity = match message.severity {
        Severity::Error => style("error").red().to_string(),
        Severity::Warning => style("warning").yellow().to_string(),
        Severity::Off => style("off").dim().to_string(),
    };

    format!(
        "{}  {}  {}  {}",
        style(location).underlined(),
        severity,
        message.message,
        style(message.rule_id.as_deref().unwrap_or("")).dim()
    )
}

pub async fn build_command(root: &Path, whole_project: bool) -> Result<()> {
    Session::load(root, whole_project).await?.build().await?;
    Ok(())
}

pub async fn dev_command(root: &Path, watch_only: bool, whole_project: bool) -> Result<()> {
    Session::load(root, whole_project).await?.dev(watch_only).await
}

pub async fn analyse_command(root: &Path) -> Result<()> {
    Session::load(root, false).await?.analyse().await?;
    Ok(())
}

pub async fn lint_command(root: &Path, options: LintOptions) -> Result<()> {
    Session::load(root, false).await?.lint(&options).await?;
    Ok(())
}

pub async fn clean_command(root: &Path, whole_project: bool) -> Result<()> {
    Session::load(root, whole_project).await?.clean().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_location() {
        console::set_colors_enabled(false);
        let message = LintMessage {
            rule_id: Some("eqeqeq".to_string()),
            severity: Severity::Error,
            message: "Expected '==='".to_string(),
            line: 4,
            column: 9,
        };

        let line = format_message(Path::new("/work/src/a.ts"), &message, Path::new("/work"));
        assert_eq!(line, "src/a.ts:4:9  error  Expected '==='  eqeqeq");
    }
}
