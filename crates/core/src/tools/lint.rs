/// Linter, formatter and type checker contracts
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static STAGED_SOURCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(src|packages).+(ts|tsx)$").expect("valid staged pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Off,
    Warning,
    Error,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, String> {
        match value {
            0 => Ok(Severity::Off),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            other => Err(format!("unknown severity {other}")),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        match severity {
            Severity::Off => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    #[serde(default)]
    pub rule_id: Option<String>,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFileResult {
    pub file_path: PathBuf,
    #[serde(default)]
    pub messages: Vec<LintMessage>,
    #[serde(default)]
    pub error_count: usize,
    #[serde(default)]
    pub warning_count: usize,
    #[serde(default)]
    pub fixable_error_count: usize,
    #[serde(default)]
    pub fixable_warning_count: usize,
    /// Fixed source, present when the linter rewrote the file
    #[serde(default)]
    pub output: Option<String>,
}

impl LintFileResult {
    fn messages_with(&self, severity: Severity) -> impl Iterator<Item = &LintMessage> {
        self.messages.iter().filter(move |m| m.severity == severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub results: Vec<LintFileResult>,
}

impl LintReport {
    pub fn new(results: Vec<LintFileResult>) -> Self {
        Self { results }
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warning_count).sum()
    }

    pub fn fixable_error_count(&self) -> usize {
        self.results.iter().map(|r| r.fixable_error_count).sum()
    }

    pub fn fixable_warning_count(&self) -> usize {
        self.results.iter().map(|r| r.fixable_warning_count).sum()
    }

    /// Warnings as `(file, message)` pairs, in report order
    pub fn warnings(&self) -> Vec<(&Path, &LintMessage)> {
        self.collect(Severity::Warning)
    }

    /// Errors as `(file, message)` pairs, in report order
    pub fn errors(&self) -> Vec<(&Path, &LintMessage)> {
        self.collect(Severity::Error)
    }

    fn collect(&self, severity: Severity) -> Vec<(&Path, &LintMessage)> {
        self.results
            .iter()
            .flat_map(|r| r.messages_with(severity).map(|m| (r.file_path.as_path(), m)))
            .collect()
    }

    /// Files the linter fixed, merged with files the formatter rewrote
    pub fn fixed_files(&self, formatted: &[PathBuf]) -> Vec<PathBuf> {
        let fixed: BTreeSet<PathBuf> = self
            .results
            .iter()
            .filter(|r| r.output.is_some())
            .map(|r| r.file_path.clone())
            .chain(formatted.iter().cloned())
            .collect();
        fixed.into_iter().collect()
    }

    pub fn summary(&self) -> String {
        let errors = self.error_count();
        let warnings = self.warning_count();
        [
            format!(
                "{} problems ({} errors, {} warnings)",
                errors + warnings,
                errors,
                warnings
            ),
            format!(
                "{} error and {} warnings potentially fixable.",
                self.fixable_error_count(),
                self.fixable_warning_count()
            ),
        ]
        .join("\n")
    }
}

/// One lint run
#[derive(Debug, Clone)]
pub struct LintRequest {
    pub files: Vec<PathBuf>,
    pub autofix: bool,
    pub ignore_path: Option<PathBuf>,
}

#[async_trait]
pub trait Linter: Send + Sync {
    async fn lint(&self, request: &LintRequest) -> Result<LintReport>;
}

#[async_trait]
pub trait Formatter: Send + Sync {
    /// Format the files in place, returning the ones that changed
    async fn format(&self, files: &[PathBuf], ignore_path: Option<&Path>) -> Result<Vec<PathBuf>>;
}

#[async_trait]
pub trait TypeChecker: Send + Sync {
    async fn check(&self, project_root: &Path) -> Result<()>;
}

/// Staged paths eligible for linting
pub fn select_staged<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    paths
        .into_iter()
        .map(str::trim)
        .filter(|path| !path.is_empty() && STAGED_SOURCE.is_match(path))
        .collect()
}
