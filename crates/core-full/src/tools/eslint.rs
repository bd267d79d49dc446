/// ESLint with its JSON formatter
use crate::process::{exec_command_unchecked, npx, output_to_string};
use async_trait::async_trait;
use kiln_core::error::{KilnError, Result};
use kiln_core::tools::{LintFileResult, LintReport, LintRequest, Linter};
use std::path::PathBuf;

pub struct EslintLinter {
    root: PathBuf,
}

impl EslintLinter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Linter for EslintLinter {
    async fn lint(&self, request: &LintRequest) -> Result<LintReport> {
        if request.files.is_empty() {
            return Ok(LintReport::default());
        }

        let mut command = npx("eslint", &self.root);
        command.args(["--format", "json"]);
        if request.autofix {
            command.arg("--fix");
        }
        if let Some(ignore_path) = &request.ignore_path {
            command.arg("--ignore-path").arg(ignore_path);
        }
        command.args(&request.files);

        // ESLint exits non-zero when it reports errors; only unparsable output fails
        let output = exec_command_unchecked(&mut command).await?;
        parse_report(&output_to_string(&output.stdout)).map_err(|_| {
            KilnError::tool("eslint", output_to_string(&output.stderr).trim().to_string())
        })
    }
}

pub fn parse_report(stdout: &str) -> Result<LintReport> {
    let results: Vec<LintFileResult> = serde_json::from_str(stdout.trim())?;
    Ok(LintReport::new(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let stdout = r#"[
            {
                "filePath": "/work/src/a.ts",
                "messages": [
                    {"ruleId": "no-var", "severity": 2, "message": "Unexpected var.", "line": 3, "column": 1},
                    {"ruleId": null, "severity": 1, "message": "Unused directive.", "line": 1, "column": 1}
                ],
                "errorCount": 1,
                "warningCount": 1,
                "fixableErrorCount": 1,
                "fixableWarningCount": 0,
                "output": "let a = 1;\n"
            }
        ]"#;

        let report = parse_report(stdout).unwrap();
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.errors()[0].1.rule_id.as_deref(), Some("no-var"));
    }

    #[test]
    fn test_parse_report_rejects_garbage() {
        assert!(parse_report("Oops! Something went wrong!").is_err());
    }
}
