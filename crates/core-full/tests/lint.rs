// Integration tests for the lint command
mod common;

use common::{Fakes, write};
use kiln_core::error::KilnError;
use kiln_core::tools::{LintFileResult, LintMessage, Severity};
use kiln_core_full::{LintOptions, ProjectConfig, Session};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "kiln.json", r#"{"type": "component"}"#);
    write(root, ".eslintignore", "# generated code\nsrc/legacy/\n");
    write(root, "src/a.ts", "var a = 1;\n");
    write(root, "src/legacy/b.ts", "var b = 1;\n");
    write(root, "packages/ui/package.json", r#"{"name": "@scope/ui"}"#);
    write(root, "packages/ui/src/c.tsx", "export const C = 1;\n");
    write(root, "packages/ui/stories/c.stories.tsx", "export default {};\n");
    dir
}

fn result(root: &Path, file: &str, severity: Severity, fixed: bool) -> LintFileResult {
    let errors = usize::from(severity == Severity::Error);
    let warnings = usize::from(severity == Severity::Warning);
    LintFileResult {
        file_path: root.join(file),
        messages: vec![LintMessage {
            rule_id: Some("no-var".to_string()),
            severity,
            message: "Unexpected var, use let or const instead.".to_string(),
            line: 1,
            column: 1,
        }],
        error_count: errors,
        warning_count: warnings,
        fixable_error_count: errors,
        fixable_warning_count: warnings,
        output: fixed.then(|| "let a = 1;\n".to_string()),
    }
}

async fn session(dir: &TempDir, fakes: &Fakes) -> Session {
    let config = ProjectConfig::load(dir.path(), false).await.unwrap();
    Session::new(dir.path(), config, fakes.toolchain())
}

#[tokio::test]
async fn test_staged_files_are_filtered() {
    let dir = project();
    let fakes = Fakes {
        staged: vec![
            "src/a.ts".to_string(),
            "src/legacy/b.ts".to_string(),
            "README.md".to_string(),
            "scripts/build.ts".to_string(),
        ],
        ..Fakes::default()
    };

    let files = session(&dir, &fakes)
        .await
        .lint_files(&LintOptions::default())
        .await
        .unwrap();
    assert_eq!(files, vec![dir.path().join("src/a.ts")]);
}

#[tokio::test]
async fn test_all_files_of_one_package() {
    let dir = project();
    let fakes = Fakes::default();
    let session = session(&dir, &fakes).await;

    let options = LintOptions {
        all: true,
        package: Some("ui".to_string()),
        ..LintOptions::default()
    };
    let files = session.lint_files(&options).await.unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("packages/ui/src/c.tsx"),
            dir.path().join("packages/ui/stories/c.stories.tsx"),
        ]
    );

    let every = LintOptions {
        all: true,
        ..LintOptions::default()
    };
    let files = session.lint_files(&every).await.unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("packages/ui/src/c.tsx"),
            dir.path().join("packages/ui/stories/c.stories.tsx"),
            dir.path().join("src/a.ts"),
        ]
    );
}

#[tokio::test]
async fn test_errors_break_before_fixed_files_are_staged() {
    let dir = project();
    let fakes = Fakes {
        staged: vec!["src/a.ts".to_string()],
        formatted: vec![PathBuf::from("src/a.ts")],
        lint_results: vec![result(dir.path(), "src/a.ts", Severity::Error, true)],
        ..Fakes::default()
    };

    let err = session(&dir, &fakes)
        .await
        .lint(&LintOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, KilnError::Lint { errors: 1, warnings: 0 }));

    assert!(fakes.calls.staged.lock().unwrap().is_empty());

    let requests = fakes.calls.lint_requests.lock().unwrap();
    assert!(requests[0].autofix);
    assert_eq!(requests[0].ignore_path, Some(PathBuf::from(".eslintignore")));
}

#[tokio::test]
async fn test_fixed_files_are_staged_when_only_warnings() {
    let dir = project();
    let fakes = Fakes {
        staged: vec!["src/a.ts".to_string()],
        formatted: vec![PathBuf::from("src/a.ts")],
        lint_results: vec![result(dir.path(), "src/a.ts", Severity::Warning, true)],
        ..Fakes::default()
    };

    let report = session(&dir, &fakes)
        .await
        .lint(&LintOptions::default())
        .await
        .unwrap();
    assert_eq!(report.warning_count(), 1);

    let staged = fakes.calls.staged.lock().unwrap();
    assert_eq!(*staged, vec![dir.path().join("src/a.ts")]);
}

#[tokio::test]
async fn test_no_break_and_no_fix() {
    let dir = project();
    let fakes = Fakes {
        staged: vec!["src/a.ts".to_string()],
        lint_results: vec![result(dir.path(), "src/a.ts", Severity::Error, false)],
        ..Fakes::default()
    };

    let options = LintOptions {
        fix: false,
        break_on_error: false,
        type_check: true,
        ..LintOptions::default()
    };
    let report = session(&dir, &fakes).await.lint(&options).await.unwrap();

    assert_eq!(report.error_count(), 1);
    assert!(fakes.calls.staged.lock().unwrap().is_empty());
    assert_eq!(*fakes.calls.type_checks.lock().unwrap(), 1);
    assert!(!fakes.calls.lint_requests.lock().unwrap()[0].autofix);
}

#[tokio::test]
async fn test_nothing_staged_skips_lint_but_type_checks() {
    let dir = project();
    let fakes = Fakes::default();

    let options = LintOptions {
        type_check: true,
        ..LintOptions::default()
    };
    let report = session(&dir, &fakes).await.lint(&options).await.unwrap();

    assert_eq!(report.error_count(), 0);
    assert!(fakes.calls.lint_requests.lock().unwrap().is_empty());
    assert_eq!(*fakes.calls.type_checks.lock().unwrap(), 1);
}
