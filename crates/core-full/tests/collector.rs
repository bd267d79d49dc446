// Integration tests for FileCollector
use kiln_core_full::io::{ExtensionFilter, FileCollector, SourceFileFilter, copy_preserving};
use std::path::PathBuf;
use tempfile::TempDir;

fn touch(dir: &TempDir, relative: &str) -> PathBuf {
    let path = dir.path().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, relative).unwrap();
    path
}

#[tokio::test]
async fn test_collect_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    let b = touch(&dir, "src/b.tsx");
    let a = touch(&dir, "src/nested/a.ts");
    touch(&dir, "src/types.d.ts");
    touch(&dir, "src/style.scss");

    let files = FileCollector::new(SourceFileFilter::new(&["ts", "tsx"]))
        .collect_async(
            dir.path().to_path_buf(),
            vec!["src/**/*.ts".to_string(), "src/**/*.tsx".to_string()],
        )
        .await
        .expect("Failed to collect files");

    assert_eq!(files, vec![b, a]);
}

#[test]
fn test_overlapping_patterns_do_not_duplicate() {
    let dir = TempDir::new().unwrap();
    let logo = touch(&dir, "src/logo.svg");

    let files = FileCollector::new(ExtensionFilter::new(&["svg"]))
        .collect(
            dir.path(),
            &["src/**/*.svg".to_string(), "src/*.svg".to_string()],
        )
        .unwrap();

    assert_eq!(files, vec![logo]);
}

#[test]
fn test_missing_directory_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let files = FileCollector::new(ExtensionFilter::new(&["ts"]))
        .collect(dir.path(), &["packages/**/*.ts".to_string()])
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_copy_preserving_layout() {
    let dir = TempDir::new().unwrap();
    let icon = touch(&dir, "src/assets/icon.svg");
    let out = dir.path().join("dist/main");

    let copied = copy_preserving(&[icon], &dir.path().join("src"), &out)
        .await
        .unwrap();

    assert_eq!(copied, vec![out.join("assets/icon.svg")]);
    assert_eq!(
        std::fs::read_to_string(out.join("assets/icon.svg")).unwrap(),
        "src/assets/icon.svg"
    );
}
