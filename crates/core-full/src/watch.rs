//! File watching for watch-mode phases

use crate::io::FileFilter;
use kiln_core::error::{KilnError, Result};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Watch `roots` and call `rebuild` with each settled batch of changed files.
///
/// Only created or modified files accepted by `filter` count. A failed rebuild
/// is logged and watching goes on; this returns only when the watcher breaks.
pub async fn watch_and_rebuild<F, R, Fut>(
    label: &str,
    roots: Vec<PathBuf>,
    filter: F,
    mut rebuild: R,
) -> Result<()>
where
    F: FileFilter,
    R: FnMut(Vec<PathBuf>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            if let Err(e) = tx.send(res) {
                error!("Failed to send watch event: {}", e);
            }
        },
        Config::default(),
    )
    .map_err(|e| KilnError::watch(e.to_string()))?;

    let mut watched = 0;
    for root in &roots {
        if root.is_dir() {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| KilnError::watch(e.to_string()))?;
            debug!("[{}] watching directory: {:?}", label, root);
            watched += 1;
        }
    }

    if watched == 0 {
        return Err(KilnError::watch(format!(
            "[{label}] none of {roots:?} exists"
        )));
    }

    debug!("[{}] file watcher initialized, waiting for changes", label);

    let mut pending_changes: HashSet<PathBuf> = HashSet::new();
    let mut last_event_time = Instant::now();

    loop {
        match tokio::time::timeout(POLL_INTERVAL, rx.recv()).await {
            Ok(Some(Ok(event))) => match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => {
                    let relevant: Vec<_> = event
                        .paths
                        .into_iter()
                        .filter(|path| filter.should_include(path))
                        .collect();

                    if !relevant.is_empty() {
                        pending_changes.extend(relevant);
                        last_event_time = Instant::now();
                    }
                }
                _ => {}
            },
            Ok(Some(Err(e))) => {
                warn!("[{}] watch error: {}", label, e);
            }
            Ok(None) => {
                error!("[{}] watch channel disconnected", label);
                return Err(KilnError::watch("watch channel disconnected"));
            }
            Err(_) => {
                if !pending_changes.is_empty() && last_event_time.elapsed() >= DEBOUNCE {
                    let mut changed_files: Vec<_> = pending_changes.drain().collect();
                    changed_files.sort();

                    info!("[{}] detected changes: {:?}", label, changed_files);

                    match rebuild(changed_files).await {
                        Ok(()) => debug!("[{}] rebuild completed", label),
                        Err(e) => error!("[{}] rebuild failed: {}", label, e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ExtensionFilter;

    #[tokio::test]
    async fn test_changes_arrive_in_filtered_batches() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let watch = watch_and_rebuild(
            "test",
            vec![root.clone()],
            ExtensionFilter::new(&["ts"]),
            move |changed| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(changed);
                    // A failed rebuild must not end the watch
                    Err(KilnError::other("rebuild failed"))
                }
            },
        );

        let batches = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            std::fs::write(root.join("a.ts"), "export const a = 1;\n").unwrap();
            std::fs::write(root.join("notes.md"), "# notes\n").unwrap();
            let first = rx.recv().await.unwrap();

            std::fs::write(root.join("b.ts"), "export const b = 1;\n").unwrap();
            let second = rx.recv().await.unwrap();
            (first, second)
        };

        let (first, second) = tokio::time::timeout(Duration::from_secs(10), async {
            tokio::select! {
                result = watch => panic!("watcher stopped: {result:?}"),
                batches = batches => batches,
            }
        })
        .await
        .expect("no rebuild within the timeout");

        assert_eq!(first, vec![root.join("a.ts")]);
        assert!(second.contains(&root.join("b.ts")));
        assert!(!second.contains(&root.join("notes.md")));
    }

    #[tokio::test]
    async fn test_missing_roots_fail() {
        let result = watch_and_rebuild(
            "test",
            vec![PathBuf::from("/nonexistent/kiln/src")],
            ExtensionFilter::new(&["ts"]),
            |_| async { Ok(()) },
        )
        .await;
        assert!(matches!(result, Err(KilnError::Watch(_))));
    }
}
