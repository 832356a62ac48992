//! Eviction driven by real filesystem events.

use std::sync::Arc;
use std::time::Duration;

use firerules::coverage::{CoverageIndex, NotifyWatcher};

use crate::helpers::coverage_fixtures::*;

const RULES: &str = "firestore.rules";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rewriting_file_evicts_cached_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let index = CoverageIndex::new(Arc::new(NotifyWatcher::new().unwrap()));

    assert_eq!(index.load(RULES, &path).await.unwrap().len(), 2);
    assert!(index.is_cached(&path));

    write_coverage(dir.path(), "coverage.html", RULES, vec![]);

    let evicted = tokio::time::timeout(Duration::from_secs(5), async {
        while index.is_cached(&path) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(evicted.is_ok(), "coverage was not evicted after the file changed");

    assert!(index.load(RULES, &path).await.unwrap().is_empty());
}
