//! Hover tests: coverage ranges first, grammar symbols otherwise.

use std::path::Path;
use std::sync::Arc;

use firerules::coverage::{ChangeKind, ManualWatcher};
use firerules::grammar::EmbeddedGrammar;
use firerules::ide::AnalysisHost;
use firerules::project::Settings;
use firerules::{Position, Span};
use tokio_util::sync::CancellationToken;

use crate::helpers::coverage_fixtures::*;

const RULES: &str = "/work/app/firestore.rules";
const LINE: &str = "      allow read: if request.auth != null;";

fn host_in(root: &Path) -> (Arc<ManualWatcher>, AnalysisHost) {
    let watcher = Arc::new(ManualWatcher::new());
    let mut host = AnalysisHost::with_parts(Arc::new(EmbeddedGrammar), watcher.clone());
    host.set_project_root(root);
    host.set_settings(Settings::default().with_coverage_file("coverage.html"));
    (watcher, host)
}

#[tokio::test]
async fn test_hover_shows_innermost_coverage() {
    let dir = tempfile::tempdir().unwrap();
    write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let (_watcher, host) = host_in(dir.path());

    let hover = host
        .hover(RULES, LINE, Position::new(2, 25), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(hover.range, Span::from_coords(2, 19, 2, 31));
    assert_eq!(
        hover.contents,
        "`[mapValue]` returned 3 times  \nError 'Null value error.' occurred once"
    );
}

#[tokio::test]
async fn test_hover_outside_coverage_falls_back_to_grammar() {
    let dir = tempfile::tempdir().unwrap();
    write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let (_watcher, host) = host_in(dir.path());

    let hover = host
        .hover(RULES, LINE, Position::new(2, 13), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(hover.range, Span::from_coords(2, 12, 2, 16));
    assert_eq!(hover.contents, "Allow `get` and `list` operations");
}

#[tokio::test]
async fn test_hover_for_another_rules_file_ignores_coverage() {
    let dir = tempfile::tempdir().unwrap();
    write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let (_watcher, host) = host_in(dir.path());

    let hover = host
        .hover("/elsewhere/firestore.rules", LINE, Position::new(2, 25), &CancellationToken::new())
        .await
        .unwrap();
    // `request` resolves in the grammar.
    assert_eq!(hover.range, Span::from_coords(2, 21, 2, 28));
    assert_eq!(hover.contents, "The incoming request context.");
}

#[tokio::test]
async fn test_cancelled_hover_returns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let (_watcher, host) = host_in(dir.path());

    let cancel = CancellationToken::new();
    cancel.cancel();
    assert!(host.hover(RULES, LINE, Position::new(2, 25), &cancel).await.is_none());
    assert!(!host.coverage().is_cached(&dir.path().join("coverage.html")));
}

#[tokio::test]
async fn test_resolve_coverage_after_file_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_coverage(dir.path(), "coverage.html", RULES, auth_check_report());
    let (watcher, host) = host_in(dir.path());
    let cancel = CancellationToken::new();

    let values = host
        .resolve_coverage_at(RULES, Position::new(2, 35), &cancel)
        .await
        .unwrap();
    assert_eq!(values[0].count, 4);

    write_coverage(dir.path(), "coverage.html", RULES, vec![]);
    watcher.notify(&path, ChangeKind::Changed);
    assert!(
        host.resolve_coverage_at(RULES, Position::new(2, 35), &cancel)
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_shutdown_releases_watches() {
    let dir = tempfile::tempdir().unwrap();
    write_coverage(dir.path(), "coverage.html", RULES, vec![]);
    let (watcher, host) = host_in(dir.path());

    host.resolve_coverage_at(RULES, Position::new(0, 0), &CancellationToken::new())
        .await;
    assert_eq!(watcher.subscription_count(), 1);

    host.shutdown();
    assert_eq!(watcher.subscription_count(), 0);
}
