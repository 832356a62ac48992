//! Completion tests for the IDE layer.
//!
//! Inputs are the text of the current line up to the cursor, as an editor
//! would send while the user types.

use std::sync::Arc;

use firerules::coverage::ManualWatcher;
use firerules::grammar::{EmbeddedGrammar, SymbolInfo};
use firerules::ide::{AnalysisHost, CompletionItem, CompletionKind};
use rstest::rstest;

fn host() -> AnalysisHost {
    AnalysisHost::with_parts(Arc::new(EmbeddedGrammar), Arc::new(ManualWatcher::new()))
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_ref()).collect()
}

// =============================================================================
// MEMBER COMPLETION
// =============================================================================

#[tokio::test]
async fn test_member_completion_after_dot() {
    let host = host();
    let items = host
        .completions("      allow read: if request.auth.")
        .await
        .unwrap();
    assert_eq!(labels(&items)[..2], ["uid", "token"]);
    assert!(items[..2].iter().all(|i| i.kind == CompletionKind::Field));
    // `auth` is a map, so map methods follow its fields.
    assert!(items[2..].iter().all(|i| i.kind == CompletionKind::Method));
    assert!(labels(&items).contains(&"keys"));
}

#[tokio::test]
async fn test_member_completion_inside_call() {
    let host = host();
    let items = host.completions("if exists(request.auth.token.").await.unwrap();
    let names = labels(&items);
    assert!(names.contains(&"email"));
    assert!(names.contains(&"firebase"));
    // Fields first, then map methods.
    let first_method = items.iter().position(|i| i.kind == CompletionKind::Method).unwrap();
    assert!(items[..first_method].iter().all(|i| i.kind == CompletionKind::Field));
    assert!(names.contains(&"keys"));
}

#[tokio::test]
async fn test_method_items_carry_snippets() {
    let host = host();
    let items = host.resolve_members_of("request.time").await;
    let to_millis = items.iter().find(|i| &*i.label == "toMillis").unwrap();
    assert_eq!(to_millis.kind, CompletionKind::Method);
    assert_eq!(to_millis.insert_text.as_deref(), Some("toMillis()$0"));
}

#[tokio::test]
async fn test_member_documentation_is_plain_text() {
    let host = host();
    let items = host.resolve_members_of("request.auth.uid").await;
    assert!(!items.is_empty());
    for item in &items {
        let doc = item.documentation.as_deref().unwrap_or_default();
        assert!(!doc.contains('`') && !doc.contains('*'), "{}: {}", item.label, doc);
    }
}

#[tokio::test]
async fn test_members_of_unknown_name_are_empty() {
    let host = host();
    assert!(host.resolve_members_of("request.nothing").await.is_empty());
    assert_eq!(host.completions(" nothing.").await, None);
}

// =============================================================================
// DIRECTIVE COMPLETION
// =============================================================================

#[tokio::test]
async fn test_access_modifiers_after_allow() {
    let host = host();
    let items = host.completions("      allow ").await.unwrap();
    assert_eq!(
        labels(&items),
        ["read", "get", "list", "write", "create", "update", "delete"]
    );
    assert!(items.iter().all(|i| i.kind == CompletionKind::Keyword));
    assert_eq!(items[0].documentation.as_deref(), Some("Allow get and list operations"));
}

#[rstest]
#[case("allow read, write:")]
#[case("    match ")]
#[case("")]
#[tokio::test]
async fn test_no_completion(#[case] line_prefix: &str) {
    assert_eq!(host().completions(line_prefix).await, None);
}

#[tokio::test]
async fn test_completions_are_memoized() {
    let host = host();
    let first = host.completions(" request.").await.unwrap();
    let second = host.completions("(request.").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

// =============================================================================
// SYMBOL AT PREFIX
// =============================================================================

#[tokio::test]
async fn test_resolve_symbol_at_prefix() {
    let host = host();
    match host.resolve_symbol_at_prefix("if request.auth.token").await {
        Some(SymbolInfo::Type(info)) => assert_eq!(info.basic_type_ref.as_deref(), Some("map")),
        other => panic!("expected token type, got {:?}", other),
    }
    assert!(matches!(
        host.resolve_symbol_at_prefix("    allow write").await,
        Some(SymbolInfo::AccessModifier(_))
    ));
}
