//! Type and method lookups in the compiled shipped grammar.

use std::sync::Arc;

use firerules::grammar::SymbolInfo;
use rstest::rstest;

use crate::helpers::grammar_helpers::*;

// =============================================================================
// DUAL REGISTRATION
// =============================================================================

#[rstest]
#[case("token", "request.auth.token")]
#[case("auth", "request.auth")]
#[case("uid", "request.auth.uid")]
#[case("firebase", "request.auth.token.firebase")]
#[case("query", "request.query")]
#[case("time", "request.time")]
fn test_short_and_dotted_names_share_descriptor(#[case] short: &str, #[case] dotted: &str) {
    let table = shipped_table();
    assert_same_type(&table, short, dotted);
}

#[test]
fn test_every_root_is_registered() {
    let table = shipped_table();
    for root in shipped_definition().types.keys() {
        assert!(table.find_type(root).is_some(), "missing root '{}'", root);
    }
}

#[test]
fn test_every_dotted_child_is_a_field_of_its_parent() {
    let table = shipped_table();
    for name in table.type_names().filter(|n| n.contains('.')) {
        let (parent, field) = name.rsplit_once('.').unwrap();
        let parent = get_type(&table, parent);
        let child = parent
            .field(field)
            .unwrap_or_else(|| panic!("'{}' is not a field of its parent", name));
        assert!(Arc::ptr_eq(child, get_type(&table, name)));
    }
}

#[test]
fn test_unknown_names_are_absent() {
    let table = shipped_table();
    assert!(table.find_type("request.nothing").is_none());
    assert!(table.find_any("nothing").is_none());
}

// =============================================================================
// BASIC TYPE INHERITANCE
// =============================================================================

#[test]
fn test_request_time_has_every_timestamp_method() {
    let table = shipped_table();
    let definition = shipped_definition();
    let expected: Vec<String> = definition.basic_types["timestamp"]
        .methods
        .as_ref()
        .unwrap()
        .keys()
        .cloned()
        .collect();

    let time = get_type(&table, "request.time");
    assert_eq!(method_names(time), expected);
    assert_eq!(time.basic_type_ref.as_deref(), Some("timestamp"));
}

#[test]
fn test_token_keeps_map_methods_alongside_its_fields() {
    let table = shipped_table();
    let token = get_type(&table, "request.auth.token");
    assert!(token.method("keys").is_some());
    assert!(token.field("email").is_some());
    assert!(token.field("firebase").is_some());
}

#[test]
fn test_string_fields_share_one_method_table() {
    let table = shipped_table();
    let uid = get_type(&table, "request.auth.uid");
    let email = get_type(&table, "request.auth.token.email");
    assert!(Arc::ptr_eq(
        uid.methods.as_ref().unwrap(),
        email.methods.as_ref().unwrap()
    ));
}

#[test]
fn test_root_request_shares_basic_fields_with_resource() {
    let table = shipped_table();
    let nested = get_type(&table, "request.resource");
    let root = get_type(&table, "resource");
    assert!(Arc::ptr_eq(
        nested.field("data").unwrap(),
        root.field("data").unwrap()
    ));
}

// =============================================================================
// SNIPPETS & METHOD CACHE
// =============================================================================

#[rstest]
#[case("request.auth.uid", "split", Some("split(${1:string})$0"))]
#[case("request.time", "toMillis", Some("toMillis()$0"))]
fn test_method_snippets(
    #[case] owner: &str,
    #[case] method: &str,
    #[case] snippet: Option<&str>,
) {
    let table = shipped_table();
    let info = get_type(&table, owner).method(method).unwrap();
    assert_eq!(info.snippet.as_deref(), snippet);
}

#[test]
fn test_colliding_method_documentation_is_bulleted() {
    let table = shipped_table();
    let size = table.find_method("size").unwrap();
    let lines: Vec<&str> = size.about.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| line.starts_with("- ")));
    assert!(lines.contains(&"- Get the number of values in the list."));
    assert!(lines.contains(&"- Get the number of entries in the map."));
}

#[test]
fn test_per_type_methods_keep_unmerged_documentation() {
    let table = shipped_table();
    let token = get_type(&table, "request.auth.token");
    assert_eq!(
        token.method("size").unwrap().about,
        "Get the number of entries in the map."
    );
}

#[test]
fn test_find_any_falls_back_to_methods() {
    let table = shipped_table();
    assert!(matches!(table.find_any("split"), Some(SymbolInfo::Method(_))));
    assert!(matches!(table.find_any("token"), Some(SymbolInfo::Type(_))));
}
