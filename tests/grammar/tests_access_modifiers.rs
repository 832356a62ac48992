//! Access modifier resolution in the shipped grammar.

use std::sync::Arc;

use firerules::grammar::SymbolInfo;

use crate::helpers::grammar_helpers::*;

#[test]
fn test_seven_access_modifiers_in_order() {
    let table = shipped_table();
    let names: Vec<&str> = table
        .access_modifiers()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["read", "get", "list", "write", "create", "update", "delete"]
    );
}

#[test]
fn test_read_includes_get_and_list() {
    let table = shipped_table();
    let read = table.find_access_modifier("read").unwrap();
    let includes = read.includes.as_ref().unwrap();
    assert_eq!(includes.len(), 2);
    assert!(Arc::ptr_eq(&includes[0], table.find_access_modifier("get").unwrap()));
    assert!(Arc::ptr_eq(&includes[1], table.find_access_modifier("list").unwrap()));
}

#[test]
fn test_write_includes_create_update_delete() {
    let table = shipped_table();
    let write = table.find_access_modifier("write").unwrap();
    let names: Vec<&str> = write
        .includes
        .iter()
        .flatten()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, ["create", "update", "delete"]);
}

#[test]
fn test_leaf_modifiers_have_no_includes() {
    let table = shipped_table();
    assert!(table.find_access_modifier("get").unwrap().includes.is_none());
}

#[test]
fn test_modifier_names_shadow_methods() {
    let table = shipped_table();
    // `get` is also a map method; access modifiers come first.
    assert!(table.find_method("get").is_some());
    match table.find_any("get") {
        Some(SymbolInfo::AccessModifier(info)) => assert_eq!(info.name, "get"),
        other => panic!("expected access modifier, got {:?}", other),
    }
}
