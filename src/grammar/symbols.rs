//! Compiled symbol descriptors.
//!
//! Descriptors are immutable once compiled and always handed out behind an
//! [`Arc`]. Sharing is meaningful: a type that inherits from a basic type holds
//! the *same* method table, and a type reachable under several dotted paths is
//! the *same* descriptor under each of them.

use std::sync::Arc;

use indexmap::IndexMap;

use super::definition::MethodDef;

/// Methods of a type, keyed by short name in authoring order.
pub type MethodTable = IndexMap<String, Arc<MethodDescriptor>>;

/// Nested fields of a type, keyed by short name in authoring order.
pub type FieldTable = IndexMap<String, Arc<TypeDescriptor>>;

/// A compiled type: documentation, members and nested fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub about: String,
    /// Own methods, or the basic type's table shared by reference.
    pub methods: Option<Arc<MethodTable>>,
    /// Own fields merged over the basic type's fields.
    pub fields: Option<FieldTable>,
    pub basic_type_ref: Option<String>,
}

impl TypeDescriptor {
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.as_ref()?.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.fields.as_ref()?.get(name)
    }
}

/// A compiled method with its derived call snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub about: String,
    pub parameters: Option<Vec<String>>,
    pub returns: Option<String>,
    /// Editor snippet, present iff `parameters` is defined.
    pub snippet: Option<String>,
}

impl MethodDescriptor {
    /// Compile a method definition registered under `name`.
    pub fn compile(name: &str, def: &MethodDef) -> Self {
        Self {
            about: def.about.clone(),
            parameters: def.parameters.clone(),
            returns: def.returns.clone(),
            snippet: def
                .parameters
                .as_deref()
                .map(|params| call_snippet(name, params)),
        }
    }

    /// Combine this description with another method of the same name.
    ///
    /// The result lists each description as a bullet line. The snippet and
    /// signature of `self` are kept.
    pub fn merged_with(&self, about: &str) -> Self {
        let mut merged = self.clone();
        if !merged.about.starts_with("- ") {
            merged.about.insert_str(0, "- ");
        }
        merged.about.push_str("\n- ");
        merged.about.push_str(about);
        merged
    }
}

/// Build a tab-stop snippet such as `split(${1:regex})$0`.
pub fn call_snippet(name: &str, parameters: &[String]) -> String {
    let args = parameters
        .iter()
        .enumerate()
        .map(|(i, label)| format!("${{{}:{}}}", i + 1, label))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{name}({args})$0")
}

/// A compiled access modifier with its includes resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessModifierDescriptor {
    pub name: String,
    pub about: String,
    pub include_names: Option<Vec<String>>,
    /// Resolved `include_names`; names that do not resolve are left out.
    pub includes: Option<Vec<Arc<AccessModifierDescriptor>>>,
}

/// Any named symbol: access modifier, type or method.
#[derive(Debug, Clone)]
pub enum SymbolInfo {
    AccessModifier(Arc<AccessModifierDescriptor>),
    Type(Arc<TypeDescriptor>),
    Method(Arc<MethodDescriptor>),
}

impl SymbolInfo {
    /// Markdown documentation for the symbol.
    pub fn about(&self) -> &str {
        match self {
            SymbolInfo::AccessModifier(info) => &info.about,
            SymbolInfo::Type(info) => &info.about,
            SymbolInfo::Method(info) => &info.about,
        }
    }
}
