//! The flat, dual-keyed symbol table produced by the compiler.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::symbols::{AccessModifierDescriptor, MethodDescriptor, SymbolInfo, TypeDescriptor};

/// Types keyed by short and dotted name, methods keyed by short name, and the
/// resolved access-modifier list.
#[derive(Debug, Default)]
pub struct CompiledSymbolTable {
    types: FxHashMap<String, Arc<TypeDescriptor>>,
    methods: IndexMap<String, Arc<MethodDescriptor>>,
    access_modifiers: Vec<Arc<AccessModifierDescriptor>>,
}

impl CompiledSymbolTable {
    pub(crate) fn new(
        types: FxHashMap<String, Arc<TypeDescriptor>>,
        methods: IndexMap<String, Arc<MethodDescriptor>>,
        access_modifiers: Vec<Arc<AccessModifierDescriptor>>,
    ) -> Self {
        Self {
            types,
            methods,
            access_modifiers,
        }
    }

    /// Look up a type by short name (`token`) or dotted path (`request.auth.token`).
    pub fn find_type(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(name)
    }

    /// Look up a method by short name. Colliding names share one merged entry.
    pub fn find_method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(name)
    }

    pub fn find_access_modifier(&self, name: &str) -> Option<&Arc<AccessModifierDescriptor>> {
        self.access_modifiers.iter().find(|m| m.name == name)
    }

    /// Look up any symbol. Access modifiers shadow types, which shadow methods.
    pub fn find_any(&self, name: &str) -> Option<SymbolInfo> {
        if let Some(modifier) = self.find_access_modifier(name) {
            return Some(SymbolInfo::AccessModifier(modifier.clone()));
        }
        if let Some(info) = self.find_type(name) {
            return Some(SymbolInfo::Type(info.clone()));
        }
        self.find_method(name)
            .map(|method| SymbolInfo::Method(method.clone()))
    }

    pub fn access_modifiers(&self) -> &[Arc<AccessModifierDescriptor>] {
        &self.access_modifiers
    }

    /// Every registered type key, short and dotted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}
