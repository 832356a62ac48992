//! Grammar compilation: hierarchical definition → flat symbol table.
//!
//! Compilation runs in three ordered phases:
//!
//! 1. **Basic method synthesis**: every method declared anywhere inside a
//!    basic type gets its snippet and a method-cache entry, once, before any
//!    type can inherit it.
//! 2. **Type tree**: each root type is compiled depth-first. A node with a
//!    `basicTypeRef` takes the basic type's method table by reference and
//!    merges its own fields over the basic fields; other nodes synthesize
//!    their own methods. Every reachable node is then registered under its
//!    short name and its dotted path.
//! 3. **Access modifiers**: include names are resolved against the
//!    access-modifier list itself.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use super::definition::{AccessModifierDef, GrammarDefinition, MethodDef, TypeDef};
use super::symbols::{
    AccessModifierDescriptor, FieldTable, MethodDescriptor, MethodTable, TypeDescriptor,
};
use super::table::CompiledSymbolTable;

/// Compile a grammar definition into a symbol table.
///
/// Unresolved or cyclic references are logged and skipped.
pub fn compile(grammar: &GrammarDefinition) -> CompiledSymbolTable {
    for warning in grammar.validate() {
        warn!(%warning, "grammar definition problem");
    }

    let table = GrammarCompiler::new(grammar).run();
    debug!(
        types = table.type_count(),
        methods = table.method_count(),
        access_modifiers = table.access_modifiers().len(),
        "compiled grammar"
    );
    table
}

/// Working state for a single compilation.
struct GrammarCompiler<'g> {
    grammar: &'g GrammarDefinition,
    /// Global method cache with merged documentation.
    methods: IndexMap<String, Arc<MethodDescriptor>>,
    /// Pre-synthesized method tables, keyed by dotted path inside the basic types.
    basic_tables: FxHashMap<String, Arc<MethodTable>>,
    /// Compiled basic types, shared by every inheritor.
    basic_types: FxHashMap<String, Arc<TypeDescriptor>>,
    resolving: FxHashSet<String>,
    types: FxHashMap<String, Arc<TypeDescriptor>>,
}

impl<'g> GrammarCompiler<'g> {
    fn new(grammar: &'g GrammarDefinition) -> Self {
        Self {
            grammar,
            methods: IndexMap::new(),
            basic_tables: FxHashMap::default(),
            basic_types: FxHashMap::default(),
            resolving: FxHashSet::default(),
            types: FxHashMap::default(),
        }
    }

    fn run(mut self) -> CompiledSymbolTable {
        let grammar = self.grammar;

        for (name, def) in &grammar.basic_types {
            self.synthesize_basic_methods(name.clone(), def);
        }

        for (name, def) in &grammar.types {
            let node = self.compile_type(def, None);
            self.register(name, name, &node);
        }

        let access_modifiers = ModifierResolver::new(&grammar.access_modifiers).resolve_all();

        CompiledSymbolTable::new(self.types, self.methods, access_modifiers)
    }

    // ------------------------------------------------------------------
    // Phase 1
    // ------------------------------------------------------------------

    fn synthesize_basic_methods(&mut self, path: String, def: &'g TypeDef) {
        if def.basic_type_ref.is_none() {
            if let Some(methods) = &def.methods {
                let table = self.synthesize_methods(methods);
                self.basic_tables.insert(path.clone(), table);
            }
        }

        for (key, field) in def.fields.iter().flatten() {
            self.synthesize_basic_methods(format!("{path}.{key}"), field);
        }
    }

    /// Compile snippets for a method map and merge each entry into the cache.
    fn synthesize_methods(&mut self, methods: &IndexMap<String, MethodDef>) -> Arc<MethodTable> {
        let table: MethodTable = methods
            .iter()
            .map(|(name, def)| {
                let method = Arc::new(MethodDescriptor::compile(name, def));
                self.cache_method(name, &method);
                (name.clone(), method)
            })
            .collect();
        Arc::new(table)
    }

    fn cache_method(&mut self, name: &str, method: &Arc<MethodDescriptor>) {
        let entry = match self.methods.get(name) {
            Some(existing) => Arc::new(existing.merged_with(&method.about)),
            None => Arc::clone(method),
        };
        self.methods.insert(name.to_string(), entry);
    }

    // ------------------------------------------------------------------
    // Phase 2
    // ------------------------------------------------------------------

    /// Compile one node. `basic_path` is set while compiling inside a basic
    /// type, where own methods were already synthesized in phase 1.
    fn compile_type(&mut self, def: &'g TypeDef, basic_path: Option<&str>) -> Arc<TypeDescriptor> {
        let inherited = def
            .basic_type_ref
            .as_deref()
            .and_then(|name| self.resolve_basic(name));

        let mut methods = None;
        let mut fields: Option<FieldTable> = None;

        if let Some(basic) = &inherited {
            methods = basic.methods.clone();
            fields = basic.fields.clone();
        } else if let Some(own) = &def.methods {
            let presynthesized = basic_path.and_then(|path| self.basic_tables.get(path).cloned());
            methods = Some(match presynthesized {
                Some(table) => table,
                None => self.synthesize_methods(own),
            });
        }

        if let Some(own_fields) = &def.fields {
            let merged = fields.get_or_insert_with(FieldTable::new);
            for (key, field) in own_fields {
                let child_path = basic_path.map(|path| format!("{path}.{key}"));
                let child = self.compile_type(field, child_path.as_deref());
                merged.insert(key.clone(), child);
            }
        }

        Arc::new(TypeDescriptor {
            about: def.about.clone(),
            methods,
            fields,
            basic_type_ref: def.basic_type_ref.clone(),
        })
    }

    /// Compile a basic type once and hand out the shared descriptor.
    fn resolve_basic(&mut self, name: &str) -> Option<Arc<TypeDescriptor>> {
        if let Some(done) = self.basic_types.get(name) {
            return Some(Arc::clone(done));
        }

        let grammar = self.grammar;
        let def = grammar.basic_types.get(name)?;
        if !self.resolving.insert(name.to_string()) {
            return None;
        }

        let node = self.compile_type(def, Some(name));
        self.resolving.remove(name);
        self.basic_types.insert(name.to_string(), Arc::clone(&node));
        Some(node)
    }

    /// Register a node under both names, then its fields under extended paths.
    fn register(&mut self, name: &str, path: &str, node: &Arc<TypeDescriptor>) {
        self.types.insert(name.to_string(), Arc::clone(node));
        self.types.insert(path.to_string(), Arc::clone(node));

        for (key, child) in node.fields.iter().flatten() {
            self.register(key, &format!("{path}.{key}"), child);
        }
    }
}

// ----------------------------------------------------------------------
// Phase 3
// ----------------------------------------------------------------------

/// Resolves include names so that `includes` point at the listed descriptors.
struct ModifierResolver<'g> {
    defs: &'g [AccessModifierDef],
    resolved: Vec<Option<Arc<AccessModifierDescriptor>>>,
    visiting: FxHashSet<usize>,
}

impl<'g> ModifierResolver<'g> {
    fn new(defs: &'g [AccessModifierDef]) -> Self {
        Self {
            defs,
            resolved: vec![None; defs.len()],
            visiting: FxHashSet::default(),
        }
    }

    fn resolve_all(mut self) -> Vec<Arc<AccessModifierDescriptor>> {
        (0..self.defs.len())
            .filter_map(|index| self.resolve(index))
            .collect()
    }

    fn resolve(&mut self, index: usize) -> Option<Arc<AccessModifierDescriptor>> {
        if let Some(done) = &self.resolved[index] {
            return Some(Arc::clone(done));
        }
        if !self.visiting.insert(index) {
            return None;
        }

        let defs = self.defs;
        let def = &defs[index];
        let includes = def.include_names.as_ref().map(|names| {
            names
                .iter()
                .filter_map(|name| {
                    let target = defs.iter().position(|d| &d.name == name)?;
                    self.resolve(target)
                })
                .collect()
        });
        self.visiting.remove(&index);

        let descriptor = Arc::new(AccessModifierDescriptor {
            name: def.name.clone(),
            about: def.about.clone(),
            include_names: def.include_names.clone(),
            includes,
        });
        self.resolved[index] = Some(Arc::clone(&descriptor));
        Some(descriptor)
    }
}
