//! Symbol queries over the compiled grammar, with memoized editor answers.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::grammar::{
    AccessModifierDescriptor, CompiledSymbolTable, EmbeddedGrammar, GrammarSource,
    SymbolInfo, SymbolTableCell, TypeDescriptor,
};

use super::completion::{CompletionItem, access_modifier_completions, member_completions};

/// The directive after which access modifiers are offered.
const ALLOW_DIRECTIVE: &str = "allow";

/// Shared completion list. `None` means "nothing to offer".
pub type Completions = Option<Arc<[CompletionItem]>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CompletionKey {
    Members(String),
    Directive(String),
}

/// Answers symbol questions and remembers editor-facing results.
///
/// Memoized answers stay valid until [`recompile`](Self::recompile), which
/// discards them together with the table.
pub struct SymbolResolver {
    symbols: SymbolTableCell,
    completions: Mutex<FxHashMap<CompletionKey, Completions>>,
    hovers: Mutex<FxHashMap<String, Option<Arc<str>>>>,
}

impl SymbolResolver {
    pub fn new(source: Arc<dyn GrammarSource>) -> Self {
        Self {
            symbols: SymbolTableCell::new(source),
            completions: Mutex::new(FxHashMap::default()),
            hovers: Mutex::new(FxHashMap::default()),
        }
    }

    /// Resolver over the grammar shipped with the crate.
    pub fn embedded() -> Self {
        Self::new(Arc::new(EmbeddedGrammar))
    }

    /// The compiled table, compiling on first use. `None` if compilation failed.
    pub async fn table(&self) -> Option<Arc<CompiledSymbolTable>> {
        match self.symbols.get().await {
            Ok(table) => Some(table),
            Err(error) => {
                warn!(%error, "symbol table unavailable");
                None
            }
        }
    }

    /// Discard the table and every memoized answer, then compile again.
    pub async fn recompile(&self) -> Option<Arc<CompiledSymbolTable>> {
        let outcome = self.symbols.compile(true).await;
        self.completions.lock().clear();
        self.hovers.lock().clear();
        match outcome {
            Ok(table) => Some(table),
            Err(error) => {
                warn!(%error, "grammar recompilation failed");
                None
            }
        }
    }

    pub async fn find_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        if name.is_empty() {
            return None;
        }
        self.table().await?.find_type(name).cloned()
    }

    /// Access modifier, then type, then method named `name`.
    pub async fn find_any(&self, name: &str) -> Option<SymbolInfo> {
        if name.is_empty() {
            return None;
        }
        self.table().await?.find_any(name)
    }

    pub async fn access_modifiers(&self) -> Vec<Arc<AccessModifierDescriptor>> {
        match self.table().await {
            Some(table) => table.access_modifiers().to_vec(),
            None => Vec::new(),
        }
    }

    /// Members of the type named `name`: fields first, then methods.
    pub async fn members(&self, name: &str) -> Completions {
        let key = CompletionKey::Members(name.to_string());
        if let Some(cached) = self.completions.lock().get(&key) {
            return cached.clone();
        }

        let table = self.table().await?;
        let items = table
            .find_type(name)
            .map(|info| member_completions(info))
            .filter(|items| !items.is_empty())
            .map(Arc::from);
        self.remember_completions(key, items)
    }

    /// Keywords that may follow the directive `name`.
    pub async fn directives(&self, name: &str) -> Completions {
        if name != ALLOW_DIRECTIVE {
            return None;
        }

        let key = CompletionKey::Directive(name.to_string());
        if let Some(cached) = self.completions.lock().get(&key) {
            return cached.clone();
        }

        let table = self.table().await?;
        let items = Some(access_modifier_completions(table.access_modifiers()))
            .filter(|items| !items.is_empty())
            .map(Arc::from);
        self.remember_completions(key, items)
    }

    /// Documentation for any symbol named `word`.
    pub async fn hover_text(&self, word: &str) -> Option<Arc<str>> {
        if word.is_empty() {
            return None;
        }
        if let Some(cached) = self.hovers.lock().get(word) {
            return cached.clone();
        }

        let table = self.table().await?;
        let text = table.find_any(word).map(|info| Arc::from(info.about()));
        self.hovers
            .lock()
            .entry(word.to_string())
            .or_insert(text)
            .clone()
    }

    /// First answer wins if two callers raced to compute the same key.
    fn remember_completions(&self, key: CompletionKey, items: Completions) -> Completions {
        debug!(?key, found = items.as_ref().map_or(0, |i| i.len()), "memoizing completions");
        self.completions.lock().entry(key).or_insert(items).clone()
    }
}
