//! AnalysisHost: owned state behind every editor query.
//!
//! The host owns the symbol resolver, the coverage index and the editor
//! settings. Nothing is global: dropping the host (or calling
//! [`AnalysisHost::shutdown`]) releases every file watch.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new()?;
//! host.set_project_root("/work/app");
//! host.set_settings(Settings::from_json(settings_json)?);
//!
//! let items = host.completions("allow read: if request.auth.").await;
//! let hover = host.hover(file_id, line_text, position, &cancel).await;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::base::{Position, Span};
use crate::core::{current_word, prior_word, word_range_at};
use crate::coverage::{
    CoverageEntry, CoverageError, CoverageIndex, FileWatcher, NotifyWatcher, ValueCount,
};
use crate::grammar::{EmbeddedGrammar, GrammarSource, SymbolInfo};
use crate::project::Settings;

use super::completion::CompletionItem;
use super::hover::HoverResult;
use super::resolver::{Completions, SymbolResolver};

/// Owns all state for the IDE layer.
pub struct AnalysisHost {
    resolver: SymbolResolver,
    coverage: CoverageIndex,
    settings: Settings,
    project_root: Option<PathBuf>,
}

impl AnalysisHost {
    /// Host over the shipped grammar, watching coverage files on disk.
    pub fn new() -> Result<Self, CoverageError> {
        Ok(Self::with_parts(
            Arc::new(EmbeddedGrammar),
            Arc::new(NotifyWatcher::new()?),
        ))
    }

    pub fn with_parts(grammar: Arc<dyn GrammarSource>, watcher: Arc<dyn FileWatcher>) -> Self {
        Self {
            resolver: SymbolResolver::new(grammar),
            coverage: CoverageIndex::new(watcher),
            settings: Settings::default(),
            project_root: None,
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_project_root(&mut self, root: impl Into<PathBuf>) {
        self.project_root = Some(root.into());
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    pub fn coverage(&self) -> &CoverageIndex {
        &self.coverage
    }

    /// Completions for the text of the current line up to the cursor.
    ///
    /// After `name.` the members of `name` are offered; after `allow` the
    /// access modifiers are.
    pub async fn completions(&self, line_prefix: &str) -> Completions {
        let word = prior_word(line_prefix)?;
        match word.strip_suffix('.') {
            Some(name) => self.resolver.members(name).await,
            None => self.resolver.directives(&word).await,
        }
    }

    /// The symbol named by the word before the cursor, ignoring a trailing `.`.
    pub async fn resolve_symbol_at_prefix(&self, text: &str) -> Option<SymbolInfo> {
        let word = prior_word(text)?;
        let name = word.strip_suffix('.').unwrap_or(&word);
        self.resolver.find_any(name).await
    }

    /// Members of the type at `dotted_name`, or nothing.
    pub async fn resolve_members_of(&self, dotted_name: &str) -> Vec<CompletionItem> {
        self.resolver
            .members(dotted_name)
            .await
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }

    /// The innermost coverage entry at `position` in the rules file `file_id`.
    pub async fn coverage_entry_at(
        &self,
        file_id: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<CoverageEntry> {
        let path = self.coverage_path()?;
        let entries = self
            .coverage
            .load_cancellable(file_id, &path, cancel)
            .await?;
        CoverageIndex::entry_at(&entries, position).cloned()
    }

    /// Values observed at `position` in the rules file `file_id`.
    pub async fn resolve_coverage_at(
        &self,
        file_id: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<Vec<ValueCount>> {
        self.coverage_entry_at(file_id, position, cancel)
            .await
            .map(|entry| entry.values)
    }

    /// Hover at `position` on a line whose full text is `line_text`.
    ///
    /// Coverage for the position wins; otherwise the word under the cursor is
    /// looked up in the grammar.
    pub async fn hover(
        &self,
        file_id: &str,
        line_text: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<HoverResult> {
        if let Some(entry) = self.coverage_entry_at(file_id, position, cancel).await {
            return Some(HoverResult::from_coverage(&entry));
        }
        if cancel.is_cancelled() {
            return None;
        }

        let range = word_range_at(line_text, position.column)?;
        let span = Span::from_coords(position.line, range.start, position.line, range.end);
        let word = current_word(line_text, Some(range))?;
        trace!(%word, "symbol hover");

        let about = self.resolver.hover_text(&word).await?;
        if cancel.is_cancelled() {
            return None;
        }
        Some(HoverResult::new(about.as_ref(), span))
    }

    /// Release file watches and cached coverage.
    pub fn shutdown(&self) {
        self.coverage.close();
    }

    fn coverage_path(&self) -> Option<PathBuf> {
        self.settings.coverage_path(self.project_root.as_deref()?)
    }
}
