//! Per-file cache of flattened coverage entries.
//!
//! Entries are cached by resolved path on first load and evicted when the
//! watched file changes. Each path carries a generation counter that every
//! eviction bumps; a load records the generation before reading and only
//! publishes if it is unchanged afterwards, so an eviction that races an
//! in-flight read always wins.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::base::Position;

use super::error::CoverageError;
use super::report::{CoverageEntry, ValueCount, parse_coverage};
use super::watch::{ChangeCallback, ChangeKind, FileWatcher, WatchHandle};

/// Shared, immutable list of entries for one coverage file.
pub type CoverageEntries = Arc<[CoverageEntry]>;

#[derive(Default)]
struct IndexState {
    entries: FxHashMap<PathBuf, CoverageEntries>,
    generations: FxHashMap<PathBuf, u64>,
    subscriptions: FxHashMap<PathBuf, WatchHandle>,
    closed: bool,
}

impl IndexState {
    fn generation(&self, path: &Path) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }

    fn evict(&mut self, path: &Path) {
        *self.generations.entry(path.to_path_buf()).or_default() += 1;
        if self.entries.remove(path).is_some() {
            debug!(path = %path.display(), "coverage evicted");
        }
    }
}

/// Coverage files loaded so far, with the watches that keep them fresh.
pub struct CoverageIndex {
    state: Arc<Mutex<IndexState>>,
    watcher: Arc<dyn FileWatcher>,
}

impl CoverageIndex {
    pub fn new(watcher: Arc<dyn FileWatcher>) -> Self {
        Self {
            state: Arc::new(Mutex::new(IndexState::default())),
            watcher,
        }
    }

    /// Load the coverage file at `path`, checking it reports on `file_identity`.
    ///
    /// Returns `None` if the file is unreadable, malformed or for another rules
    /// file. Failures are logged, never raised.
    pub async fn load(&self, file_identity: &str, path: &Path) -> Option<CoverageEntries> {
        self.load_cancellable(file_identity, path, &CancellationToken::new())
            .await
    }

    /// Like [`load`](Self::load), abandoning the read once `cancel` fires.
    ///
    /// An abandoned load caches nothing.
    pub async fn load_cancellable(
        &self,
        file_identity: &str,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Option<CoverageEntries> {
        match self.try_load(file_identity, path, cancel).await {
            Ok(entries) => Some(entries),
            Err(error @ (CoverageError::Cancelled | CoverageError::Superseded)) => {
                debug!(path = %path.display(), %error, "coverage load discarded");
                None
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "no coverage available");
                None
            }
        }
    }

    /// Load without the logging boundary.
    pub async fn try_load(
        &self,
        file_identity: &str,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<CoverageEntries, CoverageError> {
        let key = resolve_path(path);

        let generation = {
            let state = self.state.lock();
            if let Some(entries) = state.entries.get(&key) {
                trace!(path = %key.display(), "coverage cache hit");
                return Ok(Arc::clone(entries));
            }
            state.generation(&key)
        };

        // Subscribe before reading so a change during the read is observed.
        let watched = self.ensure_watch(&key);

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CoverageError::Cancelled),
            read = tokio::fs::read_to_string(&key) => read.map_err(|source| CoverageError::Io {
                path: key.clone(),
                source,
            })?,
        };

        let entries: CoverageEntries = parse_coverage(&text, file_identity)?.into();

        let mut state = self.state.lock();
        if state.generation(&key) != generation {
            return Err(CoverageError::Superseded);
        }
        if watched && !state.closed {
            debug!(path = %key.display(), entries = entries.len(), "coverage cached");
            state.entries.insert(key, Arc::clone(&entries));
        }
        Ok(entries)
    }

    /// Drop the cached entries for `path`, discarding any load in flight.
    pub fn invalidate(&self, path: &Path) {
        self.state.lock().evict(&resolve_path(path));
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.state.lock().entries.contains_key(&resolve_path(path))
    }

    /// Release every watch and empty the cache. Later loads are not cached.
    pub fn close(&self) {
        let handles: Vec<WatchHandle> = {
            let mut state = self.state.lock();
            state.closed = true;
            state.entries.clear();
            state.subscriptions.drain().map(|(_, handle)| handle).collect()
        };

        if !handles.is_empty() {
            debug!(watches = handles.len(), "releasing coverage watches");
        }
        for handle in handles {
            self.watcher.unsubscribe(handle);
        }
    }

    /// The innermost entry whose range contains `position`.
    ///
    /// Among matching entries the one contained by every other match wins;
    /// for identical ranges the later entry in pre-order (the deeper node) wins.
    pub fn entry_at(entries: &[CoverageEntry], position: Position) -> Option<&CoverageEntry> {
        entries
            .iter()
            .filter(|entry| entry.span.contains(position))
            .fold(None, |best: Option<&CoverageEntry>, candidate| match best {
                Some(current) if !current.span.contains_span(&candidate.span) => Some(current),
                _ => Some(candidate),
            })
    }

    /// Values observed at `position`, from the innermost entry covering it.
    pub fn query(entries: &[CoverageEntry], position: Position) -> Option<&[ValueCount]> {
        Self::entry_at(entries, position).map(|entry| entry.values.as_slice())
    }

    /// Make sure `path` is watched. Returns false if it cannot be.
    fn ensure_watch(&self, path: &Path) -> bool {
        {
            let state = self.state.lock();
            if state.closed {
                return false;
            }
            if state.subscriptions.contains_key(path) {
                return true;
            }
        }

        let handle = match self.watcher.subscribe(path, evict_on_change(&self.state, path)) {
            Ok(handle) => handle,
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot watch coverage file");
                return false;
            }
        };

        let mut state = self.state.lock();
        if state.closed || state.subscriptions.contains_key(path) {
            let watched = !state.closed;
            drop(state);
            self.watcher.unsubscribe(handle);
            return watched;
        }
        state.subscriptions.insert(path.to_path_buf(), handle);
        true
    }
}

impl Drop for CoverageIndex {
    fn drop(&mut self) {
        self.close();
    }
}

fn evict_on_change(state: &Arc<Mutex<IndexState>>, path: &Path) -> ChangeCallback {
    let state: Weak<Mutex<IndexState>> = Arc::downgrade(state);
    let key = path.to_path_buf();
    Arc::new(move |_, kind: ChangeKind| {
        if let Some(state) = state.upgrade() {
            trace!(path = %key.display(), ?kind, "coverage file changed");
            state.lock().evict(&key);
        }
    })
}

fn resolve_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
