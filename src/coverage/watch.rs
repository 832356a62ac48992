//! File-change subscriptions used to evict cached coverage.
//!
//! [`FileWatcher::subscribe`] registers a callback for one path and returns a
//! [`WatchHandle`]; [`FileWatcher::unsubscribe`] releases it deterministically.
//! Two implementations are provided:
//!
//! - [`NotifyWatcher`] listens to the operating system through `notify`.
//! - [`ManualWatcher`] is driven by the host, for editors that already
//!   forward file events (and for tests).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use super::error::CoverageError;

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Changed,
    Created,
    Deleted,
}

/// Callback invoked with the watched path and the kind of change.
pub type ChangeCallback = Arc<dyn Fn(&Path, ChangeKind) + Send + Sync>;

/// Identifies one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(u64);

/// Source of file-change notifications.
pub trait FileWatcher: Send + Sync {
    fn subscribe(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle, CoverageError>;

    /// Release a subscription. Unknown handles are ignored.
    fn unsubscribe(&self, handle: WatchHandle);
}

/// Registered callbacks, shared by both watcher implementations.
#[derive(Default)]
struct Subscriptions {
    next: u64,
    entries: FxHashMap<WatchHandle, (PathBuf, ChangeCallback)>,
}

impl Subscriptions {
    fn insert(&mut self, path: PathBuf, on_change: ChangeCallback) -> WatchHandle {
        self.next += 1;
        let handle = WatchHandle(self.next);
        self.entries.insert(handle, (path, on_change));
        handle
    }

    fn remove(&mut self, handle: WatchHandle) -> Option<PathBuf> {
        self.entries.remove(&handle).map(|(path, _)| path)
    }

    fn callbacks_for(&self, path: &Path) -> Vec<(PathBuf, ChangeCallback)> {
        self.entries
            .values()
            .filter(|(watched, _)| watched == path)
            .map(|(watched, callback)| (watched.clone(), Arc::clone(callback)))
            .collect()
    }
}

/// Invoke callbacks outside the lock so they may call back into the watcher.
fn dispatch(subscriptions: &Mutex<Subscriptions>, path: &Path, kind: ChangeKind) -> usize {
    let callbacks = subscriptions.lock().callbacks_for(path);
    for (watched, callback) in &callbacks {
        callback(watched, kind);
    }
    callbacks.len()
}

// ============================================================================
// MANUAL
// ============================================================================

/// A watcher fed by the host's own file events.
#[derive(Default)]
pub struct ManualWatcher {
    subscriptions: Mutex<Subscriptions>,
}

impl ManualWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a change. Returns how many subscribers were notified.
    pub fn notify(&self, path: &Path, kind: ChangeKind) -> usize {
        dispatch(&self.subscriptions, path, kind)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().entries.len()
    }
}

impl FileWatcher for ManualWatcher {
    fn subscribe(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle, CoverageError> {
        Ok(self.subscriptions.lock().insert(path.to_path_buf(), on_change))
    }

    fn unsubscribe(&self, handle: WatchHandle) {
        self.subscriptions.lock().remove(handle);
    }
}

// ============================================================================
// NOTIFY
// ============================================================================

/// A watcher backed by operating-system file events.
///
/// Watches the parent directory of each subscribed file so that a file that
/// is deleted and recreated keeps reporting changes.
pub struct NotifyWatcher {
    watcher: Mutex<RecommendedWatcher>,
    subscriptions: Arc<Mutex<Subscriptions>>,
    /// Subscribed files per watched directory.
    directories: Mutex<FxHashMap<PathBuf, usize>>,
}

impl NotifyWatcher {
    pub fn new() -> Result<Self, CoverageError> {
        let subscriptions = Arc::new(Mutex::new(Subscriptions::default()));
        let registry = Arc::clone(&subscriptions);

        let watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    let Some(kind) = change_kind(&event.kind) else {
                        return;
                    };
                    for path in &event.paths {
                        let notified = dispatch(&registry, path, kind);
                        trace!(path = %path.display(), ?kind, notified, "file event");
                    }
                }
                Err(error) => warn!(%error, "file watcher error"),
            }
        })
        .map_err(|e| CoverageError::watch(e.to_string()))?;

        Ok(Self {
            watcher: Mutex::new(watcher),
            subscriptions,
            directories: Mutex::new(FxHashMap::default()),
        })
    }
}

impl FileWatcher for NotifyWatcher {
    fn subscribe(&self, path: &Path, on_change: ChangeCallback) -> Result<WatchHandle, CoverageError> {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| CoverageError::watch(format!("{} has no parent", path.display())))?;

        let mut directories = self.directories.lock();
        if !directories.contains_key(&directory) {
            self.watcher
                .lock()
                .watch(&directory, RecursiveMode::NonRecursive)
                .map_err(|e| CoverageError::watch(e.to_string()))?;
            debug!(directory = %directory.display(), "watching directory");
        }
        *directories.entry(directory).or_insert(0) += 1;

        Ok(self.subscriptions.lock().insert(path, on_change))
    }

    fn unsubscribe(&self, handle: WatchHandle) {
        let Some(path) = self.subscriptions.lock().remove(handle) else {
            return;
        };
        let Some(directory) = path.parent() else {
            return;
        };

        let mut directories = self.directories.lock();
        if let Some(watchers) = directories.get_mut(directory) {
            *watchers -= 1;
            if *watchers == 0 {
                directories.remove(directory);
                if let Err(error) = self.watcher.lock().unwatch(directory) {
                    warn!(%error, directory = %directory.display(), "failed to unwatch directory");
                }
            }
        }
    }
}

/// Map a notify event to the change it represents for a single file.
fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ChangeKind::Created),
        EventKind::Modify(_) => Some(ChangeKind::Changed),
        _ => None,
    }
}
