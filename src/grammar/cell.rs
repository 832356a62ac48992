//! Single-flight, one-shot compilation of the symbol table.
//!
//! The cell moves through three states:
//!
//! ```text
//! Uninitialized ──compile──▶ Compiling { waiters } ──done──▶ Ready(table)
//!       ▲                          │                            │
//!       └────── failure / abandon ─┘◀──────── force ────────────┘
//!                 (parked callers re-enter)
//! ```
//!
//! The first caller drives the compilation; callers arriving while it runs
//! park on a oneshot channel and receive the same outcome. `force` starts a
//! new generation, adopting any parked waiters, so an older in-flight
//! compilation can no longer publish its result.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::compile::compile;
use super::error::GrammarError;
use super::source::GrammarSource;
use super::table::CompiledSymbolTable;

/// Result delivered to every caller of one compilation.
pub type CompileOutcome = Result<Arc<CompiledSymbolTable>, GrammarError>;

enum CellState {
    Uninitialized,
    Compiling {
        generation: u64,
        waiters: Vec<oneshot::Sender<CompileOutcome>>,
    },
    Ready(Arc<CompiledSymbolTable>),
}

struct Inner {
    state: CellState,
    generation: u64,
}

/// What a caller does after inspecting the state.
enum Entry {
    Ready(Arc<CompiledSymbolTable>),
    Wait(oneshot::Receiver<CompileOutcome>),
    Lead(u64),
}

impl Inner {
    fn enter(&mut self, force: bool) -> Entry {
        match &mut self.state {
            CellState::Ready(table) if !force => return Entry::Ready(Arc::clone(table)),
            CellState::Compiling { waiters, .. } if !force => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                return Entry::Wait(rx);
            }
            _ => {}
        }

        self.generation += 1;
        let waiters = match std::mem::replace(&mut self.state, CellState::Uninitialized) {
            CellState::Compiling { waiters, .. } => waiters,
            _ => Vec::new(),
        };
        self.state = CellState::Compiling {
            generation: self.generation,
            waiters,
        };
        Entry::Lead(self.generation)
    }

    fn is_current(&self, generation: u64) -> bool {
        matches!(&self.state, CellState::Compiling { generation: g, .. } if *g == generation)
    }
}

/// Owns the compiled symbol table and the source it is compiled from.
pub struct SymbolTableCell {
    source: Arc<dyn GrammarSource>,
    inner: Mutex<Inner>,
}

impl SymbolTableCell {
    pub fn new(source: Arc<dyn GrammarSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                state: CellState::Uninitialized,
                generation: 0,
            }),
        }
    }

    /// Get the table, compiling it first if needed.
    pub async fn get(&self) -> CompileOutcome {
        self.compile(false).await
    }

    /// Compile the grammar. With `force`, prior state is discarded.
    ///
    /// A parked caller whose leader is dropped enters again, so one of the
    /// parked callers takes over the compilation and the rest share its result.
    pub async fn compile(&self, force: bool) -> CompileOutcome {
        let mut force = force;
        loop {
            let entry = self.inner.lock().enter(force);

            match entry {
                Entry::Ready(table) => return Ok(table),
                Entry::Wait(rx) => match rx.await {
                    Ok(outcome) => return outcome,
                    Err(_) => {
                        debug!("grammar compilation leader dropped, re-entering");
                        force = false;
                    }
                },
                Entry::Lead(generation) => {
                    let mut guard = LeaderGuard {
                        cell: self,
                        generation,
                        finished: false,
                    };
                    let outcome = self.run(generation).await;
                    guard.finished = true;
                    return self.publish(generation, outcome);
                }
            }
        }
    }

    /// The table if compilation already finished.
    pub fn ready(&self) -> Option<Arc<CompiledSymbolTable>> {
        match &self.inner.lock().state {
            CellState::Ready(table) => Some(Arc::clone(table)),
            _ => None,
        }
    }

    pub fn is_compiling(&self) -> bool {
        matches!(self.inner.lock().state, CellState::Compiling { .. })
    }

    async fn run(&self, generation: u64) -> CompileOutcome {
        debug!(generation, "compiling grammar");
        let grammar = self.source.load().await?;
        Ok(Arc::new(compile(&grammar)))
    }

    fn publish(&self, generation: u64, outcome: CompileOutcome) -> CompileOutcome {
        let waiters = {
            let mut inner = self.inner.lock();
            if !inner.is_current(generation) {
                debug!(generation, "grammar compilation superseded");
                return outcome;
            }

            let next = match &outcome {
                Ok(table) => CellState::Ready(Arc::clone(table)),
                Err(_) => CellState::Uninitialized,
            };
            match std::mem::replace(&mut inner.state, next) {
                CellState::Compiling { waiters, .. } => waiters,
                _ => Vec::new(),
            }
        };

        if let Err(error) = &outcome {
            warn!(%error, "grammar compilation failed");
        }
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
        outcome
    }

    /// Reset after the leading caller was dropped mid-compilation.
    fn abandon(&self, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.is_current(generation) {
            debug!(generation, "grammar compilation abandoned");
            // Dropping the waiters' senders wakes them to enter again.
            inner.state = CellState::Uninitialized;
        }
    }
}

struct LeaderGuard<'a> {
    cell: &'a SymbolTableCell,
    generation: u64,
    finished: bool,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.cell.abandon(self.generation);
        }
    }
}
