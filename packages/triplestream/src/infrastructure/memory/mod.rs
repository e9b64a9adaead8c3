//! In-memory TripleSource
//!
//! Statements live in a copy-on-write vector behind a `parking_lot::RwLock`.
//! A query takes a snapshot (`Arc` clone) and then matches lazily, so writers
//! never wait on open cursors and cursors never observe later writes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::{Pattern, Statement, TripleSource};
use crate::error::{EvalError, Result};
use crate::iteration::{BoxIteration, Iteration, IterationState};

/// Statement set held in process memory
#[derive(Default)]
pub struct MemoryTripleSource {
    statements: RwLock<Arc<Vec<Statement>>>,
    open: Arc<AtomicUsize>,
}

impl MemoryTripleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement; returns `false` if it was already present
    pub fn add(&self, statement: Statement) -> bool {
        let mut guard = self.statements.write();
        if guard.contains(&statement) {
            return false;
        }
        Arc::make_mut(&mut *guard).push(statement);
        true
    }

    /// Add many statements, skipping duplicates; returns how many were new
    pub fn extend(&self, statements: impl IntoIterator<Item = Statement>) -> usize {
        let mut guard = self.statements.write();
        let mut seen: HashSet<Statement> = guard.iter().cloned().collect();
        let fresh: Vec<Statement> = statements
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        let added = fresh.len();
        if added > 0 {
            Arc::make_mut(&mut *guard).extend(fresh);
        }
        added
    }

    /// Remove every statement matching `pattern`; returns how many were removed
    pub fn remove_matching(&self, pattern: &Pattern) -> usize {
        let mut guard = self.statements.write();
        let before = guard.len();
        Arc::make_mut(&mut *guard).retain(|s| !pattern.matches(s));
        before - guard.len()
    }

    pub fn len(&self) -> usize {
        self.statements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.read().is_empty()
    }

    /// Cursors handed out and not yet closed or dropped
    pub fn open_iterations(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl FromIterator<Statement> for MemoryTripleSource {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        let source = Self::new();
        source.extend(iter);
        source
    }
}

impl TripleSource for MemoryTripleSource {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        let snapshot = Arc::clone(&*self.statements.read());
        debug!(
            "memory source: pattern {} over {} statements",
            pattern,
            snapshot.len()
        );
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            snapshot,
            pattern: pattern.clone(),
            position: 0,
            lookahead: None,
            open: Arc::clone(&self.open),
            state: IterationState::Open,
        }))
    }
}

/// Lazy matcher over one snapshot
struct MemoryCursor {
    snapshot: Arc<Vec<Statement>>,
    pattern: Pattern,
    position: usize,
    lookahead: Option<usize>,
    open: Arc<AtomicUsize>,
    state: IterationState,
}

impl MemoryCursor {
    fn seek(&mut self) -> Option<usize> {
        if self.lookahead.is_none() {
            while self.position < self.snapshot.len() {
                let idx = self.position;
                self.position += 1;
                if self.pattern.matches(&self.snapshot[idx]) {
                    self.lookahead = Some(idx);
                    break;
                }
            }
        }
        self.lookahead
    }

    fn release(&mut self) {
        if self.state.mark_closed() {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Iteration for MemoryCursor {
    type Item = Statement;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        Ok(self.seek().is_some())
    }

    fn next(&mut self) -> Result<Statement> {
        self.state.ensure_open()?;
        let idx = self.seek().ok_or_else(EvalError::exhausted)?;
        self.lookahead = None;
        Ok(self.snapshot[idx].clone())
    }

    fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        if !self.state.is_closed() {
            warn!("memory source: cursor for {} dropped without close", self.pattern);
            self.release();
        }
    }
}
