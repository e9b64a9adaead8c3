//! Instrumented iterations and sources

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use triplestream::infrastructure::MemoryTripleSource;
use triplestream::iteration::VecIteration;
use triplestream::{BoxIteration, EvalError, Iteration, Pattern, Result, Statement, TripleSource};

/// Pull and close counters shared with a [`CountingIteration`]
#[derive(Default)]
pub struct Counters {
    pub pulls: Cell<usize>,
    pub closes: Cell<usize>,
}

/// Vec-backed iteration that records every `next` and `close`
pub struct CountingIteration<T> {
    inner: VecIteration<T>,
    counters: Rc<Counters>,
}

impl<T> CountingIteration<T> {
    pub fn new(items: Vec<T>) -> (Self, Rc<Counters>) {
        let counters = Rc::new(Counters::default());
        (
            Self {
                inner: VecIteration::new(items),
                counters: counters.clone(),
            },
            counters,
        )
    }
}

impl<T> Iteration for CountingIteration<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        self.inner.has_next()
    }

    fn next(&mut self) -> Result<T> {
        let item = self.inner.next()?;
        self.counters.pulls.set(self.counters.pulls.get() + 1);
        Ok(item)
    }

    fn close(&mut self) -> Result<()> {
        self.counters.closes.set(self.counters.closes.get() + 1);
        self.inner.close()
    }
}

/// Failure injection around a [`MemoryTripleSource`]
pub struct FaultySource {
    pub inner: MemoryTripleSource,
    /// `get_statements` itself fails
    pub fail_query: bool,
    /// `has_next` fails once this many statements were yielded
    pub fail_after: Option<usize>,
    /// `close` reports a failure (after releasing the inner cursor)
    pub fail_close: bool,
    closes: Arc<AtomicUsize>,
}

impl FaultySource {
    pub fn new(inner: MemoryTripleSource) -> Self {
        Self {
            inner,
            fail_query: false,
            fail_after: None,
            fail_close: false,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `close` calls that reached a cursor of this source
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl TripleSource for FaultySource {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        if self.fail_query {
            return Err(EvalError::evaluation("injected query failure")
                .with_source(std::io::Error::new(std::io::ErrorKind::TimedOut, "store timeout")));
        }
        Ok(Box::new(FaultyCursor {
            inner: self.inner.get_statements(pattern)?,
            yielded: 0,
            fail_after: self.fail_after,
            fail_close: self.fail_close,
            closes: self.closes.clone(),
        }))
    }
}

struct FaultyCursor<'a> {
    inner: BoxIteration<'a, Statement>,
    yielded: usize,
    fail_after: Option<usize>,
    fail_close: bool,
    closes: Arc<AtomicUsize>,
}

impl Iteration for FaultyCursor<'_> {
    type Item = Statement;

    fn has_next(&mut self) -> Result<bool> {
        if self.fail_after.is_some_and(|n| self.yielded >= n) {
            return Err(EvalError::evaluation("injected cursor failure"));
        }
        self.inner.has_next()
    }

    fn next(&mut self) -> Result<Statement> {
        let stmt = self.inner.next()?;
        self.yielded += 1;
        Ok(stmt)
    }

    fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()?;
        if self.fail_close {
            return Err(EvalError::evaluation("injected close failure"));
        }
        Ok(())
    }
}
