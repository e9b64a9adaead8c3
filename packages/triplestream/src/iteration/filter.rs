//! Predicate-filtering decorator

use super::{Iteration, IterationState};
use crate::error::{EvalError, Result};

/// Yields only the elements of `source` accepted by `predicate`.
///
/// "Is there another accepted element" differs from "has the source
/// advanced", so one accepted element is buffered: `has_next` pulls and
/// discards rejected elements until it finds one or the source runs dry.
/// Each source element is pulled at most once.
pub struct FilterIteration<I: Iteration, P> {
    source: I,
    predicate: P,
    buffered: Option<I::Item>,
    source_exhausted: bool,
    state: IterationState,
}

impl<I, P> FilterIteration<I, P>
where
    I: Iteration,
    P: FnMut(&I::Item) -> bool,
{
    pub fn new(source: I, predicate: P) -> Self {
        Self {
            source,
            predicate,
            buffered: None,
            source_exhausted: false,
            state: IterationState::Open,
        }
    }

    fn fill_buffer(&mut self) -> Result<()> {
        while self.buffered.is_none() && !self.source_exhausted {
            if !self.source.has_next()? {
                self.source_exhausted = true;
                break;
            }
            let item = self.source.next()?;
            if (self.predicate)(&item) {
                self.buffered = Some(item);
            }
        }
        Ok(())
    }
}

impl<I, P> Iteration for FilterIteration<I, P>
where
    I: Iteration,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        self.fill_buffer()?;
        Ok(self.buffered.is_some())
    }

    fn next(&mut self) -> Result<I::Item> {
        self.state.ensure_open()?;
        self.fill_buffer()?;
        self.buffered.take().ok_or_else(EvalError::exhausted)
    }

    fn close(&mut self) -> Result<()> {
        if !self.state.mark_closed() {
            return Ok(());
        }
        self.buffered = None;
        self.source.close()
    }
}
