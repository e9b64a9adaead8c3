//! Elementwise mapping decorator

use super::{Iteration, IterationState};
use crate::error::Result;

/// Maps every element of `source` through `convert`.
///
/// A projection only: `has_next` passes through and a failing `convert`
/// surfaces exactly like a source failure.
pub struct ConvertingIteration<I, F> {
    source: I,
    convert: F,
    state: IterationState,
}

impl<I, F> ConvertingIteration<I, F> {
    pub fn new(source: I, convert: F) -> Self {
        Self {
            source,
            convert,
            state: IterationState::Open,
        }
    }
}

impl<I, F, U> Iteration for ConvertingIteration<I, F>
where
    I: Iteration,
    F: FnMut(I::Item) -> Result<U>,
{
    type Item = U;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        self.source.has_next()
    }

    fn next(&mut self) -> Result<U> {
        self.state.ensure_open()?;
        let item = self.source.next()?;
        (self.convert)(item)
    }

    fn close(&mut self) -> Result<()> {
        if !self.state.mark_closed() {
            return Ok(());
        }
        self.source.close()
    }
}
