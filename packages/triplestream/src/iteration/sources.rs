//! Basic iterations and the `std::iter::Iterator` bridge

use std::collections::VecDeque;
use std::marker::PhantomData;

use tracing::warn;

use super::{Iteration, IterationState};
use crate::error::{EvalError, Result};

/// Iteration with no elements
pub struct EmptyIteration<T> {
    state: IterationState,
    _marker: PhantomData<T>,
}

impl<T> EmptyIteration<T> {
    pub fn new() -> Self {
        Self {
            state: IterationState::Open,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for EmptyIteration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Iteration for EmptyIteration<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        Ok(false)
    }

    fn next(&mut self) -> Result<T> {
        self.state.ensure_open()?;
        Err(EvalError::exhausted())
    }

    fn close(&mut self) -> Result<()> {
        self.state.mark_closed();
        Ok(())
    }
}

/// Iteration over an owned buffer
pub struct VecIteration<T> {
    items: VecDeque<T>,
    state: IterationState,
}

impl<T> VecIteration<T> {
    pub fn new(items: impl Into<VecDeque<T>>) -> Self {
        Self {
            items: items.into(),
            state: IterationState::Open,
        }
    }
}

impl<T> FromIterator<T> for VecIteration<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::new(iter.into_iter().collect::<VecDeque<T>>())
    }
}

impl<T> Iteration for VecIteration<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        Ok(!self.items.is_empty())
    }

    fn next(&mut self) -> Result<T> {
        self.state.ensure_open()?;
        self.items.pop_front().ok_or_else(EvalError::exhausted)
    }

    fn close(&mut self) -> Result<()> {
        if self.state.mark_closed() {
            self.items.clear();
        }
        Ok(())
    }
}

/// `std::iter::Iterator` view over an [`Iteration`].
///
/// Yields `Ok` elements until the iteration ends, or a single `Err` after
/// which it is fused. The wrapped iteration is closed at the end, after an
/// error, or when this adapter is dropped early.
pub struct Results<I: Iteration> {
    inner: I,
    done: bool,
}

impl<I: Iteration> Results<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, done: false }
    }

    fn finish(&mut self) -> Result<()> {
        self.done = true;
        self.inner.close()
    }
}

impl<I: Iteration> Iterator for Results<I> {
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let step = match self.inner.has_next() {
            Ok(true) => Iteration::next(&mut self.inner).map(Some),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };
        match step {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => self.finish().err().map(Err),
            Err(e) => {
                if let Err(close_err) = self.finish() {
                    warn!("Suppressed close failure ({}) in favour of: {}", close_err, e);
                }
                Some(Err(e))
            }
        }
    }
}

impl<I: Iteration> std::iter::FusedIterator for Results<I> {}

impl<I: Iteration> Drop for Results<I> {
    fn drop(&mut self) {
        if !self.done {
            if let Err(e) = self.finish() {
                warn!("Close failed while dropping iteration adapter: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::iteration::IterationExt;

    #[test]
    fn test_empty_iteration() {
        let mut it = EmptyIteration::<u32>::new();
        assert!(!it.has_next().unwrap());
        assert_eq!(it.next().unwrap_err().kind, ErrorKind::IllegalState);
        it.close().unwrap();
        it.close().unwrap();
        assert_eq!(it.has_next().unwrap_err().kind, ErrorKind::IllegalState);
    }

    #[test]
    fn test_vec_iteration_after_close() {
        let mut it: VecIteration<_> = (1..=3).collect();
        assert_eq!(it.next().unwrap(), 1);
        it.close().unwrap();
        assert_eq!(it.next().unwrap_err().kind, ErrorKind::IllegalState);
    }

    #[test]
    fn test_results_bridge() {
        let doubled: Vec<i32> = VecIteration::new(vec![1, 2, 3])
            .into_results()
            .map(|r| r.map(|n| n * 2))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(doubled, vec![2, 4, 6]);
    }

    #[test]
    fn test_results_fused_after_error() {
        let mut results = VecIteration::new(vec![1, 2])
            .convert_with(|_| -> Result<i32> { Err(EvalError::evaluation("store down")) })
            .into_results();
        assert_eq!(results.next().unwrap().unwrap_err().kind, ErrorKind::Evaluation);
        assert!(results.next().is_none());
    }
}
