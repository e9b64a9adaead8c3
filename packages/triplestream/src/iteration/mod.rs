//! Pull-based iteration protocol
//!
//! # Contract
//!
//! An [`Iteration`] is a forward-only, non-restartable sequence with an
//! explicit lifecycle:
//!
//! 1. **Open**: `has_next` / `next` pull elements, possibly blocking on the
//!    underlying store.
//! 2. **Closed**: after `close`, both `has_next` and `next` fail with
//!    `IllegalState`. `close` itself is idempotent.
//!
//! Whoever receives an iteration owns it and closes it on every exit path.
//! Decorators ([`FilterIteration`], [`ConvertingIteration`]) take ownership of
//! the iteration they wrap and become its only closer, so callers close the
//! outermost decorator only. Use [`consume`] or [`CloseGuard`] at the point
//! of consumption; both release the iteration even when the body bails out
//! with `?` or panics.
//!
//! # Examples
//!
//! ```rust
//! use triplestream::iteration::{IterationExt, VecIteration};
//!
//! let evens = VecIteration::new(vec![1, 2, 3, 4, 5, 6])
//!     .filter_with(|n| n % 2 == 0)
//!     .convert_with(|n| Ok(n * 10))
//!     .collect_vec()
//!     .unwrap();
//!
//! assert_eq!(evens, vec![20, 40, 60]);
//! ```

mod converting;
mod filter;
mod guard;
mod sources;

pub use converting::ConvertingIteration;
pub use filter::FilterIteration;
pub use guard::{consume, CloseGuard};
pub use sources::{EmptyIteration, Results, VecIteration};

use crate::error::{EvalError, Result};

/// Lifecycle state of an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationState {
    #[default]
    Open,
    Closed,
}

impl IterationState {
    /// `IllegalState` unless open
    pub fn ensure_open(&self) -> Result<()> {
        match self {
            IterationState::Open => Ok(()),
            IterationState::Closed => Err(EvalError::closed()),
        }
    }

    /// Transition to `Closed`; returns whether this call did the transition
    pub fn mark_closed(&mut self) -> bool {
        std::mem::replace(self, IterationState::Closed) == IterationState::Open
    }

    pub fn is_closed(&self) -> bool {
        *self == IterationState::Closed
    }
}

/// Lazy sequence with mandatory release
pub trait Iteration {
    type Item;

    /// Whether another element is available; may block on the store
    fn has_next(&mut self) -> Result<bool>;

    /// Next element
    ///
    /// # Errors
    ///
    /// `IllegalState` when closed or when no element remains; any store
    /// failure is passed through unchanged.
    fn next(&mut self) -> Result<Self::Item>;

    /// Release underlying resources. Idempotent.
    fn close(&mut self) -> Result<()>;
}

/// Type-erased iteration, as returned by triple sources
pub type BoxIteration<'a, T> = Box<dyn Iteration<Item = T> + 'a>;

impl<I: Iteration + ?Sized> Iteration for Box<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> Result<bool> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<Self::Item> {
        (**self).next()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Combinators available on every iteration
pub trait IterationExt: Iteration + Sized {
    /// Keep elements for which `predicate` holds
    fn filter_with<P>(self, predicate: P) -> FilterIteration<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        FilterIteration::new(self, predicate)
    }

    /// Map every element through `convert`
    fn convert_with<U, F>(self, convert: F) -> ConvertingIteration<Self, F>
    where
        F: FnMut(Self::Item) -> Result<U>,
    {
        ConvertingIteration::new(self, convert)
    }

    fn boxed<'a>(self) -> BoxIteration<'a, Self::Item>
    where
        Self: 'a,
    {
        Box::new(self)
    }

    /// Drain into a `Vec`, closing the iteration afterwards
    fn collect_vec(self) -> Result<Vec<Self::Item>> {
        consume(self, |it| {
            let mut items = Vec::new();
            while it.has_next()? {
                items.push(it.next()?);
            }
            Ok(items)
        })
    }

    /// Count remaining elements, closing the iteration afterwards
    fn count_all(self) -> Result<usize> {
        consume(self, |it| {
            let mut n = 0;
            while it.has_next()? {
                it.next()?;
                n += 1;
            }
            Ok(n)
        })
    }

    /// Bridge to `std::iter::Iterator`
    fn into_results(self) -> Results<Self> {
        Results::new(self)
    }
}

impl<I: Iteration> IterationExt for I {}
