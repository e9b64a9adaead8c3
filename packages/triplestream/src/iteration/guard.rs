//! Scoped release of iterations

use std::ops::{Deref, DerefMut};

use tracing::warn;

use super::Iteration;
use crate::error::Result;

/// Closes the wrapped iteration when dropped.
///
/// Prefer [`CloseGuard::close`] on the success path so a close failure is
/// reported; the `Drop` path can only log it.
pub struct CloseGuard<I: Iteration> {
    iteration: I,
    released: bool,
}

impl<I: Iteration> CloseGuard<I> {
    pub fn new(iteration: I) -> Self {
        Self {
            iteration,
            released: false,
        }
    }

    /// Close now and report the outcome
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        self.iteration.close()
    }
}

impl<I: Iteration> Deref for CloseGuard<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.iteration
    }
}

impl<I: Iteration> DerefMut for CloseGuard<I> {
    fn deref_mut(&mut self) -> &mut I {
        &mut self.iteration
    }
}

impl<I: Iteration> Drop for CloseGuard<I> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.iteration.close() {
                warn!("Close failed while unwinding iteration scope: {}", e);
            }
        }
    }
}

/// Run `body` over `iteration`, then close it.
///
/// The body's error takes precedence: a close failure after a failed body is
/// logged and dropped. After a successful body the close failure is returned.
pub fn consume<I, T, F>(iteration: I, body: F) -> Result<T>
where
    I: Iteration,
    F: FnOnce(&mut I) -> Result<T>,
{
    let mut guard = CloseGuard::new(iteration);
    let outcome = body(&mut *guard);
    let closed = guard.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Suppressed close failure ({}) in favour of: {}", close_err, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, EvalError};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts closes; optionally fails on close
    struct Probe {
        closes: Rc<Cell<usize>>,
        fail_close: bool,
    }

    impl Iteration for Probe {
        type Item = u8;

        fn has_next(&mut self) -> Result<bool> {
            Ok(true)
        }

        fn next(&mut self) -> Result<u8> {
            Ok(7)
        }

        fn close(&mut self) -> Result<()> {
            self.closes.set(self.closes.get() + 1);
            if self.fail_close {
                Err(EvalError::evaluation("close failed"))
            } else {
                Ok(())
            }
        }
    }

    fn probe(fail_close: bool) -> (Probe, Rc<Cell<usize>>) {
        let closes = Rc::new(Cell::new(0));
        (
            Probe {
                closes: closes.clone(),
                fail_close,
            },
            closes,
        )
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let (p, closes) = probe(false);
        {
            let mut guard = CloseGuard::new(p);
            assert_eq!(guard.next().unwrap(), 7);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_guard_explicit_close_not_repeated_on_drop() {
        let (p, closes) = probe(false);
        CloseGuard::new(p).close().unwrap();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_consume_closes_on_success() {
        let (p, closes) = probe(false);
        let v = consume(p, |it| it.next()).unwrap();
        assert_eq!(v, 7);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_consume_closes_on_error() {
        let (p, closes) = probe(false);
        let err = consume(p, |_| -> Result<()> { Err(EvalError::cardinality("two")) }).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CardinalityViolation);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_primary_error_wins_over_close_error() {
        let (p, closes) = probe(true);
        let err = consume(p, |_| -> Result<()> { Err(EvalError::malformed_list("broken")) })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedList);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_close_error_reported_after_success() {
        let (p, _) = probe(true);
        let err = consume(p, |it| it.next()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Evaluation);
        assert_eq!(err.message, "close failed");
    }

    #[test]
    fn test_guard_closes_on_panic() {
        let (p, closes) = probe(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = CloseGuard::new(p);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(closes.get(), 1);
    }
}
