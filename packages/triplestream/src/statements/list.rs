//! RDF collection traversal

use tracing::trace;

use super::single_value;
use crate::config::ListConfig;
use crate::domain::vocab::rdf;
use crate::domain::{Resource, TripleSource, Value};
use crate::error::{EvalError, Result};
use crate::iteration::{Iteration, IterationState};

/// Lazy walk over an `rdf:first` / `rdf:rest` chain.
///
/// Exhausted once the cursor reaches `rdf:nil`. Each `next` resolves both
/// edges of the current node before yielding its member, so a broken node
/// fails before its value is produced. Without a `max_length` a chain that
/// never reaches `rdf:nil` is walked forever.
pub struct ListIteration<'a, S: TripleSource + ?Sized> {
    source: &'a S,
    cursor: Resource,
    nil: Resource,
    yielded: usize,
    max_length: Option<usize>,
    state: IterationState,
}

impl<'a, S: TripleSource + ?Sized> ListIteration<'a, S> {
    pub fn new(source: &'a S, subject: Resource) -> Self {
        Self {
            source,
            cursor: subject,
            nil: rdf::nil(),
            yielded: 0,
            max_length: None,
            state: IterationState::Open,
        }
    }

    /// Fail with `MalformedList` instead of yielding more than `max` members
    pub fn with_max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    /// Node the next member will be read from
    pub fn cursor(&self) -> &Resource {
        &self.cursor
    }
}

impl<S: TripleSource + ?Sized> Iteration for ListIteration<'_, S> {
    type Item = Value;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        Ok(self.cursor != self.nil)
    }

    fn next(&mut self) -> Result<Value> {
        self.state.ensure_open()?;
        if self.cursor == self.nil {
            return Err(EvalError::exhausted());
        }
        if let Some(max) = self.max_length {
            if self.yielded >= max {
                return Err(EvalError::malformed_list(format!(
                    "List longer than {} members, not terminated at {}",
                    max, self.cursor
                )));
            }
        }

        let member = single_value(self.source, &self.cursor, &rdf::first())?.ok_or_else(|| {
            EvalError::malformed_list(format!("List missing rdf:first: {}", self.cursor))
        })?;
        let rest = single_value(self.source, &self.cursor, &rdf::rest())?.ok_or_else(|| {
            EvalError::malformed_list(format!("List missing rdf:rest: {}", self.cursor))
        })?;
        let rest = rest.as_resource().ok_or_else(|| {
            EvalError::malformed_list(format!(
                "List rdf:rest of {} is a literal: {}",
                self.cursor, rest
            ))
        })?;

        trace!("list step {}: {} -> {}", self.yielded, self.cursor, rest);
        self.cursor = rest;
        self.yielded += 1;
        Ok(member)
    }

    fn close(&mut self) -> Result<()> {
        self.state.mark_closed();
        Ok(())
    }
}

/// Traverse the collection rooted at `subject`
pub fn list<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: &Resource,
) -> ListIteration<'a, S> {
    ListIteration::new(source, subject.clone())
}

/// Traverse with the limits from `config`
pub fn list_with<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: &Resource,
    config: &ListConfig,
) -> ListIteration<'a, S> {
    ListIteration::new(source, subject.clone()).with_max_length(config.max_length)
}
