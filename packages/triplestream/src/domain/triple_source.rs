//! Port trait: TripleSource

use std::sync::Arc;

use super::model::{Pattern, Statement};
use crate::iteration::BoxIteration;
use crate::Result;

/// Pattern-matching capability over a statement store.
///
/// # Contract
///
/// - Every call returns an independent iteration owned by the caller.
/// - Calls may come from several threads at once; a single returned
///   iteration is not shared between threads.
/// - Result order is store-defined.
/// - Terms match by structural equality.
///
/// # Implementations
///
/// - `MemoryTripleSource`: in-process statement set
/// - `SqliteTripleSource`: SQLite-backed statement table (feature `sqlite`)
///
/// # Examples
///
/// ```rust
/// use triplestream::domain::{Iri, Pattern, Resource, Statement, TripleSource, Value};
/// use triplestream::infrastructure::MemoryTripleSource;
/// use triplestream::iteration::IterationExt;
///
/// let source = MemoryTripleSource::new();
/// source.add(Statement::new(Resource::iri("urn:s"), Iri::new("urn:p"), Value::iri("urn:o")));
///
/// let pattern = Pattern::any().predicate(Iri::new("urn:p"));
/// let found = source.get_statements(&pattern).unwrap().collect_vec().unwrap();
/// assert_eq!(found.len(), 1);
/// ```
pub trait TripleSource: Send + Sync {
    /// Statements matching `pattern`
    ///
    /// # Errors
    ///
    /// `Evaluation` if the store cannot start the query.
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>>;
}

impl<T: TripleSource + ?Sized> TripleSource for &T {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        (**self).get_statements(pattern)
    }
}

impl<T: TripleSource + ?Sized> TripleSource for Box<T> {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        (**self).get_statements(pattern)
    }
}

impl<T: TripleSource + ?Sized> TripleSource for Arc<T> {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        (**self).get_statements(pattern)
    }
}
