//! Graph utilities over a [`TripleSource`]
//!
//! Cardinality-constrained lookups, boolean coercion, typed projections and
//! RDF collection traversal. Every operation either consumes the statement
//! iteration it opens (closing it on all paths) or hands a new iteration to
//! the caller, who then owns it.
//!
//! # Examples
//!
//! ```rust
//! use triplestream::domain::{Iri, Literal, Resource, Statement, Value};
//! use triplestream::infrastructure::MemoryTripleSource;
//! use triplestream::statements;
//!
//! let source = MemoryTripleSource::new();
//! let s = Resource::iri("urn:shape");
//! let closed = Iri::new("http://www.w3.org/ns/shacl#closed");
//! source.add(Statement::new(s.clone(), closed.clone(), Literal::from_bool(true)));
//!
//! assert!(statements::boolean_value(&source, &s, &closed).unwrap());
//! ```

mod list;

pub use list::{list, list_with, ListIteration};

use crate::domain::{Iri, Literal, Pattern, Resource, Statement, TripleSource, Value};
use crate::error::{EvalError, Result};
use crate::iteration::{consume, BoxIteration, Iteration, IterationExt};

/// The only statement matching `pattern`, if any.
///
/// # Errors
///
/// `CardinalityViolation` if two or more statements match.
pub fn single<S: TripleSource + ?Sized>(source: &S, pattern: &Pattern) -> Result<Option<Statement>> {
    let statements = source.get_statements(pattern)?;
    consume(statements, |it| {
        if !it.has_next()? {
            return Ok(None);
        }
        let stmt = it.next()?;
        if it.has_next()? {
            return Err(EvalError::cardinality(format!(
                "Multiple statements for pattern: {}",
                pattern
            )));
        }
        Ok(Some(stmt))
    })
}

/// Object of the only `(subject, predicate, *)` statement, if any
pub fn single_value<S: TripleSource + ?Sized>(
    source: &S,
    subject: &Resource,
    predicate: &Iri,
) -> Result<Option<Value>> {
    let pattern = Pattern::new(Some(subject.clone()), Some(predicate.clone()), None);
    Ok(single(source, &pattern)?.map(Statement::into_object))
}

/// Boolean reading of the only `(subject, predicate, *)` value.
///
/// An absent value reads as `false`.
///
/// # Errors
///
/// `TypeMismatch` when the value is not a literal, or is a literal that is
/// not a valid `xsd:boolean`.
pub fn boolean_value<S: TripleSource + ?Sized>(
    source: &S,
    subject: &Resource,
    predicate: &Iri,
) -> Result<bool> {
    match single_value(source, subject, predicate)? {
        None => Ok(false),
        Some(Value::Literal(lit)) => lit.boolean_value().map_err(|e| {
            EvalError::type_mismatch(format!(
                "Value for {} must be of datatype xsd:boolean: {}",
                predicate, subject
            ))
            .with_source(e)
        }),
        Some(other) => Err(EvalError::type_mismatch(format!(
            "Non-literal value for {}: {} ({} {})",
            predicate,
            subject,
            other.kind_name(),
            other
        ))),
    }
}

/// Resource members of the collection rooted at `subject`; literal members
/// are skipped
pub fn list_resources<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: &Resource,
) -> BoxIteration<'a, Resource> {
    list(source, subject)
        .filter_with(Value::is_resource)
        .convert_with(|v| Resource::try_from(v))
        .boxed()
}

/// IRI subjects of `(*, predicate, object)`; blank-node subjects are skipped
pub fn subject_iris<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    predicate: Option<&Iri>,
    object: Option<&Value>,
) -> Result<BoxIteration<'a, Iri>> {
    let pattern = Pattern::new(None, predicate.cloned(), object.cloned());
    Ok(source
        .get_statements(&pattern)?
        .filter_with(|stmt| stmt.subject().as_iri().is_some())
        .convert_with(|stmt| Iri::try_from(stmt.into_subject()))
        .boxed())
}

/// Resource objects of `(subject, predicate, *)`
pub fn object_resources<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: Option<&Resource>,
    predicate: Option<&Iri>,
) -> Result<BoxIteration<'a, Resource>> {
    objects_where(source, subject, predicate, Value::is_resource, |v| {
        Resource::try_from(v)
    })
}

/// IRI objects of `(subject, predicate, *)`
pub fn object_iris<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: Option<&Resource>,
    predicate: Option<&Iri>,
) -> Result<BoxIteration<'a, Iri>> {
    objects_where(
        source,
        subject,
        predicate,
        |v| v.as_iri().is_some(),
        |v| Iri::try_from(v),
    )
}

/// Literal objects of `(subject, predicate, *)`
pub fn object_literals<'a, S: TripleSource + ?Sized>(
    source: &'a S,
    subject: Option<&Resource>,
    predicate: Option<&Iri>,
) -> Result<BoxIteration<'a, Literal>> {
    objects_where(
        source,
        subject,
        predicate,
        |v| v.as_literal().is_some(),
        |v| Literal::try_from(v),
    )
}

/// Objects of `(subject, predicate, *)` of the kind picked by `keep`,
/// narrowed by `narrow`
fn objects_where<'a, S, T, K, N>(
    source: &'a S,
    subject: Option<&Resource>,
    predicate: Option<&Iri>,
    mut keep: K,
    mut narrow: N,
) -> Result<BoxIteration<'a, T>>
where
    S: TripleSource + ?Sized,
    T: 'a,
    K: FnMut(&Value) -> bool + 'a,
    N: FnMut(Value) -> Result<T> + 'a,
{
    let pattern = Pattern::new(subject.cloned(), predicate.cloned(), None);
    Ok(source
        .get_statements(&pattern)?
        .filter_with(move |stmt| keep(stmt.object()))
        .convert_with(move |stmt| narrow(stmt.into_object()))
        .boxed())
}
