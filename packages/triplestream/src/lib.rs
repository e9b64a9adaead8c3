//! triplestream - Lazy evaluation substrate over triple-pattern stores
//!
//! ## Core Principles
//!
//! 1. **Pull, don't materialize**: results stream through [`Iteration`]s
//! 2. **Always release**: whoever holds an iteration closes it; decorators
//!    close what they wrap, exactly once
//! 3. **Fail loudly**: a second match for a single-valued lookup is an error,
//!    never a silent pick
//!
//! ## Layers
//!
//! - `domain`: RDF terms, statements, patterns, the `TripleSource` port
//! - `iteration`: the iteration contract, filter / converting decorators
//! - `statements`: graph utilities (single, boolean_value, list, projections)
//! - `infrastructure`: memory and SQLite triple sources
//! - `config`: YAML configuration
//!
//! ## Usage
//!
//! ```rust
//! use triplestream::domain::{vocab::rdf, Iri, Resource, Statement, Value};
//! use triplestream::infrastructure::MemoryTripleSource;
//! use triplestream::iteration::IterationExt;
//! use triplestream::statements;
//!
//! let source = MemoryTripleSource::new();
//! let head = Resource::blank("l0");
//! let tail = Resource::blank("l1");
//! source.add(Statement::new(head.clone(), rdf::first(), Value::iri("urn:a")));
//! source.add(Statement::new(head.clone(), rdf::rest(), tail.clone()));
//! source.add(Statement::new(tail.clone(), rdf::first(), Value::iri("urn:b")));
//! source.add(Statement::new(tail, rdf::rest(), rdf::nil()));
//!
//! let members = statements::list(&source, &head).collect_vec()?;
//! assert_eq!(members, vec![Value::iri("urn:a"), Value::iri("urn:b")]);
//! # Ok::<(), triplestream::EvalError>(())
//! ```
//!
//! [`Iteration`]: iteration::Iteration

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod iteration;
pub mod statements;

pub use error::{ErrorKind, EvalError, Result};

// Domain re-exports
pub use domain::{BlankNode, Iri, Literal, Pattern, Resource, Statement, TripleSource, Value};
pub use iteration::{BoxIteration, Iteration, IterationExt};
