//! Domain layer: RDF data model and the TripleSource port
//!
//! # Domain Models
//!
//! - `Value`: IRI, blank node or literal
//! - `Resource`: the subject-capable subset (IRI, blank node)
//! - `Statement`: immutable (subject, predicate, object, context?) fact
//! - `Pattern`: wildcard query descriptor, input to `TripleSource`
//!
//! # Port Trait
//!
//! - `TripleSource`: answers pattern queries with a lazy statement iteration

mod model;
mod triple_source;
pub mod vocab;

pub use model::{BlankNode, Iri, Literal, Pattern, Resource, Statement, Value};
pub use triple_source::TripleSource;
