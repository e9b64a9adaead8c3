//! Graph fixture builders

use triplestream::domain::vocab::rdf;
use triplestream::{Iri, Literal, Resource, Statement, Value};

pub fn iri(name: &str) -> Iri {
    Iri::new(format!("http://example.org/{name}"))
}

pub fn res(name: &str) -> Resource {
    Resource::Iri(iri(name))
}

pub fn val(name: &str) -> Value {
    Value::Iri(iri(name))
}

/// Statements encoding `members` as an RDF list whose nodes are blank nodes
/// `{prefix}0`, `{prefix}1`, ...; returns the head and the statements
pub fn fixture_list(prefix: &str, members: &[Value]) -> (Resource, Vec<Statement>) {
    if members.is_empty() {
        return (rdf::nil(), Vec::new());
    }
    let nodes: Vec<Resource> = (0..members.len())
        .map(|i| Resource::blank(format!("{prefix}{i}")))
        .collect();
    let mut statements = Vec::new();
    for (i, member) in members.iter().enumerate() {
        let next = nodes.get(i + 1).cloned().unwrap_or_else(rdf::nil);
        statements.push(Statement::new(nodes[i].clone(), rdf::first(), member.clone()));
        statements.push(Statement::new(nodes[i].clone(), rdf::rest(), next));
    }
    (nodes[0].clone(), statements)
}

/// One IRI, one literal and one blank-node object for `(subject, predicate)`
pub fn fixture_mixed_objects(subject: &Resource, predicate: &Iri) -> Vec<Statement> {
    vec![
        Statement::new(subject.clone(), predicate.clone(), val("target")),
        Statement::new(subject.clone(), predicate.clone(), Literal::simple("text")),
        Statement::new(subject.clone(), predicate.clone(), Value::blank("anon")),
    ]
}
