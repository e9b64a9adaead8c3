//! RDF terms and statements
//!
//! Equality is structural everywhere: same IRI string, same blank-node id,
//! same literal lexical form + datatype + language tag. Blank-node ids are
//! only meaningful within the source that produced them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vocab::{rdf, xsd};
use crate::error::{EvalError, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Terms
// ═══════════════════════════════════════════════════════════════════════════

/// Globally scoped identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Source-scoped identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankNode(String);

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Typed scalar value
///
/// Every construction path, deserialization included, goes through
/// [`Literal::from_parts`], so the language tag is always lowercase and an
/// empty tag never survives.
///
/// # Examples
///
/// ```rust
/// use triplestream::domain::Literal;
///
/// let lit = Literal::from_bool(true);
/// assert_eq!(lit.lexical(), "true");
/// assert!(lit.boolean_value().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LiteralParts")]
pub struct Literal {
    lexical: String,
    datatype: Iri,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// Wire shape of a literal before canonicalization
#[derive(Deserialize)]
struct LiteralParts {
    lexical: String,
    datatype: Iri,
    #[serde(default)]
    language: Option<String>,
}

impl From<LiteralParts> for Literal {
    fn from(parts: LiteralParts) -> Self {
        Literal::from_parts(parts.lexical, parts.datatype, parts.language)
    }
}

impl Literal {
    /// Canonical literal from its three components.
    ///
    /// A non-empty tag is lowercased and forces `rdf:langString`. An empty
    /// tag is dropped; without a tag `rdf:langString` falls back to
    /// `xsd:string`.
    pub fn from_parts(
        lexical: impl Into<String>,
        datatype: Iri,
        language: Option<String>,
    ) -> Self {
        let language = language
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_ascii_lowercase());
        let datatype = match &language {
            Some(_) => rdf::lang_string(),
            None if datatype == rdf::lang_string() => xsd::string(),
            None => datatype,
        };
        Self {
            lexical: lexical.into(),
            datatype,
            language,
        }
    }

    /// Literal with an explicit datatype
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self::from_parts(lexical, datatype, None)
    }

    /// Plain `xsd:string` literal
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, xsd::string())
    }

    /// `rdf:langString` literal; an empty tag yields a plain `xsd:string`
    pub fn language_tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self::from_parts(lexical, rdf::lang_string(), Some(language.into()))
    }

    /// Canonical `xsd:boolean` literal
    pub fn from_bool(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, xsd::boolean())
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Parse this literal as `xsd:boolean`.
    ///
    /// Accepts `true`, `false`, `1` and `0` after collapsing surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the datatype is not `xsd:boolean` or the lexical
    /// form is outside the boolean grammar.
    pub fn boolean_value(&self) -> Result<bool> {
        if self.datatype != xsd::boolean() {
            return Err(EvalError::type_mismatch(format!(
                "Literal {} is not of datatype {}",
                self,
                xsd::boolean()
            )));
        }
        match self.lexical.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r')) {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(EvalError::type_mismatch(format!(
                "Invalid {} lexical form: \"{}\"",
                xsd::boolean(),
                other
            ))),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")?;
        match &self.language {
            Some(lang) => write!(f, "@{}", lang),
            None if self.datatype == xsd::string() => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

/// Subject-capable term: IRI or blank node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Iri(Iri),
    BlankNode(BlankNode),
}

impl Resource {
    pub fn iri(iri: impl Into<String>) -> Self {
        Resource::Iri(Iri::new(iri))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Resource::BlankNode(BlankNode::new(id))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Resource::Iri(iri) => Some(iri),
            Resource::BlankNode(_) => None,
        }
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Resource::BlankNode(_))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => iri.fmt(f),
            Resource::BlankNode(node) => node.fmt(f),
        }
    }
}

impl From<Iri> for Resource {
    fn from(iri: Iri) -> Self {
        Resource::Iri(iri)
    }
}

impl From<BlankNode> for Resource {
    fn from(node: BlankNode) -> Self {
        Resource::BlankNode(node)
    }
}

/// Any RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Iri(Iri),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Value {
    pub fn iri(iri: impl Into<String>) -> Self {
        Value::Iri(Iri::new(iri))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Value::BlankNode(BlankNode::new(id))
    }

    pub fn is_resource(&self) -> bool {
        !matches!(self, Value::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Value::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Narrow to a `Resource` without consuming
    pub fn as_resource(&self) -> Option<Resource> {
        match self {
            Value::Iri(iri) => Some(Resource::Iri(iri.clone())),
            Value::BlankNode(node) => Some(Resource::BlankNode(node.clone())),
            Value::Literal(_) => None,
        }
    }

    /// Short name of the term kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Iri(_) => "IRI",
            Value::BlankNode(_) => "blank node",
            Value::Literal(_) => "literal",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri(iri) => iri.fmt(f),
            Value::BlankNode(node) => node.fmt(f),
            Value::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Iri(iri) => Value::Iri(iri),
            Resource::BlankNode(node) => Value::BlankNode(node),
        }
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Iri(iri)
    }
}

impl From<BlankNode> for Value {
    fn from(node: BlankNode) -> Self {
        Value::BlankNode(node)
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Value::Literal(lit)
    }
}

impl TryFrom<Value> for Resource {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Iri(iri) => Ok(Resource::Iri(iri)),
            Value::BlankNode(node) => Ok(Resource::BlankNode(node)),
            Value::Literal(lit) => Err(EvalError::type_mismatch(format!(
                "Expected a resource, found literal {}",
                lit
            ))),
        }
    }
}

impl TryFrom<Value> for Iri {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Iri(iri) => Ok(iri),
            other => Err(EvalError::type_mismatch(format!(
                "Expected an IRI, found {} {}",
                other.kind_name(),
                other
            ))),
        }
    }
}

impl TryFrom<Value> for Literal {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Literal(lit) => Ok(lit),
            other => Err(EvalError::type_mismatch(format!(
                "Expected a literal, found {} {}",
                other.kind_name(),
                other
            ))),
        }
    }
}

impl TryFrom<Resource> for Iri {
    type Error = EvalError;

    fn try_from(resource: Resource) -> Result<Self> {
        match resource {
            Resource::Iri(iri) => Ok(iri),
            Resource::BlankNode(node) => Err(EvalError::type_mismatch(format!(
                "Expected an IRI, found blank node {}",
                node
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements & Patterns
// ═══════════════════════════════════════════════════════════════════════════

/// Immutable (subject, predicate, object, context?) fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    subject: Resource,
    predicate: Iri,
    object: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Resource>,
}

impl Statement {
    /// Statement in the default graph
    pub fn new(subject: impl Into<Resource>, predicate: Iri, object: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            context: None,
        }
    }

    /// Statement tagged with a named context
    pub fn in_context(
        subject: impl Into<Resource>,
        predicate: Iri,
        object: impl Into<Value>,
        context: impl Into<Resource>,
    ) -> Self {
        Self {
            context: Some(context.into()),
            ..Self::new(subject, predicate, object)
        }
    }

    pub fn subject(&self) -> &Resource {
        &self.subject
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    pub fn object(&self) -> &Value {
        &self.object
    }

    pub fn context(&self) -> Option<&Resource> {
        self.context.as_ref()
    }

    pub fn into_subject(self) -> Resource {
        self.subject
    }

    pub fn into_object(self) -> Value {
        self.object
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(ctx) = &self.context {
            write!(f, " {}", ctx)?;
        }
        write!(f, " .")
    }
}

/// Pattern query descriptor
///
/// `None` components are wildcards. An empty `contexts` list matches every
/// context including the default graph; otherwise a statement matches when
/// its context equals one of the entries, where a `None` entry stands for the
/// default graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub subject: Option<Resource>,
    pub predicate: Option<Iri>,
    pub object: Option<Value>,
    pub contexts: Vec<Option<Resource>>,
}

impl Pattern {
    pub fn new(subject: Option<Resource>, predicate: Option<Iri>, object: Option<Value>) -> Self {
        Self {
            subject,
            predicate,
            object,
            contexts: Vec::new(),
        }
    }

    /// Pattern matching everything
    pub fn any() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: Resource) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn predicate(mut self, predicate: Iri) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn object(mut self, object: Value) -> Self {
        self.object = Some(object);
        self
    }

    /// Restrict to the given contexts (`None` = default graph)
    pub fn contexts(mut self, contexts: impl IntoIterator<Item = Option<Resource>>) -> Self {
        self.contexts = contexts.into_iter().collect();
        self
    }

    pub fn matches(&self, stmt: &Statement) -> bool {
        self.subject.as_ref().map_or(true, |s| s == stmt.subject())
            && self.predicate.as_ref().map_or(true, |p| p == stmt.predicate())
            && self.object.as_ref().map_or(true, |o| o == stmt.object())
            && (self.contexts.is_empty() || self.contexts.iter().any(|c| c.as_ref() == stmt.context()))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(s) => write!(f, "{}", s)?,
            None => write!(f, "*")?,
        }
        match &self.predicate {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " *")?,
        }
        match &self.object {
            Some(o) => write!(f, " {}", o)?,
            None => write!(f, " *")?,
        }
        if !self.contexts.is_empty() {
            let ctxs: Vec<String> = self
                .contexts
                .iter()
                .map(|c| c.as_ref().map_or_else(|| "DEFAULT".to_string(), |r| r.to_string()))
                .collect();
            write!(f, " [{}]", ctxs.join(", "))?;
        }
        Ok(())
    }
}
