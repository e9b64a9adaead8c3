//! Error types for triplestream

use std::fmt;
use thiserror::Error;

/// Evaluation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store or I/O failure while matching a pattern or traversing results
    Evaluation,
    /// A lookup expected at most one match and found more
    CardinalityViolation,
    /// RDF collection with a missing or ill-typed `rdf:first` / `rdf:rest`
    MalformedList,
    /// Value is not of the kind an operation requires
    TypeMismatch,
    /// Operation on a closed or exhausted iteration
    IllegalState,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Evaluation => "evaluation",
            ErrorKind::CardinalityViolation => "cardinality_violation",
            ErrorKind::MalformedList => "malformed_list",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::IllegalState => "illegal_state",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluation error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct EvalError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Evaluation, message)
    }

    pub fn cardinality(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CardinalityViolation, message)
    }

    pub fn malformed_list(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedList, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState, message)
    }

    /// Error for `has_next` / `next` on a closed iteration
    pub fn closed() -> Self {
        Self::illegal_state("Iteration is closed")
    }

    /// Error for `next` when no element remains
    pub fn exhausted() -> Self {
        Self::illegal_state("No more elements in iteration")
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for EvalError {
    fn from(err: rusqlite::Error) -> Self {
        EvalError::evaluation(format!("SQLite error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = EvalError::cardinality("Multiple statements for pattern: <urn:s> <urn:p> *");
        let msg = format!("{}", err);
        assert!(msg.starts_with("[cardinality_violation]"));
        assert!(msg.contains("<urn:s>"));
    }

    #[test]
    fn test_evaluation_error() {
        let err = EvalError::evaluation("cursor lost");
        assert_eq!(err.kind, ErrorKind::Evaluation);
        assert_eq!(err.message, "cursor lost");
        assert!(err.source.is_none());
        assert_eq!(format!("{}", err), "[evaluation] cursor lost");
    }

    #[test]
    fn test_closed_and_exhausted_are_illegal_state() {
        assert!(EvalError::closed().is(ErrorKind::IllegalState));
        assert!(EvalError::exhausted().is(ErrorKind::IllegalState));
        assert_ne!(EvalError::closed().message, EvalError::exhausted().message);
    }

    #[test]
    fn test_with_source() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::TimedOut, "store query timed out");
        let err = EvalError::evaluation("pattern query failed").with_source(io_err);

        assert_eq!(err.kind, ErrorKind::Evaluation);
        let source = err.source().unwrap();
        assert!(source.to_string().contains("timed out"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Evaluation.as_str(), "evaluation");
        assert_eq!(
            ErrorKind::CardinalityViolation.as_str(),
            "cardinality_violation"
        );
        assert_eq!(ErrorKind::MalformedList.as_str(), "malformed_list");
        assert_eq!(ErrorKind::TypeMismatch.as_str(), "type_mismatch");
        assert_eq!(ErrorKind::IllegalState.as_str(), "illegal_state");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_from_rusqlite_error() {
        let err: EvalError = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(err.kind, ErrorKind::Evaluation);
        assert!(err.message.contains("SQLite error"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(EvalError::malformed_list("List missing rdf:first: _:b0"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedList);
    }
}
