//! Vocabulary terms used by the evaluation layer

pub mod rdf {
    use crate::domain::model::{Iri, Resource};

    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    pub fn first() -> Iri {
        Iri::new(FIRST)
    }

    pub fn rest() -> Iri {
        Iri::new(REST)
    }

    /// Empty-list sentinel
    pub fn nil() -> Resource {
        Resource::iri(NIL)
    }

    pub fn lang_string() -> Iri {
        Iri::new(LANG_STRING)
    }
}

pub mod xsd {
    use crate::domain::model::Iri;

    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    pub fn boolean() -> Iri {
        Iri::new(BOOLEAN)
    }

    pub fn string() -> Iri {
        Iri::new(STRING)
    }
}
