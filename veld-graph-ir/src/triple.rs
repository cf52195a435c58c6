//! Triple and quad statement types

use crate::Term;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An RDF statement: (subject, predicate, object)
///
/// The subject should be an IRI, blank node, or variable; the predicate an
/// IRI. This is not enforced structurally - producers uphold it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term
    pub s: Term,
    /// Predicate term (always an IRI)
    pub p: Term,
    /// Object term
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

/// A triple with an optional named-graph component
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    /// The statement
    pub triple: Triple,
    /// Named graph IRI, or None for the default graph
    pub graph: Option<Arc<str>>,
}

impl Quad {
    /// Create a quad in the default graph
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self {
            triple: Triple::new(s, p, o),
            graph: None,
        }
    }

    /// Create a quad in a named graph
    pub fn in_graph(s: Term, p: Term, o: Term, graph: impl AsRef<str>) -> Self {
        Self {
            triple: Triple::new(s, p, o),
            graph: Some(Arc::from(graph.as_ref())),
        }
    }
}

impl From<Triple> for Quad {
    fn from(triple: Triple) -> Self {
        Self {
            triple,
            graph: None,
        }
    }
}
