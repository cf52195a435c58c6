//! The query-engine capability boundary
//!
//! Everything veld needs from the outside world is four operations over
//! SPARQL text. Transports (HTTP endpoints, embedded stores, federations)
//! implement [`QueryEngine`]; the [`EngineContext`] travels with every call
//! and is opaque to the core - it names the data sources and carries any
//! transport-specific options.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use veld_graph_ir::{Graph, Term};

/// Engine-side failure
///
/// The core never retries or downgrades these; they propagate to the caller
/// unchanged.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request could not be executed (transport failure, engine error)
    #[error("Engine request failed: {message}")]
    Request { message: String },

    /// The engine answered with something the caller cannot interpret
    #[error("Malformed engine response: {message}")]
    Response { message: String },
}

impl EngineError {
    /// A request-side failure
    pub fn request(message: impl Into<String>) -> Self {
        EngineError::Request {
            message: message.into(),
        }
    }

    /// A response-interpretation failure
    pub fn response(message: impl Into<String>) -> Self {
        EngineError::Response {
            message: message.into(),
        }
    }
}

/// Opaque per-call context handed through to the engine
#[derive(Clone, Debug, Default)]
pub struct EngineContext {
    /// Data sources to query (endpoint URLs, graph names, ...)
    pub sources: Vec<Arc<str>>,
    /// Transport overrides; `Null` when unused
    pub options: JsonValue,
}

impl EngineContext {
    /// A context over one data source
    pub fn source(source: impl AsRef<str>) -> Self {
        Self {
            sources: vec![Arc::from(source.as_ref())],
            options: JsonValue::Null,
        }
    }
}

/// One select solution: an ordered variable → term map
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings(Vec<(Arc<str>, Term)>);

impl Bindings {
    /// Create an empty solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable (replacing any previous binding)
    pub fn set(&mut self, var: impl AsRef<str>, term: Term) {
        match self.0.iter().position(|(v, _)| v.as_ref() == var.as_ref()) {
            Some(idx) => self.0[idx].1 = term,
            None => self.0.push((Arc::from(var.as_ref()), term)),
        }
    }

    /// Look up a variable's bound term
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.0
            .iter()
            .find(|(v, _)| v.as_ref() == var)
            .map(|(_, t)| t)
    }

    /// Iterate over bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Term)> {
        self.0.iter().map(|(v, t)| (v, t))
    }
}

/// The external query-execution collaborator
///
/// Implementations are expected to be cheap to share (`&self` methods); the
/// core makes no ordering assumptions beyond "one request completes before
/// its result is decoded".
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Execute a boolean ASK query
    async fn ask(&self, sparql: &str, ctx: &EngineContext) -> Result<bool, EngineError>;

    /// Execute a SELECT query, returning one solution per row
    async fn select(
        &self,
        sparql: &str,
        ctx: &EngineContext,
    ) -> Result<Vec<Bindings>, EngineError>;

    /// Execute a CONSTRUCT query, returning the built graph
    async fn construct(&self, sparql: &str, ctx: &EngineContext) -> Result<Graph, EngineError>;

    /// Execute an update; no structured result is expected
    async fn update(&self, sparql: &str, ctx: &EngineContext) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_replace_and_order() {
        let mut b = Bindings::new();
        b.set("count", Term::integer(1));
        b.set("iri", Term::iri("http://example.org/a"));
        b.set("count", Term::integer(2));

        assert_eq!(b.get("count"), Some(&Term::integer(2)));
        let vars: Vec<_> = b.iter().map(|(v, _)| v.as_ref()).collect();
        assert_eq!(vars, ["count", "iri"]);
    }
}
