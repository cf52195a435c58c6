//! Insertion-ordered RDF graph
//!
//! `Graph` is a subject → predicate → objects map that preserves encounter
//! order at every level. The decoder's first-match rules (language
//! preference, scalar-from-bucket selection) and stable array ordering
//! depend on that order, so the container never sorts or deduplicates.

use crate::{Term, Triple};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use veld_vocab::rdf;

/// One subject's predicate buckets, in encounter order
#[derive(Clone, Debug)]
pub struct Node {
    id: Arc<str>,
    predicates: Vec<(Arc<str>, Vec<Term>)>,
}

impl Node {
    /// The subject key (IRI, or `_:label` for blank nodes)
    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    /// Get the object bucket for a predicate
    pub fn objects(&self, predicate: &str) -> Option<&[Term]> {
        self.predicates
            .iter()
            .find(|(p, _)| p.as_ref() == predicate)
            .map(|(_, terms)| terms.as_slice())
    }

    /// Iterate over (predicate, objects) buckets in encounter order
    pub fn buckets(&self) -> impl Iterator<Item = (&Arc<str>, &[Term])> {
        self.predicates.iter().map(|(p, t)| (p, t.as_slice()))
    }

    /// All `rdf:type` objects on this node, in encounter order
    pub fn types(&self) -> &[Term] {
        self.objects(rdf::TYPE).unwrap_or(&[])
    }

    fn push(&mut self, predicate: Arc<str>, object: Term) {
        match self
            .predicates
            .iter()
            .position(|(p, _)| p.as_ref() == predicate.as_ref())
        {
            Some(idx) => self.predicates[idx].1.push(object),
            None => self.predicates.push((predicate, vec![object])),
        }
    }
}

/// An insertion-ordered collection of RDF statements, grouped by subject
///
/// Named-graph components are flattened away on ingest: the decoder operates
/// on the union graph.
///
/// # Example
///
/// ```
/// use veld_graph_ir::{Graph, Term};
///
/// let mut graph = Graph::new();
/// graph.insert(
///     Term::iri("http://example.org/alice"),
///     Term::iri("http://xmlns.com/foaf/0.1/name"),
///     Term::string("Alice"),
/// );
///
/// let node = graph.node("http://example.org/alice").unwrap();
/// assert_eq!(node.objects("http://xmlns.com/foaf/0.1/name").unwrap().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: FxHashMap<Arc<str>, usize>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement
    ///
    /// The subject must be an IRI or blank node; statements with other
    /// subject kinds are ignored (variables never occur in engine results).
    pub fn insert(&mut self, subject: Term, predicate: Term, object: Term) {
        let Some(key) = subject.subject_key() else {
            return;
        };
        let Term::Iri(pred) = predicate else {
            return;
        };
        let idx = match self.index.get(&key).copied() {
            Some(idx) => idx,
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Node {
                    id: key.clone(),
                    predicates: Vec::new(),
                });
                self.index.insert(key, idx);
                idx
            }
        };
        self.nodes[idx].push(pred, object);
    }

    /// Add a triple
    pub fn insert_triple(&mut self, triple: Triple) {
        self.insert(triple.s, triple.p, triple.o);
    }

    /// Build a graph from triples, preserving encounter order
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Graph::new();
        for t in triples {
            graph.insert_triple(t);
        }
        graph
    }

    /// Number of subjects
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no subjects
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a subject's node by key
    pub fn node(&self, subject: &str) -> Option<&Node> {
        self.index.get(subject).map(|&idx| &self.nodes[idx])
    }

    /// Iterate over subjects in encounter order
    pub fn subjects(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Get the object bucket for (subject, predicate)
    pub fn objects(&self, subject: &str, predicate: &str) -> Option<&[Term]> {
        self.node(subject).and_then(|n| n.objects(predicate))
    }

    /// Find subjects holding (subject, predicate, object), in encounter order
    ///
    /// This is the lookup direction used for inverse properties: the caller
    /// knows the object and wants every subject pointing at it.
    pub fn subjects_with_object(&self, predicate: &str, object: &Term) -> Vec<&Arc<str>> {
        self.nodes
            .iter()
            .filter(|n| {
                n.objects(predicate)
                    .is_some_and(|terms| terms.contains(object))
            })
            .map(|n| &n.id)
            .collect()
    }

    /// Iterate over all statements in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Arc<str>, &Term)> {
        self.nodes.iter().flat_map(|n| {
            n.predicates
                .iter()
                .flat_map(move |(p, terms)| terms.iter().map(move |t| (&n.id, p, t)))
        })
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph::from_triples(iter)
    }
}
