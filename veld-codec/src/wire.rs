//! RDF/JSON wire-format reader
//!
//! Interprets the nested `{ subject: { predicate: [termObj, …] } }` content
//! type (optionally with a leading named-graph level) through the generic
//! [`TreeFlattener`](crate::TreeFlattener). Term objects carry a `"type"`
//! discriminator (`"uri"` / `"literal"` / `"bnode"`), a `"value"`, and
//! optional `"lang"` / `"datatype"` fields.
//!
//! This is the sole decoding path for this content type; other serialization
//! formats are handled by format-specific parsers outside this crate.

use crate::error::{CodecError, Result};
use crate::flatten::TreeFlattener;
use crate::native::literal_term;
use serde_json::Value as JsonValue;
use veld_graph_ir::{Graph, Quad, Term};
use veld_vocab::keyword;

/// Read a wire payload into quads, preserving document order
pub fn read_quads(root: &JsonValue) -> Result<Vec<Quad>> {
    if !root.is_object() {
        return Err(CodecError::wire("payload root must be a JSON object"));
    }
    let mut quads = Vec::new();
    for (path, leaf) in TreeFlattener::new(root) {
        let (graph, subject, predicate) = match path.as_slice() {
            [subject, predicate] => (None, *subject, *predicate),
            [graph, subject, predicate] => {
                let graph = (*graph != keyword::DEFAULT_GRAPH).then(|| *graph);
                (graph, *subject, *predicate)
            }
            _ => {
                return Err(CodecError::wire(format!(
                    "unexpected nesting depth {} at {:?}",
                    path.len(),
                    path
                )))
            }
        };
        let quad = Quad {
            triple: veld_graph_ir::Triple::new(
                subject_term(subject),
                Term::iri(predicate),
                object_term(leaf)?,
            ),
            graph: graph.map(Into::into),
        };
        quads.push(quad);
    }
    Ok(quads)
}

/// Read a wire payload into a graph (named graphs merged into the union)
pub fn read_graph(root: &JsonValue) -> Result<Graph> {
    Ok(Graph::from_triples(
        read_quads(root)?.into_iter().map(|q| q.triple),
    ))
}

fn subject_term(key: &str) -> Term {
    match key.strip_prefix("_:") {
        Some(label) => Term::blank(label),
        None => Term::iri(key),
    }
}

fn object_term(leaf: &JsonValue) -> Result<Term> {
    let JsonValue::Object(map) = leaf else {
        return Err(CodecError::wire(format!(
            "term object must be a JSON object, got {leaf}"
        )));
    };
    let kind = map
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| CodecError::wire("term object lacks a \"type\" discriminator"))?;
    let value = map
        .get("value")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| CodecError::wire("term object lacks a string \"value\""))?;

    match kind {
        "uri" => Ok(Term::iri(value)),
        "bnode" => Ok(subject_term(value)),
        "literal" => {
            let lang = map.get("lang").and_then(JsonValue::as_str);
            let datatype = map.get("datatype").and_then(JsonValue::as_str);
            Ok(literal_term(value, datatype, lang))
        }
        other => Err(CodecError::wire(format!("unknown term kind \"{other}\""))),
    }
}
