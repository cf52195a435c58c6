//! RDF term, graph, and record intermediate representation
//!
//! This crate provides the canonical types shared by the veld encoder,
//! decoder, and query compiler:
//!
//! - [`Term`] - the closed four-variant RDF term union (IRI, blank node,
//!   literal, variable). Every consumer matches exhaustively over it.
//! - [`Triple`] / [`Quad`] - statements, optionally carrying a named graph.
//! - [`Graph`] - an insertion-ordered subject → predicate → objects map.
//!   Decoding correctness (first-match language preference, stable array
//!   ordering) depends on encounter order, so the container never sorts.
//! - [`Value`] / [`Record`] - the dynamic record model produced by the
//!   decoder and consumed by the encoder. Nested resources are shared via
//!   `Arc` so intra-pass identity is observable.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form.
//! 2. **Explicit datatypes** - Literals always carry an explicit datatype.
//!    Plain strings use `xsd:string`, language-tagged strings use
//!    `rdf:langString`.
//! 3. **Insertion order is significant** - `Graph` preserves subject and
//!    object encounter order exactly as statements arrive.

mod datatype;
mod graph;
mod term;
mod triple;
mod value;

pub use datatype::Datatype;
pub use graph::{Graph, Node};
pub use term::{BlankId, LiteralValue, Term};
pub use triple::{Quad, Triple};
pub use value::{LangMap, Record, Value};
