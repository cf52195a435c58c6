//! Bidirectional conversion between RDF graphs and typed records
//!
//! This crate carries the data-plane half of veld:
//!
//! - [`encode`] turns a record into an ordered triple sequence honoring a
//!   schema (partial records express partial updates).
//! - [`decode`] turns a graph into records, memoizing per `(schema, subject)`
//!   within one pass so shared and cyclic structure decodes to shared
//!   instances.
//! - [`TreeFlattener`] walks an arbitrarily nested mapping-of-arrays as a
//!   lazy `(path, leaf)` sequence; [`wire`] builds on it to read the
//!   RDF/JSON content type into a [`Graph`](veld_graph_ir::Graph).
//!
//! Everything here is synchronous and free of I/O; the only state is the
//! per-call decode cache and the encoder's identifier counters.

mod decode;
mod encode;
mod error;
mod flatten;
mod input;
mod native;
pub mod wire;

pub use decode::{decode, DecodeOptions};
pub use encode::{encode, EncodeOptions, Encoder};
pub use error::{CodecError, Result};
pub use flatten::TreeFlattener;
pub use input::{record_from_json, value_from_json};
pub use native::{literal_term, term_to_value, value_to_term};
