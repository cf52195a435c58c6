//! High-level entry point for the veld data mapper
//!
//! A [`Lens`] binds a schema to a [`QueryEngine`] implementation and exposes
//! entity-granular operations: `find`, `find_by_id`, `count`, `exists`,
//! `insert`, `update`, `delete`. The lens compiles query text, hands it to
//! the engine, and decodes construct results back into records; it holds no
//! state beyond its configuration, so one lens can serve any number of
//! calls.
//!
//! The engine is the only asynchronous and fallible-by-I/O collaborator;
//! everything else in the workspace is synchronous and pure.

mod engine;
mod error;
mod lens;

pub use engine::{Bindings, EngineContext, EngineError, QueryEngine};
pub use error::{ApiError, Result};
pub use lens::{Lens, LensOptions};

pub use veld_graph_ir::{Graph, Record, Term, Value};
pub use veld_schema::{expand, Property, Schema};
pub use veld_sparql::Page;
