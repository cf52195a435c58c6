//! Declarative shape model for the veld data mapper
//!
//! A [`Schema`] describes the shape of an entity: the RDF types it must
//! carry and the properties it exposes, each with a predicate IRI and
//! optional/array/multilang/inverse flags or a nested sub-shape. Schemas are
//! constructed once - either programmatically or by [`expand`]ing a JSON
//! prototype - and are immutable afterwards. Everything downstream (encoder,
//! decoder, query compiler) consumes them by shared reference, and property
//! declaration order is significant: it seeds generated variable names.

mod error;
mod expand;
mod model;

pub use error::{Result, SchemaError};
pub use expand::expand;
pub use model::{Property, Schema, ValueType};

// Re-exported for convenience: Property::typed takes a datatype.
pub use veld_graph_ir::Datatype;
