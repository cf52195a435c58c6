//! Shape-directed SPARQL text compiler
//!
//! Turns a [`Schema`](veld_schema::Schema) (plus optional search, pagination,
//! and update parameters) into query text for the five operation shapes the
//! mapper needs: boolean ask, select-with-pagination, construct-by-filter,
//! construct-by-identifier-list, and combined delete/insert/where updates.
//!
//! One flag-parameterized recursive shape walker
//! ([`shape_patterns`]) underlies all of them; the individual query shapes
//! are string-template assemblies of its output. Generated text is a
//! deterministic function of schema declaration order, flags, and
//! parameters, which keeps it golden-testable.

mod ast;
mod compile;
mod error;
mod pattern;
mod search;
mod update;
mod write;

pub use ast::Pattern;
pub use compile::{
    compile_ask, compile_by_ids, compile_count, compile_delete, compile_find, compile_insert,
    Page,
};
pub use error::{Result, SparqlError};
pub use pattern::{shape_patterns, PatternFlags};
pub use search::compile_search;
pub use update::compile_update;
pub use write::{format_term, write_patterns};
