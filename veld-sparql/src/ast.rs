//! Pattern fragments for generated query text
//!
//! The compiler works over an ordered sequence of pattern fragments rather
//! than a full query AST: every query shape is a string-template assembly of
//! one `WHERE`-style block plus shape-specific framing. Fragments nest for
//! `OPTIONAL` groups and the pagination sub-select.

use std::sync::Arc;
use veld_graph_ir::{Term, Triple};

/// One fragment of a group graph pattern
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// A triple pattern (terms may be variables)
    Triple(Triple),
    /// An `OPTIONAL { ... }` group
    Optional(Vec<Pattern>),
    /// A `FILTER (...)` clause holding a rendered boolean expression
    Filter(String),
    /// A `VALUES ?var { ... }` inline binding
    Values {
        /// Variable name (without `?`)
        var: Arc<str>,
        /// Bound terms
        terms: Vec<Term>,
    },
    /// A nested `{ SELECT DISTINCT ?var WHERE { ... } LIMIT/OFFSET }` group
    SubSelect {
        /// Projected variable name (without `?`)
        var: Arc<str>,
        /// The sub-select's own pattern block
        patterns: Vec<Pattern>,
        /// LIMIT, if bounded
        limit: Option<u64>,
        /// OFFSET, if shifted
        offset: Option<u64>,
    },
}

impl Pattern {
    /// A triple pattern from its three terms
    pub fn triple(s: Term, p: Term, o: Term) -> Self {
        Pattern::Triple(Triple::new(s, p, o))
    }
}
