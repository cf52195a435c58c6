//! The five query shapes
//!
//! Each function assembles shape-walker output (plus search patterns where
//! applicable) into final query text. Pagination follows the two-phase
//! strategy: a naive LIMIT on the full shape caps at fact-combination
//! granularity (one row per optional/array binding), so entity selection
//! happens in an inner `SELECT DISTINCT` over the required-only pattern set
//! and the outer CONSTRUCT rebuilds the full shape for just those entities.

use crate::ast::Pattern;
use crate::error::{Result, SparqlError};
use crate::pattern::{shape_patterns, PatternFlags};
use crate::search::compile_search;
use crate::write::write_patterns;
use serde_json::Value as JsonValue;
use veld_codec::{EncodeOptions, Encoder};
use veld_graph_ir::{Record, Term, Triple};
use veld_schema::Schema;
use veld_vocab::{rdf, veld};

/// Pagination window for entity-granular fetches
#[derive(Clone, Copy, Debug, Default)]
pub struct Page {
    /// Maximum number of entities to return
    pub take: Option<u64>,
    /// Number of entities to skip
    pub skip: Option<u64>,
}

fn root_var() -> Term {
    Term::variable("iri")
}

fn marker_triple(root: &Term) -> Pattern {
    Pattern::Triple(Triple::new(
        root.clone(),
        Term::iri(rdf::TYPE),
        Term::iri(veld::RESOURCE),
    ))
}

/// The construct template: marker triple plus the full unwrapped shape
fn construct_template(schema: &Schema, root: &Term) -> Vec<Pattern> {
    let mut template = vec![marker_triple(root)];
    template.extend(shape_patterns(
        schema,
        root,
        "iri",
        PatternFlags {
            include_optional: true,
            wrap_optional: false,
            omit_root_type_assertions: false,
        },
    ));
    template
}

/// A shape with only optional properties still has to bind the root
fn ensure_bound(patterns: &mut Vec<Pattern>, root: &Term) {
    if patterns.is_empty() {
        patterns.push(Pattern::triple(
            root.clone(),
            Term::variable("iri_p"),
            Term::variable("iri_o"),
        ));
    }
}

/// Required-only entity-selection patterns, plus search filters
fn selection_patterns(
    schema: &Schema,
    root: &Term,
    search: Option<&JsonValue>,
) -> Result<Vec<Pattern>> {
    let mut patterns = shape_patterns(schema, root, "iri", PatternFlags::default());
    if let Some(spec) = search {
        patterns.extend(compile_search(schema, root, "iri", spec)?);
    }
    ensure_bound(&mut patterns, root);
    Ok(patterns)
}

/// Boolean existence check for one subject against the required shape
pub fn compile_ask(schema: &Schema, id: &str) -> String {
    let root = Term::iri(id);
    let mut patterns = shape_patterns(schema, &root, "iri", PatternFlags::default());
    ensure_bound(&mut patterns, &root);
    format!("ASK {{\n{}}}\n", write_patterns(&patterns, 1))
}

/// Entity count over the required shape and optional search filters
pub fn compile_count(schema: &Schema, search: Option<&JsonValue>) -> Result<String> {
    let root = root_var();
    let patterns = selection_patterns(schema, &root, search)?;
    Ok(format!(
        "SELECT (COUNT(DISTINCT ?iri) AS ?count)\nWHERE {{\n{}}}\n",
        write_patterns(&patterns, 1)
    ))
}

/// Paginated construct-by-filter fetch
///
/// The inner sub-select applies LIMIT/OFFSET at entity granularity; the
/// outer WHERE restricts its root variable to that result set and adds the
/// optional branches back (root type assertions are already implied by the
/// sub-select, so the outer shape omits them).
pub fn compile_find(schema: &Schema, search: Option<&JsonValue>, page: Page) -> Result<String> {
    let root = root_var();
    let inner = selection_patterns(schema, &root, search)?;

    let mut where_patterns = vec![Pattern::SubSelect {
        var: "iri".into(),
        patterns: inner,
        limit: page.take,
        offset: page.skip,
    }];
    where_patterns.extend(shape_patterns(
        schema,
        &root,
        "iri",
        PatternFlags {
            include_optional: true,
            wrap_optional: true,
            omit_root_type_assertions: true,
        },
    ));

    Ok(format!(
        "CONSTRUCT {{\n{}}}\nWHERE {{\n{}}}\n",
        write_patterns(&construct_template(schema, &root), 1),
        write_patterns(&where_patterns, 1)
    ))
}

/// Construct fetch for an explicit identifier list, no pagination
pub fn compile_by_ids<S: AsRef<str>>(schema: &Schema, ids: &[S]) -> String {
    let root = root_var();
    let mut where_patterns = vec![Pattern::Values {
        var: "iri".into(),
        terms: ids.iter().map(|id| Term::iri(id.as_ref())).collect(),
    }];
    where_patterns.extend(shape_patterns(
        schema,
        &root,
        "iri",
        PatternFlags {
            include_optional: true,
            wrap_optional: true,
            omit_root_type_assertions: false,
        },
    ));

    format!(
        "CONSTRUCT {{\n{}}}\nWHERE {{\n{}}}\n",
        write_patterns(&construct_template(schema, &root), 1),
        write_patterns(&where_patterns, 1)
    )
}

/// Ground insert of fully encoded records
///
/// One encoder serves the whole batch so minted blank-node labels stay
/// distinct across records. Records carrying explicit nulls cannot be
/// inserted - a null is an update-only placeholder.
pub fn compile_insert(
    schema: &Schema,
    records: &[Record],
    opts: EncodeOptions,
) -> Result<String> {
    let mut encoder = Encoder::new(opts);
    let mut patterns = Vec::new();
    for record in records {
        for triple in encoder.encode(record, schema)? {
            if triple.o.is_variable() {
                return Err(SparqlError::update(
                    "explicit null has no meaning in an insert",
                ));
            }
            patterns.push(Pattern::Triple(triple));
        }
    }
    Ok(format!(
        "INSERT DATA {{\n{}}}\n",
        write_patterns(&patterns, 1)
    ))
}

/// Remove every statement a subject holds
pub fn compile_delete(id: &str) -> String {
    format!("DELETE WHERE {{\n  <{id}> ?p ?o .\n}}\n")
}
