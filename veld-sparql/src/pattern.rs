//! Flag-parameterized shape walker
//!
//! One recursive function generates the triple patterns for a schema's
//! shape; the five query shapes call it with different flag combinations.
//! Variable names are a pure function of property declaration order and
//! nesting path (`iri`, `iri_0`, `iri_0_2`, ...), which keeps generated
//! query text stable.

use crate::ast::Pattern;
use veld_graph_ir::{Term, Triple};
use veld_schema::Schema;
use veld_vocab::rdf;

/// Walker switches
///
/// `omit_root_type_assertions` applies to the outermost level only; nested
/// shapes always assert their types.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternFlags {
    /// Emit patterns for optional properties
    pub include_optional: bool,
    /// Wrap each optional property's patterns in an `OPTIONAL` group
    pub wrap_optional: bool,
    /// Skip the root level's type-assertion patterns
    pub omit_root_type_assertions: bool,
}

/// Generate the pattern sequence for a schema's shape
///
/// `root` is the term standing for the entity (a variable for searches, a
/// concrete IRI for existence checks); `prefix` seeds derived variable
/// names and is `"iri"` at the root.
pub fn shape_patterns(
    schema: &Schema,
    root: &Term,
    prefix: &str,
    flags: PatternFlags,
) -> Vec<Pattern> {
    let mut out = Vec::new();

    if !flags.omit_root_type_assertions {
        for t in schema.types() {
            out.push(Pattern::Triple(Triple::new(
                root.clone(),
                Term::iri(rdf::TYPE),
                Term::Iri(t.clone()),
            )));
        }
    }

    let nested_flags = PatternFlags {
        omit_root_type_assertions: false,
        ..flags
    };

    for (idx, (_, property)) in schema.properties().enumerate() {
        if property.optional && !flags.include_optional {
            continue;
        }

        let var_name = format!("{prefix}_{idx}");
        let var = Term::variable(&var_name);
        let edge = if property.inverse {
            Triple::new(var.clone(), Term::Iri(property.predicate.clone()), root.clone())
        } else {
            Triple::new(root.clone(), Term::Iri(property.predicate.clone()), var.clone())
        };

        let mut branch = vec![Pattern::Triple(edge)];
        if let Some(nested) = &property.nested {
            branch.extend(shape_patterns(nested, &var, &var_name, nested_flags));
        }

        if property.optional && flags.wrap_optional {
            out.push(Pattern::Optional(branch));
        } else {
            out.extend(branch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::write_patterns;
    use std::sync::Arc;
    use veld_schema::Property;

    fn movie_schema() -> Schema {
        let person = Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", Property::literal("http://schema.org/name")),
        );
        Schema::new(["http://schema.org/Movie"])
            .property("title", Property::literal("http://schema.org/name"))
            .property(
                "rating",
                Property::literal("http://schema.org/rating").optional(),
            )
            .property(
                "director",
                Property::nested("http://schema.org/director", person),
            )
    }

    #[test]
    fn test_variable_names_follow_declaration_order() {
        let schema = movie_schema();
        let patterns = shape_patterns(
            &schema,
            &Term::variable("iri"),
            "iri",
            PatternFlags {
                include_optional: true,
                wrap_optional: false,
                omit_root_type_assertions: false,
            },
        );
        let text = write_patterns(&patterns, 0);
        assert!(text.contains("?iri <http://schema.org/name> ?iri_0 ."));
        assert!(text.contains("?iri <http://schema.org/rating> ?iri_1 ."));
        assert!(text.contains("?iri <http://schema.org/director> ?iri_2 ."));
        // Nested property variables extend the parent's path
        assert!(text.contains("?iri_2 <http://schema.org/name> ?iri_2_0 ."));
        // Nested type assertion always present
        assert!(text.contains("?iri_2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> ."));
    }

    #[test]
    fn test_required_only_excludes_optional() {
        let schema = movie_schema();
        let patterns = shape_patterns(
            &schema,
            &Term::variable("iri"),
            "iri",
            PatternFlags::default(),
        );
        let text = write_patterns(&patterns, 0);
        assert!(!text.contains("rating"));
        assert!(text.contains("?iri <http://schema.org/name> ?iri_0 ."));
    }

    #[test]
    fn test_optional_wrapping() {
        let schema = movie_schema();
        let patterns = shape_patterns(
            &schema,
            &Term::variable("iri"),
            "iri",
            PatternFlags {
                include_optional: true,
                wrap_optional: true,
                omit_root_type_assertions: false,
            },
        );
        let text = write_patterns(&patterns, 0);
        assert!(text.contains("OPTIONAL {\n  ?iri <http://schema.org/rating> ?iri_1 .\n}"));
    }

    #[test]
    fn test_deterministic_output() {
        let schema = movie_schema();
        let flags = PatternFlags {
            include_optional: true,
            wrap_optional: true,
            omit_root_type_assertions: false,
        };
        let a = write_patterns(
            &shape_patterns(&schema, &Term::variable("iri"), "iri", flags),
            0,
        );
        let b = write_patterns(
            &shape_patterns(&schema, &Term::variable("iri"), "iri", flags),
            0,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverse_flips_edge() {
        let schema = Schema::new(["http://schema.org/Person"]).property(
            "directed",
            Property::reference("http://schema.org/director").inverse(),
        );
        let patterns = shape_patterns(
            &schema,
            &Term::variable("iri"),
            "iri",
            PatternFlags::default(),
        );
        let text = write_patterns(&patterns, 0);
        assert!(text.contains("?iri_0 <http://schema.org/director> ?iri ."));
    }

    #[test]
    fn test_omit_root_type_assertions_is_shallow() {
        let schema = movie_schema();
        let patterns = shape_patterns(
            &schema,
            &Term::variable("iri"),
            "iri",
            PatternFlags {
                include_optional: true,
                wrap_optional: false,
                omit_root_type_assertions: true,
            },
        );
        let text = write_patterns(&patterns, 0);
        assert!(!text.contains("?iri <http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"));
        assert!(text.contains("?iri_2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"));
    }
}
