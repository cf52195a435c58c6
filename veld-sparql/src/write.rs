//! Deterministic SPARQL text rendering
//!
//! Two-space indentation, one fragment per line, IRIs always expanded in
//! angle brackets. Literal lexical forms are escaped per the SPARQL string
//! grammar.

use crate::ast::Pattern;
use std::fmt::Write as _;
use veld_graph_ir::Term;

/// Render a term in SPARQL surface syntax
pub fn format_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{iri}>"),
        Term::BlankNode(id) => id.to_string(),
        Term::Variable(name) => format!("?{name}"),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let mut out = format!("\"{}\"", escape_literal(&value.lexical()));
            if let Some(lang) = language {
                let _ = write!(out, "@{lang}");
            } else if !datatype.is_xsd_string() {
                let _ = write!(out, "^^<{}>", datatype.as_iri());
            }
            out
        }
    }
}

/// Escape a literal lexical form for inclusion in quoted SPARQL text
pub(crate) fn escape_literal(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Render a pattern block, one fragment per line, at the given indent depth
pub fn write_patterns(patterns: &[Pattern], depth: usize) -> String {
    let mut out = String::new();
    for pattern in patterns {
        write_pattern(&mut out, pattern, depth);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_pattern(out: &mut String, pattern: &Pattern, depth: usize) {
    match pattern {
        Pattern::Triple(t) => {
            indent(out, depth);
            let _ = writeln!(
                out,
                "{} {} {} .",
                format_term(&t.s),
                format_term(&t.p),
                format_term(&t.o)
            );
        }
        Pattern::Optional(inner) => {
            indent(out, depth);
            out.push_str("OPTIONAL {\n");
            for p in inner {
                write_pattern(out, p, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        Pattern::Filter(expr) => {
            indent(out, depth);
            let _ = writeln!(out, "FILTER ({expr})");
        }
        Pattern::Values { var, terms } => {
            indent(out, depth);
            let rendered: Vec<String> = terms.iter().map(format_term).collect();
            let _ = writeln!(out, "VALUES ?{var} {{ {} }}", rendered.join(" "));
        }
        Pattern::SubSelect {
            var,
            patterns,
            limit,
            offset,
        } => {
            indent(out, depth);
            out.push_str("{\n");
            indent(out, depth + 1);
            let _ = writeln!(out, "SELECT DISTINCT ?{var} WHERE {{");
            for p in patterns {
                write_pattern(out, p, depth + 2);
            }
            indent(out, depth + 1);
            out.push_str("}\n");
            if let Some(limit) = limit {
                indent(out, depth + 1);
                let _ = writeln!(out, "LIMIT {limit}");
            }
            if let Some(offset) = offset {
                indent(out, depth + 1);
                let _ = writeln!(out, "OFFSET {offset}");
            }
            indent(out, depth);
            out.push_str("}\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_graph_ir::Triple;

    #[test]
    fn test_format_term_escaping() {
        let term = Term::string("say \"hi\"\nback\\slash");
        assert_eq!(format_term(&term), "\"say \\\"hi\\\"\\nback\\\\slash\"");
    }

    #[test]
    fn test_format_term_kinds() {
        assert_eq!(format_term(&Term::variable("iri_0")), "?iri_0");
        assert_eq!(format_term(&Term::blank("b0")), "_:b0");
        assert_eq!(
            format_term(&Term::lang_string("chat", "fr")),
            "\"chat\"@fr"
        );
        assert_eq!(
            format_term(&Term::integer(5)),
            "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_write_optional_group() {
        let patterns = vec![Pattern::Optional(vec![Pattern::Triple(Triple::new(
            Term::variable("iri"),
            Term::iri("http://example.org/p"),
            Term::variable("iri_0"),
        ))])];
        assert_eq!(
            write_patterns(&patterns, 1),
            "  OPTIONAL {\n    ?iri <http://example.org/p> ?iri_0 .\n  }\n"
        );
    }

    #[test]
    fn test_write_subselect() {
        let patterns = vec![Pattern::SubSelect {
            var: "iri".into(),
            patterns: vec![Pattern::Triple(Triple::new(
                Term::variable("iri"),
                Term::iri("http://example.org/p"),
                Term::variable("iri_0"),
            ))],
            limit: Some(10),
            offset: Some(20),
        }];
        let text = write_patterns(&patterns, 1);
        assert!(text.contains("SELECT DISTINCT ?iri WHERE {"));
        assert!(text.contains("LIMIT 10"));
        assert!(text.contains("OFFSET 20"));
    }
}
