//! Graph → records decoder
//!
//! Decoding walks every root subject (those typed `veld:Resource`) against
//! the schema, resolving each property's term bucket in declaration order.
//! Within one pass, decoding the same `(schema, subject)` pair twice returns
//! the identical `Arc<Record>` instance - diamond-shaped references come out
//! shared, and the caller can detect that sharing with `Arc::ptr_eq`.
//!
//! Cyclic data cannot send the decoder into unbounded recursion: schemas
//! are immutable trees (a nested schema is constructed before its parent,
//! so no schema can reach itself), and recursion depth is bounded by schema
//! nesting depth regardless of loops in the graph.

use crate::error::{CodecError, Result};
use crate::native::term_to_value;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use veld_graph_ir::{Graph, LangMap, Record, Term, Value};
use veld_schema::{Property, Schema};
use veld_vocab::veld;

/// Decoder configuration
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Preferred language for plain scalar properties
    pub language: Option<Arc<str>>,
}

/// Decode every root subject of a graph against a schema
///
/// Roots are subjects whose type bucket carries the `veld:Resource` marker;
/// results come back in subject encounter order. The memoization cache lives
/// and dies with this one call.
pub fn decode(graph: &Graph, schema: &Arc<Schema>, opts: DecodeOptions) -> Result<Vec<Arc<Record>>> {
    let mut decoder = Decoder {
        graph,
        opts,
        cache: FxHashMap::default(),
    };
    let mut records = Vec::new();
    for node in graph.subjects() {
        let is_root = node
            .types()
            .iter()
            .any(|t| t.as_iri() == Some(veld::RESOURCE));
        if is_root {
            records.push(decoder.decode_node(node.id(), schema)?);
        }
    }
    tracing::debug!(subjects = graph.len(), roots = records.len(), "decoded graph");
    Ok(records)
}

type CacheKey = (usize, Arc<str>);

struct Decoder<'g> {
    graph: &'g Graph,
    opts: DecodeOptions,
    cache: FxHashMap<CacheKey, Arc<Record>>,
}

fn cache_key(schema: &Arc<Schema>, subject: &Arc<str>) -> CacheKey {
    (Arc::as_ptr(schema) as usize, subject.clone())
}

fn subject_term(subject: &str) -> Term {
    match subject.strip_prefix("_:") {
        Some(label) => Term::blank(label),
        None => Term::iri(subject),
    }
}

impl<'g> Decoder<'g> {
    fn decode_node(&mut self, subject: &Arc<str>, schema: &Arc<Schema>) -> Result<Arc<Record>> {
        let key = cache_key(schema, subject);
        if let Some(record) = self.cache.get(&key) {
            return Ok(record.clone());
        }

        let mut record = self.reference_record(subject);
        for (name, property) in schema.properties() {
            let owned;
            let bucket = if property.inverse {
                let object = subject_term(subject);
                let subjects = self
                    .graph
                    .subjects_with_object(&property.predicate, &object);
                if subjects.is_empty() {
                    None
                } else {
                    owned = subjects
                        .into_iter()
                        .map(|s| subject_term(s))
                        .collect::<Vec<_>>();
                    Some(owned.as_slice())
                }
            } else {
                self.graph.objects(subject, &property.predicate)
            };
            let value = self.decode_bucket(name, property, bucket, subject)?;
            record.set(name.clone(), value);
        }

        let record = Arc::new(record);
        self.cache.insert(key, record.clone());
        Ok(record)
    }

    /// An id/type-only record for a subject (marker type excluded)
    fn reference_record(&self, subject: &Arc<str>) -> Record {
        let mut record = Record::with_id(subject);
        if let Some(node) = self.graph.node(subject) {
            for t in node.types() {
                if let Some(iri) = t.as_iri() {
                    if iri != veld::RESOURCE {
                        record.push_type(iri);
                    }
                }
            }
        }
        record
    }

    fn decode_bucket(
        &mut self,
        name: &str,
        property: &Property,
        bucket: Option<&[Term]>,
        subject: &Arc<str>,
    ) -> Result<Value> {
        let Some(terms) = bucket.filter(|t| !t.is_empty()) else {
            if !property.optional {
                return Err(CodecError::MissingRequiredProperty {
                    property: name.to_string(),
                    subject: subject.to_string(),
                });
            }
            return Ok(if property.multilang {
                Value::LangMap(LangMap::new())
            } else if property.array {
                Value::List(Vec::new())
            } else {
                Value::Null
            });
        };

        if property.multilang {
            return self.decode_multilang(name, property, terms);
        }

        match (&property.nested, property.array) {
            (Some(nested), true) => {
                let mut items = Vec::with_capacity(terms.len());
                for term in terms {
                    let sub = term.subject_key().ok_or_else(|| {
                        CodecError::mismatch(name, format!("expected a resource, got {term}"))
                    })?;
                    items.push(Value::Resource(self.decode_node(&sub, nested)?));
                }
                Ok(Value::List(items))
            }
            (Some(nested), false) => {
                // First IRI/blank term in bucket order wins
                let sub = terms.iter().find_map(Term::subject_key).ok_or_else(|| {
                    CodecError::mismatch(name, "no resource term in bucket")
                })?;
                Ok(Value::Resource(self.decode_node(&sub, nested)?))
            }
            (None, true) => {
                let mut items = Vec::with_capacity(terms.len());
                for term in terms {
                    items.push(term_to_value(term).ok_or_else(|| {
                        CodecError::mismatch(name, format!("unexpected term {term}"))
                    })?);
                }
                Ok(Value::List(items))
            }
            (None, false) => {
                let preferred = self.opts.language.as_ref().and_then(|lang| {
                    terms.iter().find(|t| {
                        t.as_literal()
                            .is_some_and(|(_, _, l)| l == Some(lang.as_ref()))
                    })
                });
                let term = match preferred {
                    Some(term) => term,
                    None => terms
                        .iter()
                        .find(|t| t.is_literal() || t.is_iri())
                        .ok_or_else(|| {
                            CodecError::mismatch(name, "no literal or named node in bucket")
                        })?,
                };
                term_to_value(term)
                    .ok_or_else(|| CodecError::mismatch(name, format!("unexpected term {term}")))
            }
        }
    }

    fn decode_multilang(&self, name: &str, property: &Property, terms: &[Term]) -> Result<Value> {
        let mut groups: Vec<(&str, Vec<Value>)> = Vec::new();
        for term in terms {
            let Some((value, _, language)) = term.as_literal() else {
                return Err(CodecError::mismatch(
                    name,
                    format!("multilang bucket holds a non-literal term {term}"),
                ));
            };
            let tag = language.unwrap_or("");
            let native = Value::string(value.lexical());
            match groups.iter().position(|(t, _)| *t == tag) {
                Some(idx) => groups[idx].1.push(native),
                None => groups.push((tag, vec![native])),
            }
        }

        let mut map = LangMap::new();
        for (tag, values) in groups {
            if property.array {
                map.set(tag, Value::List(values));
            } else if let Some(first) = values.into_iter().next() {
                // First literal per tag wins for scalar multilang
                map.set(tag, first);
            }
        }
        Ok(Value::LangMap(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_schema::Datatype;
    use veld_vocab::rdf;

    fn mark(graph: &mut Graph, subject: &str) {
        graph.insert(
            Term::iri(subject),
            Term::iri(rdf::TYPE),
            Term::iri(veld::RESOURCE),
        );
    }

    fn person_schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", veld_schema::Property::literal("http://schema.org/name"))
                .property(
                    "age",
                    veld_schema::Property::typed(
                        "http://schema.org/age",
                        Datatype::xsd_integer(),
                    )
                    .optional(),
                )
                .property(
                    "nick",
                    veld_schema::Property::literal("http://schema.org/alternateName")
                        .optional()
                        .array(),
                ),
        )
    }

    #[test]
    fn test_decode_basic() {
        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/alice");
        graph.insert(
            Term::iri("http://example.org/alice"),
            Term::iri(rdf::TYPE),
            Term::iri("http://schema.org/Person"),
        );
        graph.insert(
            Term::iri("http://example.org/alice"),
            Term::iri("http://schema.org/name"),
            Term::string("Alice"),
        );

        let records = decode(&graph, &person_schema(), DecodeOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.id().unwrap().as_ref(), "http://example.org/alice");
        // Marker type is stripped from $type
        assert_eq!(rec.types(), &[Arc::<str>::from("http://schema.org/Person")]);
        assert_eq!(rec.get("name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(rec.get("age"), Some(&Value::Null));
        assert_eq!(rec.get("nick"), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn test_decode_unmarked_subject_is_not_a_root() {
        let mut graph = Graph::new();
        graph.insert(
            Term::iri("http://example.org/alice"),
            Term::iri("http://schema.org/name"),
            Term::string("Alice"),
        );
        let records = decode(&graph, &person_schema(), DecodeOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_decode_missing_required_fails() {
        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/alice");
        graph.insert(
            Term::iri("http://example.org/alice"),
            Term::iri("http://schema.org/age"),
            Term::integer(30),
        );
        let err = decode(&graph, &person_schema(), DecodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingRequiredProperty { ref property, .. } if property == "name"
        ));
    }

    #[test]
    fn test_decode_multilang_scalar_and_array() {
        let pred = "http://schema.org/name";
        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/m");
        for term in [
            Term::lang_string("first-en", "en"),
            Term::lang_string("second-en", "en"),
            Term::lang_string("jp-title", "jp"),
            Term::string("untagged"),
        ] {
            graph.insert(Term::iri("http://example.org/m"), Term::iri(pred), term);
        }

        let scalar_schema = Arc::new(
            Schema::new(["http://schema.org/Movie"])
                .property("title", veld_schema::Property::literal(pred).multilang()),
        );
        let records = decode(&graph, &scalar_schema, DecodeOptions::default()).unwrap();
        let map = records[0].get("title").unwrap().as_lang_map().unwrap();
        assert_eq!(map.get("en").and_then(Value::as_str), Some("first-en"));
        assert_eq!(map.get("jp").and_then(Value::as_str), Some("jp-title"));
        assert_eq!(map.get("").and_then(Value::as_str), Some("untagged"));

        let array_schema = Arc::new(
            Schema::new(["http://schema.org/Movie"]).property(
                "title",
                veld_schema::Property::literal(pred).multilang().array(),
            ),
        );
        let records = decode(&graph, &array_schema, DecodeOptions::default()).unwrap();
        let map = records[0].get("title").unwrap().as_lang_map().unwrap();
        assert_eq!(
            map.get("en"),
            Some(&Value::List(vec![
                Value::string("first-en"),
                Value::string("second-en"),
            ]))
        );
        assert_eq!(
            map.get(""),
            Some(&Value::List(vec![Value::string("untagged")]))
        );
    }

    #[test]
    fn test_decode_shared_nested_is_identical_instance() {
        let nested = Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", veld_schema::Property::literal("http://schema.org/name")),
        );
        let schema = Arc::new(
            Schema::new(["http://schema.org/Movie"]).property(
                "director",
                veld_schema::Property::nested("http://schema.org/director", nested),
            ),
        );

        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/m1");
        mark(&mut graph, "http://example.org/m2");
        for movie in ["http://example.org/m1", "http://example.org/m2"] {
            graph.insert(
                Term::iri(movie),
                Term::iri("http://schema.org/director"),
                Term::iri("http://example.org/lynch"),
            );
        }
        graph.insert(
            Term::iri("http://example.org/lynch"),
            Term::iri("http://schema.org/name"),
            Term::string("Lynch"),
        );

        let records = decode(&graph, &schema, DecodeOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        let d1 = records[0].get("director").unwrap().as_resource().unwrap();
        let d2 = records[1].get("director").unwrap().as_resource().unwrap();
        assert!(Arc::ptr_eq(d1, d2));
    }

    #[test]
    fn test_decode_cyclic_data_terminates() {
        // p knows q and q knows p. Schema nesting depth bounds recursion:
        // the inner schema has no "knows", so the loop never re-enters.
        let inner = Schema::new(["http://schema.org/Person"])
            .property("name", veld_schema::Property::literal("http://schema.org/name"));
        let nested = Arc::new(inner.clone());
        let schema = Arc::new(inner.property(
            "knows",
            veld_schema::Property::nested("http://schema.org/knows", nested).optional(),
        ));

        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/p");
        graph.insert(
            Term::iri("http://example.org/p"),
            Term::iri("http://schema.org/name"),
            Term::string("P"),
        );
        graph.insert(
            Term::iri("http://example.org/p"),
            Term::iri("http://schema.org/knows"),
            Term::iri("http://example.org/q"),
        );
        graph.insert(
            Term::iri("http://example.org/q"),
            Term::iri("http://schema.org/name"),
            Term::string("Q"),
        );
        graph.insert(
            Term::iri("http://example.org/q"),
            Term::iri("http://schema.org/knows"),
            Term::iri("http://example.org/p"),
        );

        let records = decode(&graph, &schema, DecodeOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        let q = records[0].get("knows").unwrap().as_resource().unwrap();
        assert_eq!(q.get("name").and_then(Value::as_str), Some("Q"));
    }

    #[test]
    fn test_decode_inverse_property() {
        let schema = Arc::new(
            Schema::new(["http://schema.org/Person"]).property(
                "directed",
                veld_schema::Property::reference("http://schema.org/director")
                    .inverse()
                    .array()
                    .optional(),
            ),
        );
        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/lynch");
        graph.insert(
            Term::iri("http://example.org/m1"),
            Term::iri("http://schema.org/director"),
            Term::iri("http://example.org/lynch"),
        );
        graph.insert(
            Term::iri("http://example.org/m2"),
            Term::iri("http://schema.org/director"),
            Term::iri("http://example.org/lynch"),
        );

        let records = decode(&graph, &schema, DecodeOptions::default()).unwrap();
        assert_eq!(
            records[0].get("directed"),
            Some(&Value::List(vec![
                Value::string("http://example.org/m1"),
                Value::string("http://example.org/m2"),
            ]))
        );
    }

    #[test]
    fn test_decode_preferred_language() {
        let mut graph = Graph::new();
        mark(&mut graph, "http://example.org/a");
        graph.insert(
            Term::iri("http://example.org/a"),
            Term::iri("http://schema.org/name"),
            Term::lang_string("Alicia", "es"),
        );
        graph.insert(
            Term::iri("http://example.org/a"),
            Term::iri("http://schema.org/name"),
            Term::lang_string("Alice", "en"),
        );

        let schema = Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", veld_schema::Property::literal("http://schema.org/name")),
        );
        let opts = DecodeOptions {
            language: Some(Arc::from("en")),
        };
        let records = decode(&graph, &schema, opts).unwrap();
        assert_eq!(records[0].get("name").and_then(Value::as_str), Some("Alice"));

        // Without a preferred language the first literal wins
        let records = decode(&graph, &schema, DecodeOptions::default()).unwrap();
        assert_eq!(
            records[0].get("name").and_then(Value::as_str),
            Some("Alicia")
        );
    }
}
