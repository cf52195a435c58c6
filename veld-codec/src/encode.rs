//! Record → triples encoder
//!
//! Encoding walks the schema's properties in declaration order and emits
//! triples for every field the record actually carries. A missing field
//! emits nothing (that is how a partial update says "leave this alone"); a
//! field holding the explicit null emits a single placeholder triple whose
//! object is a freshly minted variable, which the update compiler turns into
//! a delete-pattern.
//!
//! Blank-node and variable counters are scoped to one [`Encoder`]. The
//! update compiler reuses a single encoder across a whole batch so
//! placeholder variables never collide between entities; plain inserts use
//! the [`encode`] convenience wrapper, which builds a fresh encoder per
//! call.

use crate::error::{CodecError, Result};
use crate::native::value_to_term;
use std::sync::Arc;
use veld_graph_ir::{Record, Term, Triple, Value};
use veld_schema::{Property, Schema};
use veld_vocab::{rdf, veld};

/// Encoder configuration
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// Language tag attached to plain-string literals when set
    pub language: Option<Arc<str>>,
}

/// Stateful record encoder
///
/// Holds the blank-node and placeholder-variable counters; both are
/// monotone for the encoder's lifetime and never shared across encoders.
pub struct Encoder {
    opts: EncodeOptions,
    blank_counter: usize,
    var_counter: usize,
}

impl Encoder {
    /// Create an encoder with the given options
    pub fn new(opts: EncodeOptions) -> Self {
        Self {
            opts,
            blank_counter: 0,
            var_counter: 0,
        }
    }

    /// Encode one record against a schema
    ///
    /// The root node gets a `veld:Resource` marker triple so that a graph
    /// built from the output round-trips through the decoder; nested
    /// records do not (they are reached by recursion, not root selection).
    pub fn encode(&mut self, record: &Record, schema: &Schema) -> Result<Vec<Triple>> {
        let mut out = Vec::new();
        let node = self.node_term(record);
        out.push(Triple::new(
            node.clone(),
            Term::iri(rdf::TYPE),
            Term::iri(veld::RESOURCE),
        ));
        self.encode_node(&mut out, node, record, schema)?;
        Ok(out)
    }

    fn node_term(&mut self, record: &Record) -> Term {
        match record.id() {
            Some(id) => match id.strip_prefix("_:") {
                Some(label) => Term::blank(label),
                None => Term::Iri(id.clone()),
            },
            None => self.mint_blank(),
        }
    }

    fn mint_blank(&mut self) -> Term {
        let term = Term::blank(format!("b{}", self.blank_counter));
        self.blank_counter += 1;
        term
    }

    fn mint_var(&mut self) -> Term {
        let term = Term::variable(format!("v{}", self.var_counter));
        self.var_counter += 1;
        term
    }

    fn encode_node(
        &mut self,
        out: &mut Vec<Triple>,
        node: Term,
        record: &Record,
        schema: &Schema,
    ) -> Result<()> {
        // One type triple per element of union($type, schema types);
        // duplicates collapse, record-asserted types come first.
        let mut types: Vec<&str> = record.types().iter().map(|t| t.as_ref()).collect();
        for t in schema.types() {
            if !types.contains(&t.as_ref()) {
                types.push(t.as_ref());
            }
        }
        for t in types {
            out.push(Triple::new(node.clone(), Term::iri(rdf::TYPE), Term::iri(t)));
        }

        for (name, property) in schema.properties() {
            let Some(value) = record.get(name) else {
                continue;
            };
            self.encode_property(out, &node, name, property, value)?;
        }
        Ok(())
    }

    fn encode_property(
        &mut self,
        out: &mut Vec<Triple>,
        node: &Term,
        name: &str,
        property: &Property,
        value: &Value,
    ) -> Result<()> {
        let predicate = Term::Iri(property.predicate.clone());

        // Explicit null: one placeholder triple with a fresh variable object
        if value.is_null() {
            let placeholder = self.mint_var();
            out.push(link(node, &predicate, placeholder, property.inverse));
            return Ok(());
        }

        if property.multilang {
            let Value::LangMap(map) = value else {
                return Err(CodecError::mismatch(
                    name,
                    "multilang property expects a language map",
                ));
            };
            for (tag, tagged) in map.iter() {
                for item in singleton(tagged) {
                    let Value::String(s) = item else {
                        return Err(CodecError::mismatch(
                            name,
                            "multilang values must be strings",
                        ));
                    };
                    let literal = if tag.is_empty() {
                        Term::string(s)
                    } else {
                        Term::lang_string(s, tag)
                    };
                    out.push(link(node, &predicate, literal, property.inverse));
                }
            }
            return Ok(());
        }

        for item in singleton(value) {
            match (&property.nested, item) {
                (Some(nested), Value::Resource(sub)) => {
                    let sub_node = self.node_term(sub);
                    out.push(link(node, &predicate, sub_node.clone(), property.inverse));
                    self.encode_node(out, sub_node, sub, nested)?;
                }
                // A bare IRI string under a nested property links without
                // descending - the referenced entity already exists.
                (Some(_), Value::String(iri)) => {
                    out.push(link(
                        node,
                        &predicate,
                        Term::Iri(iri.clone()),
                        property.inverse,
                    ));
                }
                (Some(_), other) => {
                    return Err(CodecError::mismatch(
                        name,
                        format!("nested property expects a record, got {other:?}"),
                    ));
                }
                (None, item) => {
                    let term = value_to_term(
                        name,
                        item,
                        &property.value_type,
                        self.opts.language.as_ref(),
                    )?;
                    out.push(link(node, &predicate, term, property.inverse));
                }
            }
        }
        Ok(())
    }
}

fn link(node: &Term, predicate: &Term, object: Term, inverse: bool) -> Triple {
    if inverse {
        Triple::new(object, predicate.clone(), node.clone())
    } else {
        Triple::new(node.clone(), predicate.clone(), object)
    }
}

fn singleton(value: &Value) -> &[Value] {
    match value {
        Value::List(items) => items,
        other => std::slice::from_ref(other),
    }
}

/// Encode a record with a fresh encoder
///
/// Blank-node identifiers are unique within this one call only.
pub fn encode(record: &Record, schema: &Schema, opts: EncodeOptions) -> Result<Vec<Triple>> {
    Encoder::new(opts).encode(record, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_graph_ir::LangMap;
    use veld_schema::{Datatype, Property};

    fn person_schema() -> Schema {
        Schema::new(["http://schema.org/Person"])
            .property("name", Property::literal("http://schema.org/name"))
            .property(
                "age",
                Property::typed("http://schema.org/age", Datatype::xsd_integer()).optional(),
            )
    }

    #[test]
    fn test_encode_basic_record() {
        let record = Record::with_id("http://example.org/alice")
            .field("name", "Alice")
            .field("age", 30i64);
        let triples = encode(&record, &person_schema(), EncodeOptions::default()).unwrap();

        // marker + type + two properties
        assert_eq!(triples.len(), 4);
        assert_eq!(triples[0].o, Term::iri(veld::RESOURCE));
        assert_eq!(triples[1].o, Term::iri("http://schema.org/Person"));
        assert_eq!(triples[2].o, Term::string("Alice"));
        assert_eq!(triples[3].o, Term::integer(30));
    }

    #[test]
    fn test_encode_missing_field_emits_nothing() {
        let record = Record::with_id("http://example.org/a").field("name", "A");
        let triples = encode(&record, &person_schema(), EncodeOptions::default()).unwrap();
        assert!(!triples
            .iter()
            .any(|t| t.p == Term::iri("http://schema.org/age")));
    }

    #[test]
    fn test_encode_null_mints_placeholder_variable() {
        let mut record = Record::with_id("http://example.org/a");
        record.set("age", Value::Null);
        let triples = encode(&record, &person_schema(), EncodeOptions::default()).unwrap();
        let placeholder = triples
            .iter()
            .find(|t| t.p == Term::iri("http://schema.org/age"))
            .unwrap();
        assert_eq!(placeholder.o, Term::variable("v0"));
    }

    #[test]
    fn test_encode_type_union_collapses_duplicates() {
        let mut record = Record::with_id("http://example.org/a");
        record.push_type("http://schema.org/Person");
        record.push_type("http://schema.org/Agent");
        record.set("name", Value::string("A"));
        let triples = encode(&record, &person_schema(), EncodeOptions::default()).unwrap();
        let type_objects: Vec<_> = triples
            .iter()
            .filter(|t| t.p == Term::iri(rdf::TYPE))
            .map(|t| t.o.as_iri().unwrap())
            .collect();
        assert_eq!(
            type_objects,
            [
                veld::RESOURCE,
                "http://schema.org/Person",
                "http://schema.org/Agent",
            ]
        );
    }

    #[test]
    fn test_encode_multilang_pairs() {
        let schema = Schema::new(["http://schema.org/Movie"]).property(
            "title",
            Property::literal("http://schema.org/name").multilang(),
        );
        let mut titles = LangMap::new();
        titles.set("", Value::string("untitled"));
        titles.set("en", Value::string("The Title"));
        let mut record = Record::with_id("http://example.org/m");
        record.set("title", Value::LangMap(titles));

        let triples = encode(&record, &schema, EncodeOptions::default()).unwrap();
        let objects: Vec<_> = triples
            .iter()
            .filter(|t| t.p == Term::iri("http://schema.org/name"))
            .map(|t| t.o.clone())
            .collect();
        assert_eq!(objects[0], Term::string("untitled"));
        assert_eq!(objects[1], Term::lang_string("The Title", "en"));
    }

    #[test]
    fn test_encode_nested_record_links_and_recurses() {
        let nested = Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", Property::literal("http://schema.org/name")),
        );
        let schema = Schema::new(["http://schema.org/Movie"])
            .property("director", Property::nested("http://schema.org/director", nested));

        let sub = Record::with_id("http://example.org/p").field("name", "Lynch");
        let mut record = Record::with_id("http://example.org/m");
        record.set("director", Value::Resource(Arc::new(sub)));

        let triples = encode(&record, &schema, EncodeOptions::default()).unwrap();
        assert!(triples.iter().any(|t| {
            t.s == Term::iri("http://example.org/m")
                && t.p == Term::iri("http://schema.org/director")
                && t.o == Term::iri("http://example.org/p")
        }));
        assert!(triples.iter().any(|t| {
            t.s == Term::iri("http://example.org/p") && t.o == Term::string("Lynch")
        }));
    }

    #[test]
    fn test_encode_nested_without_id_mints_blank() {
        let nested = Arc::new(
            Schema::new(["http://schema.org/Person"])
                .property("name", Property::literal("http://schema.org/name")),
        );
        let schema = Schema::new(["http://schema.org/Movie"])
            .property("director", Property::nested("http://schema.org/director", nested));

        let sub = Record::new().field("name", "Anon");
        let mut record = Record::with_id("http://example.org/m");
        record.set("director", Value::Resource(Arc::new(sub)));

        let triples = encode(&record, &schema, EncodeOptions::default()).unwrap();
        let linking = triples
            .iter()
            .find(|t| t.p == Term::iri("http://schema.org/director"))
            .unwrap();
        assert!(linking.o.is_blank());
    }

    #[test]
    fn test_encode_inverse_flips_direction() {
        let schema = Schema::new(["http://schema.org/Person"]).property(
            "directed",
            Property::reference("http://schema.org/director").inverse(),
        );
        let mut record = Record::with_id("http://example.org/p");
        record.set("directed", Value::string("http://example.org/m"));

        let triples = encode(&record, &schema, EncodeOptions::default()).unwrap();
        let edge = triples
            .iter()
            .find(|t| t.p == Term::iri("http://schema.org/director"))
            .unwrap();
        assert_eq!(edge.s, Term::iri("http://example.org/m"));
        assert_eq!(edge.o, Term::iri("http://example.org/p"));
    }

    #[test]
    fn test_encode_preferred_language() {
        let record = Record::with_id("http://example.org/a").field("name", "Alice");
        let opts = EncodeOptions {
            language: Some(Arc::from("en")),
        };
        let triples = encode(&record, &person_schema(), opts).unwrap();
        let name = triples
            .iter()
            .find(|t| t.p == Term::iri("http://schema.org/name"))
            .unwrap();
        assert_eq!(name.o, Term::lang_string("Alice", "en"));
    }
}
