//! Update-statement compilation
//!
//! Each partial entity compiles to DELETE/INSERT/WHERE contributions:
//!
//! - a non-array property deletes its current value through a placeholder
//!   pattern (re-encoding `{ $id, prop: null }`), matched in WHERE - wrapped
//!   `OPTIONAL` when the property is optional, so clearing a never-set field
//!   does not fail the statement - and inserts the new value unless the
//!   payload was an explicit null (a pure clear);
//! - an array property accepts a bare list or `{"$set": [...]}` (placeholder
//!   delete of the whole bucket, insert of the full new list) or
//!   `{"$add": [...], "$remove": [...]}` (exact-value deletes and inserts,
//!   no WHERE precondition).
//!
//! One encoder serves the whole batch, so placeholder variables stay unique
//! across entities; sharing one would let the engine cross-bind unrelated
//! deletions.

use crate::ast::Pattern;
use crate::error::{Result, SparqlError};
use crate::write::write_patterns;
use serde_json::Value as JsonValue;
use veld_codec::{value_from_json, EncodeOptions, Encoder};
use veld_graph_ir::{Record, Term, Triple, Value};
use veld_schema::{Property, Schema};
use veld_vocab::{keyword, rdf};

/// Compile a batch of partial entities into one update statement
pub fn compile_update(
    schema: &Schema,
    entities: &[JsonValue],
    opts: EncodeOptions,
) -> Result<String> {
    let mut compiler = UpdateCompiler {
        schema,
        encoder: Encoder::new(opts),
        deletes: Vec::new(),
        inserts: Vec::new(),
        wheres: Vec::new(),
    };
    for entity in entities {
        compiler.entity(entity)?;
    }
    tracing::debug!(entities = entities.len(), "compiled update statement");
    Ok(compiler.render())
}

struct UpdateCompiler<'s> {
    schema: &'s Schema,
    encoder: Encoder,
    deletes: Vec<Pattern>,
    inserts: Vec<Pattern>,
    wheres: Vec<Pattern>,
}

impl<'s> UpdateCompiler<'s> {
    fn entity(&mut self, entity: &JsonValue) -> Result<()> {
        let JsonValue::Object(map) = entity else {
            return Err(SparqlError::update(format!(
                "entity must be a JSON object, got {entity}"
            )));
        };
        let Some(id) = map.get(keyword::ID).and_then(JsonValue::as_str) else {
            return Err(SparqlError::update("entity lacks a string \"$id\""));
        };

        for (key, payload) in map {
            match key.as_str() {
                keyword::ID => {}
                keyword::TYPE => {
                    return Err(SparqlError::update("\"$type\" cannot be updated"));
                }
                name => {
                    let Some((_, property)) = self.schema.get(name) else {
                        return Err(SparqlError::update(format!(
                            "\"{name}\" names no schema property"
                        )));
                    };
                    if property.array && !property.multilang {
                        self.array_property(id, name, property, payload)?;
                    } else {
                        self.scalar_property(id, name, property, payload)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Non-array (or multilang) property: placeholder delete, optional-aware
    /// WHERE, insert of the new value unless this is a pure clear.
    fn scalar_property(
        &mut self,
        id: &str,
        name: &str,
        property: &Property,
        payload: &JsonValue,
    ) -> Result<()> {
        self.placeholder_delete(id, name, property)?;
        if !payload.is_null() {
            let value = value_from_json(name, payload, property)?;
            self.insert_value(id, name, value)?;
        }
        Ok(())
    }

    fn array_property(
        &mut self,
        id: &str,
        name: &str,
        property: &Property,
        payload: &JsonValue,
    ) -> Result<()> {
        match payload {
            // Bare list: replace the whole bucket
            JsonValue::Array(_) => {
                self.placeholder_delete(id, name, property)?;
                let value = value_from_json(name, payload, property)?;
                self.insert_value(id, name, value)?;
                Ok(())
            }
            JsonValue::Object(patch) => {
                for key in patch.keys() {
                    if !matches!(key.as_str(), "$set" | "$add" | "$remove") {
                        return Err(SparqlError::array_update(format!(
                            "\"{name}\": unknown key \"{key}\""
                        )));
                    }
                }
                if patch.contains_key("$set")
                    && (patch.contains_key("$add") || patch.contains_key("$remove"))
                {
                    return Err(SparqlError::array_update(format!(
                        "\"{name}\": $set cannot combine with $add/$remove"
                    )));
                }

                if let Some(set) = patch.get("$set") {
                    let items = patch_list(name, "$set", set, property)?;
                    self.placeholder_delete(id, name, property)?;
                    self.insert_value(id, name, Value::List(items))?;
                    return Ok(());
                }

                // Exact-value deletes and inserts, no extra WHERE
                if let Some(remove) = patch.get("$remove") {
                    let items = patch_list(name, "$remove", remove, property)?;
                    let triples = self.property_triples(id, name, Value::List(items))?;
                    self.deletes.extend(triples.into_iter().map(Pattern::Triple));
                }
                if let Some(add) = patch.get("$add") {
                    let items = patch_list(name, "$add", add, property)?;
                    let triples = self.property_triples(id, name, Value::List(items))?;
                    self.inserts.extend(triples.into_iter().map(Pattern::Triple));
                }
                Ok(())
            }
            other => Err(SparqlError::array_update(format!(
                "\"{name}\": expected a list or a $add/$set/$remove object, got {other}"
            ))),
        }
    }

    /// Delete the property's current binding through a placeholder variable
    fn placeholder_delete(&mut self, id: &str, name: &str, property: &Property) -> Result<()> {
        let triples = self.property_triples(id, name, Value::Null)?;
        for triple in triples {
            let pattern = Pattern::Triple(triple);
            self.deletes.push(pattern.clone());
            if property.optional {
                self.wheres.push(Pattern::Optional(vec![pattern]));
            } else {
                self.wheres.push(pattern);
            }
        }
        Ok(())
    }

    fn insert_value(&mut self, id: &str, name: &str, value: Value) -> Result<()> {
        let triples = self.property_triples(id, name, value)?;
        self.inserts.extend(triples.into_iter().map(Pattern::Triple));
        Ok(())
    }

    /// Re-encode `{ $id, name: value }` and keep only the property triples
    /// (the encoder's marker and type assertions have no place in an update)
    fn property_triples(&mut self, id: &str, name: &str, value: Value) -> Result<Vec<Triple>> {
        let mut record = Record::with_id(id);
        record.set(name, value);
        let triples = self.encoder.encode(&record, self.schema)?;
        Ok(triples
            .into_iter()
            .filter(|t| t.p != Term::iri(rdf::TYPE))
            .collect())
    }

    fn render(&self) -> String {
        let mut text = String::new();
        if !self.deletes.is_empty() {
            text.push_str(&format!("DELETE {{\n{}}}\n", write_patterns(&self.deletes, 1)));
        }
        if !self.inserts.is_empty() {
            text.push_str(&format!("INSERT {{\n{}}}\n", write_patterns(&self.inserts, 1)));
        }
        text.push_str(&format!("WHERE {{\n{}}}\n", write_patterns(&self.wheres, 1)));
        text
    }
}

fn patch_list(
    name: &str,
    key: &str,
    json: &JsonValue,
    property: &Property,
) -> Result<Vec<Value>> {
    let JsonValue::Array(items) = json else {
        return Err(SparqlError::array_update(format!(
            "\"{name}\": {key} expects a list"
        )));
    };
    items
        .iter()
        .map(|item| Ok(value_from_json(name, item, property)?))
        .collect()
}
