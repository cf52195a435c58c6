//! Schema-aware JSON → record conversion
//!
//! Callers often hold entity data as JSON documents. This module converts
//! them into [`Record`]s under a schema's guidance, which is what decides
//! whether a JSON object is a nested record or a language map.

use crate::error::{CodecError, Result};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use veld_graph_ir::{LangMap, Record, Value};
use veld_schema::{Property, Schema};
use veld_vocab::keyword;

/// Convert a JSON document into a record shaped by a schema
///
/// `$id` and `$type` are read from their reserved keys; every other key must
/// name a schema property. Fields absent from the JSON stay absent from the
/// record (partial-update semantics), and explicit JSON nulls become the
/// explicit null value.
pub fn record_from_json(json: &JsonValue, schema: &Schema) -> Result<Record> {
    let JsonValue::Object(map) = json else {
        return Err(CodecError::record(format!(
            "expected a JSON object, got {json}"
        )));
    };

    let mut record = Record::new();
    for (key, entry) in map {
        match key.as_str() {
            keyword::ID => match entry {
                JsonValue::String(id) => record.set_id(id),
                other => {
                    return Err(CodecError::record(format!(
                        "\"$id\" must be a string, got {other}"
                    )))
                }
            },
            keyword::TYPE => match entry {
                JsonValue::String(t) => record.push_type(t),
                JsonValue::Array(items) => {
                    for item in items {
                        let JsonValue::String(t) = item else {
                            return Err(CodecError::record(
                                "\"$type\" entries must be strings",
                            ));
                        };
                        record.push_type(t);
                    }
                }
                other => {
                    return Err(CodecError::record(format!(
                        "\"$type\" must be a string or array, got {other}"
                    )))
                }
            },
            name => {
                let Some((_, property)) = schema.get(name) else {
                    return Err(CodecError::UnknownProperty {
                        property: name.to_string(),
                    });
                };
                let value = value_from_json(name, entry, property)?;
                record.set(name, value);
            }
        }
    }
    Ok(record)
}

/// Convert one property's JSON payload to a record value
///
/// The property decides the interpretation: multilang properties read
/// language maps, nested properties read sub-records, everything else reads
/// scalars and lists of scalars.
pub fn value_from_json(name: &str, json: &JsonValue, property: &Property) -> Result<Value> {
    if json.is_null() {
        return Ok(Value::Null);
    }

    if property.multilang {
        let JsonValue::Object(map) = json else {
            return Err(CodecError::mismatch(
                name,
                "multilang property expects an object keyed by language tag",
            ));
        };
        let mut langs = LangMap::new();
        for (tag, tagged) in map {
            langs.set(tag.as_str(), multilang_entry(name, tagged)?);
        }
        return Ok(Value::LangMap(langs));
    }

    match json {
        JsonValue::Array(items) => {
            let converted = items
                .iter()
                .map(|item| item_from_json(name, item, property))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(converted))
        }
        other => item_from_json(name, other, property),
    }
}

fn item_from_json(name: &str, json: &JsonValue, property: &Property) -> Result<Value> {
    match (&property.nested, json) {
        (Some(nested), JsonValue::Object(_)) => Ok(Value::Resource(Arc::new(record_from_json(
            json, nested,
        )?))),
        _ => Value::from_json_scalar(json).ok_or_else(|| {
            CodecError::mismatch(name, format!("cannot convert {json} to a value"))
        }),
    }
}

fn multilang_entry(name: &str, json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::String(s) => Ok(Value::string(s)),
        JsonValue::Array(items) => {
            let strings = items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => Ok(Value::string(s)),
                    other => Err(CodecError::mismatch(
                        name,
                        format!("multilang values must be strings, got {other}"),
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(strings))
        }
        other => Err(CodecError::mismatch(
            name,
            format!("multilang values must be strings, got {other}"),
        )),
    }
}
