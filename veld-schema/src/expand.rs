//! Prototype normalization
//!
//! [`expand`] turns the shorthand JSON prototype dialect into the canonical
//! [`Schema`] model. The dialect follows JSON-LD keyword conventions:
//!
//! ```json
//! {
//!   "@type": "http://schema.org/Person",
//!   "name": "http://schema.org/name",
//!   "spouse": {
//!     "@id": "http://schema.org/spouse",
//!     "@optional": true,
//!     "@schema": { "@type": "http://schema.org/Person",
//!                  "name": "http://schema.org/name" }
//!   }
//! }
//! ```
//!
//! A bare string value is shorthand for a required scalar string property
//! with that predicate.

use crate::error::{Result, SchemaError};
use crate::model::{Property, Schema, ValueType};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use veld_graph_ir::Datatype;
use veld_vocab::keyword;

/// Normalize a JSON prototype into a canonical schema
///
/// Fails with [`SchemaError::Malformed`] when a property entry lacks a
/// predicate identifier or when the top-level prototype asserts nothing
/// (neither a type constraint nor any property).
pub fn expand(prototype: &JsonValue) -> Result<Schema> {
    let schema = expand_level(prototype)?;
    if schema.types().is_empty() && schema.is_empty() {
        return Err(SchemaError::malformed(
            "a shape must assert a type or declare at least one property",
        ));
    }
    Ok(schema)
}

fn expand_level(prototype: &JsonValue) -> Result<Schema> {
    let JsonValue::Object(map) = prototype else {
        return Err(SchemaError::malformed("prototype must be a JSON object"));
    };

    let types = match map.get(keyword::AT_TYPE) {
        Some(value) => expand_types(value)?,
        None => Vec::new(),
    };

    let mut schema = Schema::new(types);
    for (name, entry) in map {
        if name == keyword::AT_TYPE {
            continue;
        }
        schema = schema.property(name.as_str(), expand_property(name, entry)?);
    }
    Ok(schema)
}

fn expand_types(value: &JsonValue) -> Result<Vec<Arc<str>>> {
    match value {
        JsonValue::String(s) => Ok(vec![Arc::from(s.as_str())]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(Arc::from(s.as_str())),
                other => Err(SchemaError::malformed(format!(
                    "\"@type\" entries must be strings, got {other}"
                ))),
            })
            .collect(),
        other => Err(SchemaError::malformed(format!(
            "\"@type\" must be a string or array of strings, got {other}"
        ))),
    }
}

fn expand_property(name: &str, entry: &JsonValue) -> Result<Property> {
    match entry {
        // Bare predicate shorthand: required scalar xsd:string
        JsonValue::String(predicate) => Ok(Property::literal(predicate)),

        JsonValue::Object(map) => {
            let predicate = match map.get(keyword::AT_ID) {
                Some(JsonValue::String(iri)) if !iri.is_empty() => iri.as_str(),
                Some(_) => {
                    return Err(SchemaError::malformed(format!(
                        "property \"{name}\": \"@id\" must be a non-empty string"
                    )))
                }
                None => {
                    return Err(SchemaError::malformed(format!(
                        "property \"{name}\" lacks a predicate (\"@id\")"
                    )))
                }
            };

            let mut property = Property::literal(predicate);

            for (key, value) in map {
                match key.as_str() {
                    keyword::AT_ID => {}
                    keyword::AT_TYPE => {
                        let JsonValue::String(dt) = value else {
                            return Err(SchemaError::malformed(format!(
                                "property \"{name}\": \"@type\" must be a string"
                            )));
                        };
                        property.value_type = if dt == keyword::AT_ID {
                            ValueType::Id
                        } else {
                            ValueType::Literal(Datatype::from_iri(dt))
                        };
                    }
                    keyword::AT_SCHEMA => {
                        let nested = expand(value)?;
                        property.nested = Some(Arc::new(nested));
                    }
                    keyword::AT_OPTIONAL => property.optional = expand_flag(name, key, value)?,
                    keyword::AT_ARRAY => property.array = expand_flag(name, key, value)?,
                    keyword::AT_MULTILANG => property.multilang = expand_flag(name, key, value)?,
                    keyword::AT_INVERSE => property.inverse = expand_flag(name, key, value)?,
                    other => {
                        return Err(SchemaError::malformed(format!(
                            "property \"{name}\": unknown keyword \"{other}\""
                        )))
                    }
                }
            }

            if property.nested.is_some() && map.contains_key(keyword::AT_TYPE) {
                return Err(SchemaError::malformed(format!(
                    "property \"{name}\": \"@type\" and \"@schema\" are mutually exclusive"
                )));
            }

            Ok(property)
        }

        other => Err(SchemaError::malformed(format!(
            "property \"{name}\" must be a predicate string or an object, got {other}"
        ))),
    }
}

fn expand_flag(name: &str, key: &str, value: &JsonValue) -> Result<bool> {
    match value {
        JsonValue::Bool(b) => Ok(*b),
        _ => Err(SchemaError::malformed(format!(
            "property \"{name}\": \"{key}\" must be a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expand_shorthand() {
        let schema = expand(&json!({
            "@type": "http://schema.org/Person",
            "name": "http://schema.org/name",
        }))
        .unwrap();

        assert_eq!(schema.types().len(), 1);
        let (idx, prop) = schema.get("name").unwrap();
        assert_eq!(idx, 0);
        assert_eq!(prop.predicate.as_ref(), "http://schema.org/name");
        assert_eq!(prop.value_type, ValueType::default());
        assert!(!prop.optional && !prop.array);
    }

    #[test]
    fn test_expand_full_property() {
        let schema = expand(&json!({
            "@type": ["http://schema.org/Person", "http://schema.org/Agent"],
            "homepage": {
                "@id": "http://xmlns.com/foaf/0.1/homepage",
                "@type": "@id",
                "@optional": true,
                "@array": true,
            },
        }))
        .unwrap();

        assert_eq!(schema.types().len(), 2);
        let (_, prop) = schema.get("homepage").unwrap();
        assert_eq!(prop.value_type, ValueType::Id);
        assert!(prop.optional && prop.array);
    }

    #[test]
    fn test_expand_nested() {
        let schema = expand(&json!({
            "@type": "http://schema.org/Movie",
            "director": {
                "@id": "http://schema.org/director",
                "@schema": {
                    "@type": "http://schema.org/Person",
                    "name": "http://schema.org/name",
                },
            },
        }))
        .unwrap();

        let (_, prop) = schema.get("director").unwrap();
        let nested = prop.nested.as_ref().unwrap();
        assert_eq!(nested.types()[0].as_ref(), "http://schema.org/Person");
        assert!(nested.get("name").is_some());
    }

    #[test]
    fn test_expand_rejects_missing_predicate() {
        let err = expand(&json!({
            "@type": "http://schema.org/Person",
            "name": { "@optional": true },
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_expand_rejects_empty_shape() {
        let err = expand(&json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_expand_rejects_non_boolean_flag() {
        let err = expand(&json!({
            "name": { "@id": "http://schema.org/name", "@optional": "yes" },
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }

    #[test]
    fn test_type_only_shape_is_valid() {
        let schema = expand(&json!({ "@type": "http://schema.org/Person" })).unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.types().len(), 1);
    }
}
