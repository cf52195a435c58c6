//! Literal and native-value conversion
//!
//! Centralized conversion between RDF terms and record values, used by both
//! the decoder (term → native) and the encoder and search compiler
//! (native → term). Keeping it in one place prevents the two directions from
//! drifting apart.

use crate::error::{CodecError, Result};
use std::sync::Arc;
use veld_graph_ir::{Datatype, LiteralValue, Term, Value};
use veld_schema::ValueType;

/// Build a literal term from lexical wire data
///
/// The datatype decides the native storage: boolean/integer/double families
/// parse into native scalars, everything else stays a typed lexical string.
/// A lexical form that fails to parse for its declared numeric type is kept
/// as a typed string rather than rejected; query engines occasionally emit
/// lexically sloppy numerics and the mapping layer is not a validator.
pub fn literal_term(lexical: &str, datatype: Option<&str>, language: Option<&str>) -> Term {
    if let Some(lang) = language {
        return Term::lang_string(lexical, lang);
    }
    let Some(dt_iri) = datatype else {
        return Term::string(lexical);
    };
    let datatype = Datatype::from_iri(dt_iri);
    if datatype.is_xsd_string() {
        return Term::string(lexical);
    }
    if datatype.is_boolean() {
        match lexical {
            "true" | "1" => return Term::boolean(true),
            "false" | "0" => return Term::boolean(false),
            _ => {}
        }
    } else if datatype.is_integer() {
        if let Ok(i) = lexical.parse::<i64>() {
            return Term::Literal {
                value: LiteralValue::Integer(i),
                datatype,
                language: None,
            };
        }
    } else if datatype.is_double() {
        let parsed = match lexical {
            "INF" => Some(f64::INFINITY),
            "-INF" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            _ => lexical.parse::<f64>().ok(),
        };
        if let Some(d) = parsed {
            return Term::Literal {
                value: LiteralValue::Double(d),
                datatype,
                language: None,
            };
        }
    }
    Term::typed(lexical, datatype)
}

/// Convert a graph term to its native record value
///
/// Named nodes and blank nodes map to their identifier strings, literals to
/// their native scalar. Variables have no native value.
pub fn term_to_value(term: &Term) -> Option<Value> {
    match term {
        Term::Iri(iri) => Some(Value::String(iri.clone())),
        Term::BlankNode(id) => Some(Value::string(id.to_string())),
        Term::Literal { value, .. } => Some(match value {
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Boolean(b) => Value::Bool(*b),
            LiteralValue::Integer(i) => Value::Integer(*i),
            LiteralValue::Double(d) => Value::Double(*d),
        }),
        Term::Variable(_) => None,
    }
}

/// Convert a native scalar to an object term per the declared value type
///
/// Non-string natives encode by their own type (booleans as `xsd:boolean`,
/// integers as `xsd:integer`, doubles as `xsd:double`). Strings follow the
/// declared datatype; when the datatype is plain string and a preferred
/// language is configured, the literal picks up that language tag.
pub fn value_to_term(
    property: &str,
    value: &Value,
    value_type: &ValueType,
    language: Option<&Arc<str>>,
) -> Result<Term> {
    match value_type {
        ValueType::Id => match value {
            Value::String(iri) => Ok(Term::Iri(iri.clone())),
            other => Err(CodecError::mismatch(
                property,
                format!("expected an IRI string, got {other:?}"),
            )),
        },
        ValueType::Literal(datatype) => match value {
            Value::Bool(b) => Ok(Term::boolean(*b)),
            Value::Integer(i) => Ok(Term::integer(*i)),
            Value::Double(d) => Ok(Term::double(*d)),
            Value::String(s) => {
                if datatype.is_plain_string() {
                    match language {
                        Some(lang) => Ok(Term::lang_string(s, lang)),
                        None => Ok(Term::string(s)),
                    }
                } else {
                    Ok(Term::typed(s, datatype.clone()))
                }
            }
            other => Err(CodecError::mismatch(
                property,
                format!("expected a scalar, got {other:?}"),
            )),
        },
    }
}
