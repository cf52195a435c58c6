//! Search-filter compilation
//!
//! A search specification is a JSON document mirroring the schema's shape:
//! property names map to either a literal value (sugar for `$equals`), an
//! operator object, or - for properties with a nested schema - a nested
//! search object compiled against the sub-schema's variable prefix.
//!
//! Filters constrain entity selection, so they compile into the same
//! pattern set as the required-only shape. A filtered optional property
//! implies existence: its edge triple is emitted alongside the filter so
//! the variable is bound.

use crate::ast::Pattern;
use crate::error::{Result, SparqlError};
use crate::write::format_term;
use serde_json::{Map as JsonMap, Value as JsonValue};
use veld_codec::value_to_term;
use veld_graph_ir::{Term, Triple, Value};
use veld_schema::{Property, Schema};

/// Compile a search specification into triple and filter patterns
///
/// `root` and `prefix` are the same walker parameters as
/// [`shape_patterns`](crate::shape_patterns); the generated filters refer to
/// the variables that walker derives.
pub fn compile_search(
    schema: &Schema,
    root: &Term,
    prefix: &str,
    spec: &JsonValue,
) -> Result<Vec<Pattern>> {
    let JsonValue::Object(map) = spec else {
        return Err(SparqlError::search(format!(
            "search spec must be an object, got {spec}"
        )));
    };

    let mut out = Vec::new();
    for (name, condition) in map {
        let Some((idx, property)) = schema.get(name) else {
            return Err(SparqlError::search(format!(
                "\"{name}\" names no schema property"
            )));
        };
        let var_name = format!("{prefix}_{idx}");
        let var = Term::variable(&var_name);

        match condition {
            JsonValue::Object(obj) => {
                let operator_keys = obj.keys().filter(|k| k.starts_with('$')).count();
                if operator_keys == obj.len() && !obj.is_empty() {
                    bind_if_optional(&mut out, property, root, &var);
                    compile_operators(&mut out, name, property, &var_name, obj)?;
                } else if operator_keys == 0 {
                    let Some(nested) = &property.nested else {
                        return Err(SparqlError::search(format!(
                            "\"{name}\" has no nested schema to search into"
                        )));
                    };
                    bind_if_optional(&mut out, property, root, &var);
                    out.extend(compile_search(nested, &var, &var_name, condition)?);
                } else {
                    return Err(SparqlError::search(format!(
                        "\"{name}\" mixes operators with nested search keys"
                    )));
                }
            }
            JsonValue::Array(_) => {
                return Err(SparqlError::search(format!(
                    "\"{name}\": use {{\"$in\": [...]}} to match against a list"
                )));
            }
            scalar => {
                // Bare value: sugar for $equals
                bind_if_optional(&mut out, property, root, &var);
                let rendered = render_value(name, property, scalar)?;
                out.push(Pattern::Filter(format!("?{var_name} = {rendered}")));
            }
        }
    }
    Ok(out)
}

fn bind_if_optional(out: &mut Vec<Pattern>, property: &Property, root: &Term, var: &Term) {
    if property.optional {
        let edge = if property.inverse {
            Triple::new(var.clone(), Term::Iri(property.predicate.clone()), root.clone())
        } else {
            Triple::new(root.clone(), Term::Iri(property.predicate.clone()), var.clone())
        };
        out.push(Pattern::Triple(edge));
    }
}

fn compile_operators(
    out: &mut Vec<Pattern>,
    name: &str,
    property: &Property,
    var_name: &str,
    obj: &JsonMap<String, JsonValue>,
) -> Result<()> {
    if obj.contains_key("$equals") && obj.contains_key("$in") {
        return Err(SparqlError::search(format!(
            "\"{name}\" combines $equals with $in"
        )));
    }

    for (op, arg) in obj {
        match op.as_str() {
            "$equals" => out.push(comparison(name, property, var_name, "=", arg)?),
            "$not" => out.push(comparison(name, property, var_name, "!=", arg)?),
            "$gt" => out.push(comparison(name, property, var_name, ">", arg)?),
            "$gte" => out.push(comparison(name, property, var_name, ">=", arg)?),
            "$lt" => out.push(comparison(name, property, var_name, "<", arg)?),
            "$lte" => out.push(comparison(name, property, var_name, "<=", arg)?),
            "$contains" => out.push(string_function(name, var_name, "CONTAINS", arg)?),
            "$strStarts" => out.push(string_function(name, var_name, "STRSTARTS", arg)?),
            "$strEnds" => out.push(string_function(name, var_name, "STRENDS", arg)?),
            "$regex" => out.push(string_function(name, var_name, "REGEX", arg)?),
            "$langMatches" => {
                let tag = string_arg(name, "$langMatches", arg)?;
                out.push(Pattern::Filter(format!(
                    "LANGMATCHES(LANG(?{var_name}), {})",
                    format_term(&Term::string(tag))
                )));
            }
            "$in" => {
                let JsonValue::Array(items) = arg else {
                    return Err(SparqlError::search(format!(
                        "\"{name}\": $in expects a list"
                    )));
                };
                let rendered = items
                    .iter()
                    .map(|item| render_value(name, property, item))
                    .collect::<Result<Vec<_>>>()?;
                out.push(Pattern::Filter(format!(
                    "?{var_name} IN ({})",
                    rendered.join(", ")
                )));
            }
            "$filter" => {
                let raw = string_arg(name, "$filter", arg)?;
                out.push(Pattern::Filter(
                    raw.replace("?value", &format!("?{var_name}")),
                ));
            }
            unknown => {
                return Err(SparqlError::search(format!(
                    "\"{name}\": unsupported operator \"{unknown}\""
                )));
            }
        }
    }
    Ok(())
}

fn comparison(
    name: &str,
    property: &Property,
    var_name: &str,
    op: &str,
    arg: &JsonValue,
) -> Result<Pattern> {
    let rendered = render_value(name, property, arg)?;
    Ok(Pattern::Filter(format!("?{var_name} {op} {rendered}")))
}

fn string_function(name: &str, var_name: &str, function: &str, arg: &JsonValue) -> Result<Pattern> {
    let s = string_arg(name, function, arg)?;
    Ok(Pattern::Filter(format!(
        "{function}(?{var_name}, {})",
        format_term(&Term::string(s))
    )))
}

fn string_arg<'a>(name: &str, op: &str, arg: &'a JsonValue) -> Result<&'a str> {
    arg.as_str().ok_or_else(|| {
        SparqlError::search(format!("\"{name}\": {op} expects a string argument"))
    })
}

/// Render a search value through the encoder's literal-construction logic
fn render_value(name: &str, property: &Property, json: &JsonValue) -> Result<String> {
    let value = Value::from_json_scalar(json).ok_or_else(|| {
        SparqlError::search(format!("\"{name}\": expected a scalar value, got {json}"))
    })?;
    let term = value_to_term(name, &value, &property.value_type, None)?;
    Ok(format_term(&term))
}
