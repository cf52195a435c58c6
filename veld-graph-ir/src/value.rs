//! Dynamic record model
//!
//! Records are what the decoder produces and the encoder consumes: an
//! ordered field map with two reserved slots, the subject identifier and
//! the observed RDF types. Field values are dynamic - scalars, lists,
//! nested records, or language maps - because their shape is dictated by a
//! schema at runtime, not by a Rust type.
//!
//! Nested records are held behind `Arc` so a decode pass can hand out the
//! identical instance for every reference to the same subject.

use serde_json::{Map as JsonMap, Value as JsonValue};
use std::sync::Arc;
use veld_vocab::keyword;

/// An ordered language-tag → value map
///
/// The empty tag `""` holds untagged literals. Values are strings for
/// scalar multilang properties and string lists for array multilang
/// properties.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LangMap(Vec<(Arc<str>, Value)>);

impl LangMap {
    /// Create an empty language map
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a language tag
    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(t, _)| t.as_ref() == tag)
            .map(|(_, v)| v)
    }

    /// Get a mutable reference to the value for a language tag
    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Value> {
        self.0
            .iter_mut()
            .find(|(t, _)| t.as_ref() == tag)
            .map(|(_, v)| v)
    }

    /// Set the value for a tag, appending the tag if unseen
    pub fn set(&mut self, tag: impl AsRef<str>, value: Value) {
        match self.0.iter().position(|(t, _)| t.as_ref() == tag.as_ref()) {
            Some(idx) => self.0[idx].1 = value,
            None => self.0.push((Arc::from(tag.as_ref()), value)),
        }
    }

    /// Check whether a tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Iterate over (tag, value) entries in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.0.iter().map(|(t, v)| (t, v))
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the map has no tags
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A dynamic record field value
#[derive(Clone, Debug)]
pub enum Value {
    /// Explicit null: "clear this property" on update, "absent" on decode
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Integer(i64),
    /// Floating point scalar
    Double(f64),
    /// String scalar (also used for IRI-valued properties)
    String(Arc<str>),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested record, shared within a decode pass
    Resource(Arc<Record>),
    /// Language-tag grouped values
    LangMap(LangMap),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as nested record
    pub fn as_resource(&self) -> Option<&Arc<Record>> {
        match self {
            Value::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as language map
    pub fn as_lang_map(&self) -> Option<&LangMap> {
        match self {
            Value::LangMap(m) => Some(m),
            _ => None,
        }
    }

    /// Check for the explicit null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a JSON scalar to a value
    ///
    /// Objects and arrays are not scalars and return None; integral numbers
    /// outside the i64 range fall back to doubles.
    pub fn from_json_scalar(json: &JsonValue) -> Option<Value> {
        match json {
            JsonValue::Null => Some(Value::Null),
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Integer(i))
                } else {
                    n.as_f64().map(Value::Double)
                }
            }
            JsonValue::String(s) => Some(Value::string(s)),
            _ => None,
        }
    }

    /// Render to JSON
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::from(*i),
            Value::Double(d) => JsonValue::from(*d),
            Value::String(s) => JsonValue::String(s.to_string()),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Resource(r) => r.to_json(),
            Value::LangMap(m) => {
                let mut map = JsonMap::new();
                for (tag, value) in m.iter() {
                    map.insert(tag.to_string(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Resource(a), Value::Resource(b)) => a == b,
            (Value::LangMap(a), Value::LangMap(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

/// A typed application record
///
/// Holds the subject identifier (`$id`), observed or asserted RDF types
/// (`$type`), and one slot per schema property name in declaration order.
/// A missing field means "not supplied" (partial update semantics); a field
/// holding [`Value::Null`] is an explicit null.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Record {
    id: Option<Arc<str>>,
    types: Vec<Arc<str>>,
    fields: Vec<(Arc<str>, Value)>,
}

impl Record {
    /// Create an empty record with no identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for a subject
    pub fn with_id(id: impl AsRef<str>) -> Self {
        Self {
            id: Some(Arc::from(id.as_ref())),
            ..Default::default()
        }
    }

    /// The subject identifier, if any
    pub fn id(&self) -> Option<&Arc<str>> {
        self.id.as_ref()
    }

    /// Set the subject identifier
    pub fn set_id(&mut self, id: impl AsRef<str>) {
        self.id = Some(Arc::from(id.as_ref()));
    }

    /// The RDF types
    pub fn types(&self) -> &[Arc<str>] {
        &self.types
    }

    /// Add an RDF type if not already present
    pub fn push_type(&mut self, iri: impl AsRef<str>) {
        if !self.types.iter().any(|t| t.as_ref() == iri.as_ref()) {
            self.types.push(Arc::from(iri.as_ref()));
        }
    }

    /// Get a field value by property name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Check whether a field is present (even if null)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a field, replacing any previous value for the name
    pub fn set(&mut self, name: impl AsRef<str>, value: Value) {
        match self
            .fields
            .iter()
            .position(|(n, _)| n.as_ref() == name.as_ref())
        {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((Arc::from(name.as_ref()), value)),
        }
    }

    /// Builder-style field assignment
    pub fn field(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Iterate over (name, value) fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }

    /// Render to JSON with `$id` and `$type` keys
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonMap::new();
        if let Some(id) = &self.id {
            map.insert(keyword::ID.to_string(), JsonValue::String(id.to_string()));
        }
        if !self.types.is_empty() {
            map.insert(
                keyword::TYPE.to_string(),
                JsonValue::Array(
                    self.types
                        .iter()
                        .map(|t| JsonValue::String(t.to_string()))
                        .collect(),
                ),
            );
        }
        for (name, value) in &self.fields {
            map.insert(name.to_string(), value.to_json());
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_fields() {
        let mut rec = Record::with_id("http://example.org/a");
        rec.push_type("http://schema.org/Person");
        rec.push_type("http://schema.org/Person");
        rec.set("name", Value::string("Alice"));
        rec.set("name", Value::string("Alice B."));

        assert_eq!(rec.types().len(), 1);
        assert_eq!(rec.get("name").and_then(Value::as_str), Some("Alice B."));
        assert!(!rec.contains("age"));
    }

    #[test]
    fn test_lang_map_order() {
        let mut m = LangMap::new();
        m.set("", Value::string("untagged"));
        m.set("en", Value::string("hello"));
        m.set("jp", Value::string("konnichiwa"));

        let tags: Vec<_> = m.iter().map(|(t, _)| t.as_ref()).collect();
        assert_eq!(tags, ["", "en", "jp"]);
    }

    #[test]
    fn test_to_json() {
        let mut rec = Record::with_id("http://example.org/a");
        rec.push_type("http://schema.org/Person");
        rec.set(
            "name",
            Value::List(vec![Value::string("Alice"), Value::string("Ally")]),
        );

        assert_eq!(
            rec.to_json(),
            json!({
                "$id": "http://example.org/a",
                "$type": ["http://schema.org/Person"],
                "name": ["Alice", "Ally"],
            })
        );
    }

    #[test]
    fn test_value_from_json_scalar() {
        assert_eq!(
            Value::from_json_scalar(&json!(42)),
            Some(Value::Integer(42))
        );
        assert_eq!(
            Value::from_json_scalar(&json!(1.5)),
            Some(Value::Double(1.5))
        );
        assert_eq!(Value::from_json_scalar(&json!(null)), Some(Value::Null));
        assert_eq!(Value::from_json_scalar(&json!([1])), None);
    }

    #[test]
    fn test_resource_identity() {
        let shared = Arc::new(Record::with_id("http://example.org/shared"));
        let a = Value::Resource(shared.clone());
        let b = Value::Resource(shared.clone());
        match (&a, &b) {
            (Value::Resource(x), Value::Resource(y)) => assert!(Arc::ptr_eq(x, y)),
            _ => unreachable!(),
        }
        assert_eq!(a, b);
    }
}
