//! Canonical schema and property types

use std::sync::Arc;
use veld_graph_ir::Datatype;

/// How a property's object terms convert to and from native values
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// Objects are named nodes; the native value is the IRI string
    Id,
    /// Objects are literals of the given datatype
    Literal(Datatype),
}

impl Default for ValueType {
    fn default() -> Self {
        ValueType::Literal(Datatype::xsd_string())
    }
}

/// One declared property of a shape
///
/// Exactly one of `value_type` / `nested` drives term conversion: when a
/// nested schema is present, objects are sub-resources decoded against it
/// and `value_type` is ignored.
#[derive(Clone, Debug)]
pub struct Property {
    /// Predicate IRI (always expanded, never empty)
    pub predicate: Arc<str>,
    /// Literal datatype or named-node marker
    pub value_type: ValueType,
    /// Sub-shape for embedded entities
    pub nested: Option<Arc<Schema>>,
    /// Missing bucket decodes to null / empty instead of failing
    pub optional: bool,
    /// All bucket terms decode, in encounter order
    pub array: bool,
    /// Literals group by language tag
    pub multilang: bool,
    /// Edge direction is object → subject
    pub inverse: bool,
}

impl Property {
    /// A required scalar xsd:string literal property
    pub fn literal(predicate: impl AsRef<str>) -> Self {
        Self {
            predicate: Arc::from(predicate.as_ref()),
            value_type: ValueType::default(),
            nested: None,
            optional: false,
            array: false,
            multilang: false,
            inverse: false,
        }
    }

    /// A literal property with an explicit datatype
    pub fn typed(predicate: impl AsRef<str>, datatype: Datatype) -> Self {
        Self {
            value_type: ValueType::Literal(datatype),
            ..Self::literal(predicate)
        }
    }

    /// A property whose objects are named nodes (IRI-valued)
    pub fn reference(predicate: impl AsRef<str>) -> Self {
        Self {
            value_type: ValueType::Id,
            ..Self::literal(predicate)
        }
    }

    /// A property embedding a sub-shape
    pub fn nested(predicate: impl AsRef<str>, schema: Arc<Schema>) -> Self {
        Self {
            nested: Some(schema),
            ..Self::literal(predicate)
        }
    }

    /// Mark the property optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the property as an array
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Mark the property multilingual
    pub fn multilang(mut self) -> Self {
        self.multilang = true;
        self
    }

    /// Flip the edge direction
    pub fn inverse(mut self) -> Self {
        self.inverse = true;
        self
    }
}

/// The declared shape of an entity
///
/// Properties keep declaration order; the query compiler derives variable
/// names from a property's position, so reordering properties changes
/// generated query text.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    types: Vec<Arc<str>>,
    properties: Vec<(Arc<str>, Property)>,
}

impl Schema {
    /// Create a schema asserting the given RDF types
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            types: types.into_iter().map(|t| Arc::from(t.as_ref())).collect(),
            properties: Vec::new(),
        }
    }

    /// Append a property (builder style); declaration order is kept
    pub fn property(mut self, name: impl AsRef<str>, property: Property) -> Self {
        self.properties.push((Arc::from(name.as_ref()), property));
        self
    }

    /// The required RDF types
    pub fn types(&self) -> &[Arc<str>] {
        &self.types
    }

    /// Iterate over (name, property) pairs in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&Arc<str>, &Property)> {
        self.properties.iter().map(|(n, p)| (n, p))
    }

    /// Look up a property and its declaration index by name
    pub fn get(&self, name: &str) -> Option<(usize, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .find(|(_, (n, _))| n.as_ref() == name)
            .map(|(i, (_, p))| (i, p))
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check whether the schema declares no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
