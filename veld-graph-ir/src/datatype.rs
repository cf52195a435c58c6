//! RDF literal datatype representation
//!
//! Datatypes are always explicit in this IR - there is no "untyped" literal.
//! Plain strings default to `xsd:string`, and language-tagged strings use
//! `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use veld_vocab::{rdf, xsd};

/// RDF literal datatype
///
/// A thin wrapper around an expanded datatype IRI. Use
/// [`Datatype::xsd_string`] for plain strings and
/// [`Datatype::rdf_lang_string`] for language-tagged strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Datatype(Arc::from(xsd::STRING))
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Datatype(Arc::from(xsd::BOOLEAN))
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Datatype(Arc::from(xsd::INTEGER))
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Datatype(Arc::from(xsd::DOUBLE))
    }

    /// rdf:langString - for language-tagged literals
    pub fn rdf_lang_string() -> Self {
        Datatype(Arc::from(rdf::LANG_STRING))
    }

    /// Get the expanded IRI of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is xsd:string
    pub fn is_xsd_string(&self) -> bool {
        self.0.as_ref() == xsd::STRING
    }

    /// Check if this is rdf:langString
    pub fn is_lang_string(&self) -> bool {
        self.0.as_ref() == rdf::LANG_STRING
    }

    /// Check if this datatype admits a language tag on encode
    ///
    /// Plain-string-like literals pick up the configured preferred language;
    /// typed literals never do.
    pub fn is_plain_string(&self) -> bool {
        self.is_xsd_string() || self.is_lang_string()
    }

    /// Check if this datatype is in the boolean family
    pub fn is_boolean(&self) -> bool {
        self.0.as_ref() == xsd::BOOLEAN
    }

    /// Check if this datatype is in the integer family
    pub fn is_integer(&self) -> bool {
        matches!(self.0.as_ref(), xsd::INTEGER | xsd::LONG | xsd::INT)
    }

    /// Check if this datatype is in the floating-point family
    pub fn is_double(&self) -> bool {
        matches!(self.0.as_ref(), xsd::DOUBLE | xsd::FLOAT | xsd::DECIMAL)
    }
}

impl Default for Datatype {
    fn default() -> Self {
        Datatype::xsd_string()
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_predicates() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(Datatype::xsd_string().is_plain_string());
        assert!(Datatype::rdf_lang_string().is_plain_string());
        assert!(!Datatype::xsd_integer().is_plain_string());
        assert!(Datatype::xsd_integer().is_integer());
        assert!(Datatype::from_iri(xsd::LONG).is_integer());
        assert!(Datatype::from_iri(xsd::DECIMAL).is_double());
        assert!(Datatype::xsd_boolean().is_boolean());
    }

    #[test]
    fn test_datatype_default() {
        assert_eq!(Datatype::default(), Datatype::xsd_string());
    }
}
