use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CodecError {
    /// A non-optional property has no term bucket on the node being decoded
    #[error("Missing required property \"{property}\" on <{subject}>")]
    MissingRequiredProperty { property: String, subject: String },

    /// A term or value has the wrong kind for the declared property shape
    #[error("Type mismatch for property \"{property}\": {message}")]
    TypeMismatch { property: String, message: String },

    /// The wire payload does not follow the RDF/JSON nesting conventions
    #[error("Malformed wire payload: {message}")]
    Wire { message: String },

    /// A record field names no property of the schema
    #[error("Unknown property \"{property}\"")]
    UnknownProperty { property: String },

    /// A JSON record does not fit the schema's shape
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },
}

impl CodecError {
    pub(crate) fn mismatch(property: &str, message: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            property: property.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn wire(message: impl Into<String>) -> Self {
        CodecError::Wire {
            message: message.into(),
        }
    }

    pub(crate) fn record(message: impl Into<String>) -> Self {
        CodecError::InvalidRecord {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
