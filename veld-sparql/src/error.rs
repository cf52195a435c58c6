use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlError {
    /// A search specification uses an unsupported or conflicting operator
    #[error("Invalid search spec: {message}")]
    InvalidSearchSpec { message: String },

    /// An array update payload is neither a list nor a `$add`/`$set`/`$remove` object
    #[error("Invalid array update: {message}")]
    InvalidArrayUpdateSpec { message: String },

    /// An update payload is malformed (missing `$id`, unknown property, ...)
    #[error("Invalid update: {message}")]
    InvalidUpdate { message: String },

    /// Value conversion failed while compiling literals
    #[error(transparent)]
    Codec(#[from] veld_codec::CodecError),
}

impl SparqlError {
    pub(crate) fn search(message: impl Into<String>) -> Self {
        SparqlError::InvalidSearchSpec {
            message: message.into(),
        }
    }

    pub(crate) fn array_update(message: impl Into<String>) -> Self {
        SparqlError::InvalidArrayUpdateSpec {
            message: message.into(),
        }
    }

    pub(crate) fn update(message: impl Into<String>) -> Self {
        SparqlError::InvalidUpdate {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SparqlError>;
