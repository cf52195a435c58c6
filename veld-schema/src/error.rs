use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// The prototype could not be normalized into a schema
    #[error("Malformed schema: {message}")]
    Malformed { message: String },
}

impl SchemaError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        SchemaError::Malformed {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
