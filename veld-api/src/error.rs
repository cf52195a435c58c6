use crate::engine::EngineError;
use thiserror::Error;

/// Any failure a lens operation can surface
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Schema(#[from] veld_schema::SchemaError),

    #[error(transparent)]
    Codec(#[from] veld_codec::CodecError),

    #[error(transparent)]
    Sparql(#[from] veld_sparql::SparqlError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
