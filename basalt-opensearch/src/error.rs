use thiserror::Error;

use crate::query_string::QueryStringParam;
use crate::request::RequestKind;

/// Rejections of a `query_string` call, reported before anything is sent to the backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryValidationError {
    #[error("query_string requires at least one field")]
    EmptyFields,
    #[error("Field {field:?} has invalid weight {weight}")]
    InvalidFieldWeight { field: String, weight: f32 },
    #[error("query_string requires a non empty query")]
    EmptyQuery,
    #[error("Parameter {0:?} is not supported by query_string")]
    UnknownParameter(String),
    #[error("Parameter {0} is given more than once")]
    DuplicateParameter(QueryStringParam),
    #[error("Invalid value {value} for parameter {param}: {reason}")]
    InvalidValue {
        param: QueryStringParam,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Unsupported request provided: {0}")]
    UnsupportedRequest(String),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Failed to execute {kind} request")]
    Backend {
        kind: RequestKind,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to serialize response")]
    Serialization(#[from] serde_json::Error),
}
