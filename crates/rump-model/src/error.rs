use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("source and target point to the same endpoint: {0}")]
    SameEndpoint(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
