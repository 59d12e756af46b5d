use crate::serialization::SerializationError;

#[derive(Debug, thiserror::Error)]
pub enum KafkaPlusError {
    /// A required configuration field was null, empty or blank.
    #[error("{field} can't be null/empty")]
    MissingField { field: String },

    /// The terminal build operation was called in an unbuildable state.
    #[error("build precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Error raised by the underlying client library, propagated unchanged.
    #[error(transparent)]
    Kafka(#[from] rdkafka::error::KafkaError),
}

impl KafkaPlusError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        KafkaPlusError::MissingField { field: field.into() }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        KafkaPlusError::Precondition(msg.into())
    }

    /// The offending field label, for configuration errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            KafkaPlusError::MissingField { field } => Some(field),
            _ => None,
        }
    }
}
