use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RefinanceError {
    /// Field name carried by an `InvalidInput` error.
    pub fn field(&self) -> Option<&str> {
        match self {
            RefinanceError::InvalidInput { field, .. } => Some(field),
            RefinanceError::SerializationError(_) => None,
        }
    }
}

impl From<serde_json::Error> for RefinanceError {
    fn from(e: serde_json::Error) -> Self {
        RefinanceError::SerializationError(e.to_string())
    }
}
