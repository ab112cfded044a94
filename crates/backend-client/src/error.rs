use thiserror::Error;

/// Reject code reported by the backend when the service itself cannot take
/// the call: 3 = not deployed/found, 4 = call rejected, 5 = stopped.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build or send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend rejected the call (reject code {code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("Failed to deserialize the backend response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from backend: {0}")]
    InvalidData(String),
}

impl ClientError {
    /// The structured reject code, when the backend supplied one.
    pub fn reject_code(&self) -> Option<i32> {
        match self {
            ClientError::Rejected { code, .. } if *code > 0 => Some(*code),
            _ => None,
        }
    }
}
