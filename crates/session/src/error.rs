use backend_client::ClientError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Client initialization timeout after {0:?}")]
    InitTimeout(Duration),

    #[error("Startup timeout: application took too long to initialize")]
    StartupTimeout,

    #[error("Backend client is not available yet")]
    ClientUnavailable,

    #[error("Invalid trade: {0}")]
    InvalidTrade(#[from] core_types::CoreError),

    #[error("Client construction task failed: {0}")]
    TaskFailed(String),
}

impl SessionError {
    /// The backend's structured reject code, when one travelled with the
    /// underlying client error.
    pub fn reject_code(&self) -> Option<i32> {
        match self {
            SessionError::Client(inner) => inner.reject_code(),
            _ => None,
        }
    }
}
