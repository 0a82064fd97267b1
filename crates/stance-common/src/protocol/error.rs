use thiserror::Error;

#[derive(Error, Debug)]
pub enum StanceError {
    #[error("Posture service unavailable at {addr}: {reason}")]
    ServiceUnavailable { addr: String, reason: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Posture service fault: {0}")]
    Fault(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid transition speed {0}: expected a fraction in (0, 1]")]
    InvalidSpeed(f32),
}

pub type Result<T> = std::result::Result<T, StanceError>;
