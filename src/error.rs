use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure: the request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx reply from the backend, carrying the normalized message.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// Rejected client-side before any request was made.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
