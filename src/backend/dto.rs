use serde::Deserialize;

/// Error body shape the backend returns on non-2xx replies. Only the message
/// field feeds the normalized error.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
