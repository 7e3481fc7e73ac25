use reqwest::Error as ReqwestError;

/// Errors raised while talking to the API or the client-side collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network layer failed or a response body could not be decoded.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The device could not report its position.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
}
