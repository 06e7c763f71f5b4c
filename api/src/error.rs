use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the board API client.
///
/// `Network` means the exchange never completed and nothing can be said
/// about what the server did. `Rejected` is a definitive server no.
/// `Decode` is a success status whose body did not match any known shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, connect, TLS, timeout, or a connection dropped mid-body.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Rejected {
        status: StatusCode,
        /// Reason pulled from the body's `message`/`error` field, or a
        /// capped preview of the raw body.
        message: String,
    },

    /// A success response whose body could not be understood.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Status code of a definitive server rejection.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}
