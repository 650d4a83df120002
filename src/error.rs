use reqwest::StatusCode;

/// Failures talking to the stats backend.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never got a response (refused, DNS, timeout, TLS).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status {
        url: String,
        status: StatusCode,
        /// The `error` field of the response body, when the server sent one.
        message: Option<String>,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON we expected.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Problems caught locally before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField(&'static str),

    #[error("Player not found!")]
    PlayerNotFound,

    #[error("Score must be a whole number")]
    InvalidScore(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
