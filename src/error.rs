/// Classified failure returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The transport could not reach the host (DNS failure, refused, no route).
    #[error("Connection failed: {0}")]
    Connection(String),
    /// An attempt exceeded its per-attempt timeout.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Non-success HTTP status code with raw response body.
    #[error("HTTP Error: {status}")]
    Http { status: u16, body: String },
    /// Any other transport-level problem.
    #[error("Request failed: {0}")]
    Transport(String),
    /// A success response whose body is not valid JSON, or does not match
    /// the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// A decoded response that lacks fields the caller depends on.
    #[error("invalid response: {0}")]
    Validation(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Decode and validation failures are structural: retrying the same
    /// request cannot fix them.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout { .. } | Self::Http { .. } | Self::Transport(_)
        )
    }

    /// HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
