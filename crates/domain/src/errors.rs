use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Query carries no questions")]
    EmptyQuestion,

    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Timeout waiting for upstream {upstream}")]
    UpstreamTimeout { upstream: String },

    #[error("Transport failure toward upstream {upstream}: {detail}")]
    Transport { upstream: String, detail: String },

    #[error("Upstream reply malformed: {0}")]
    UpstreamDecode(String),

    #[error("Failed to encode reply: {0}")]
    EncodeFailure(String),
}

impl DomainError {
    /// Forward errors are recovered locally as a SERVFAIL answer to the
    /// client; everything else is handled on the path it occurred on.
    pub fn is_forward_error(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamTimeout { .. }
                | DomainError::Transport { .. }
                | DomainError::UpstreamDecode(_)
        )
    }
}
