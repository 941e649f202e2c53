use thiserror::Error;

/// Failures from the remote content service boundary.
///
/// Callers in the core catch these at the store/controller edge; nothing
/// here propagates past them as an unhandled error.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No bearer token in the session. The request is never attempted.
    #[error("no session credential available, sign in first")]
    MissingCredential,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {code}")]
    Status { code: u16 },

    #[error("failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service sent a status/kind letter outside its documented set.
    #[error("unexpected wire code {value:?} for {field}")]
    WireCode { field: &'static str, value: String },
}

impl RemoteError {
    pub fn status(code: u16) -> Self {
        RemoteError::Status { code }
    }
}
