use thiserror::Error;

/// Failure of one request against the bakery API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout).
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// The server answered with a non-success status.
    #[error("server rejected request with status {status}")]
    Rejected {
        status: u16,
        /// `message` field of the error body, when the server sent one.
        message: Option<String>,
    },
    /// A success response did not match the expected envelope.
    #[error("response decode failed: {message}")]
    Decode { message: String },
    /// The request was refused locally before being sent.
    #[error("invalid request: {message}")]
    Invalid { message: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Message to show the user.
    ///
    /// Server-provided and validation messages are shown verbatim; anything
    /// else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Invalid { message } => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}
