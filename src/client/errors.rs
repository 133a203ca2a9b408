use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected request with {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unexpected payload from backend: {0}")]
    UnexpectedPayload(String),
    #[error("failed to build endpoint url: {0}")]
    UrlParsingError(#[from] url::ParseError),
}

impl ClientError {
    /// Human-readable message supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
