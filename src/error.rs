use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream service responded with HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Lookup deadline exceeded before step '{0}'")]
    DeadlineExceeded(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Format error: {0}")]
    Format(String),
}

/// Coarse classification the presentation layer branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Network,
    PlayerNotFound,
    Format,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Network(_)
            | LookupError::UpstreamStatus { .. }
            | LookupError::DeadlineExceeded(_) => ErrorKind::Network,
            LookupError::PlayerNotFound(_) => ErrorKind::PlayerNotFound,
            LookupError::Format(_) => ErrorKind::Format,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_player_not_found(&self) -> bool {
        self.kind() == ErrorKind::PlayerNotFound
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorReport {
    pub message: String,
    pub kind: ErrorKind,
}

impl From<LookupError> for ErrorReport {
    fn from(error: LookupError) -> Self {
        ErrorReport {
            message: error.to_string(),
            kind: error.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
