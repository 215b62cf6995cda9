use reqwest::StatusCode;
use serde::Deserialize;

/// Every way a gateway call can fail.
///
/// Callers only ever see a value or one of these; there is no silent "empty" result.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({kind}, {code})")]
    Remote {
        code: u16,
        kind: String,
        message: String,
    },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Precondition failed: {0}")]
    Precondition(&'static str),

    #[error("Could not derive a preview for file {0}")]
    Preview(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Remote { code, .. } => *code == StatusCode::NOT_FOUND.as_u16(),
            _ => false,
        }
    }

    /// Build the error for a non-success response, using the service's error body when it has one.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct RemoteErrorBody {
            message: String,
            #[serde(default)]
            code: u16,
            #[serde(rename = "type", default)]
            kind: String,
        }

        match serde_json::from_slice::<RemoteErrorBody>(body) {
            Ok(remote) => Self::Remote {
                code: if remote.code == 0 {
                    status.as_u16()
                } else {
                    remote.code
                },
                kind: if remote.kind.is_empty() {
                    "unknown".to_string()
                } else {
                    remote.kind
                },
                message: remote.message,
            },
            Err(_) => Self::Remote {
                code: status.as_u16(),
                kind: "unknown".to_string(),
                message: String::from_utf8_lossy(body).trim().to_string(),
            },
        }
    }
}
