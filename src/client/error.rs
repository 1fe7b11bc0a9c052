use std::error::Error as StdError;

use serde::Deserialize;

use crate::domain::ValidationError;

const INVALID_CREDENTIALS: &str = "Invalid API key";
const FORBIDDEN: &str = "Forbidden: You don't have permission to access this resource.";
const VALIDATION_FAILED: &str = "Validation error";
const NOT_FOUND: &str = "Resource not found";
const SERVER_FAILED: &str = "Server error";

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`crate::MessagingClient`].
///
/// Each variant is one error kind; match on it to pick a recovery strategy, or treat the
/// whole enum as "the call failed". HTTP failures keep the server's detail text when the
/// body carried one.
pub enum MessagingError {
    /// `401 Unauthorized` or `403 Forbidden`.
    #[error("authentication failed: {message}")]
    Authentication { status: u16, message: String },

    /// Client-side validation failure, or `400 Bad Request` from the server.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// `404 Not Found`.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any `5xx` status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A status code the API does not document for this call.
    #[error("Unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },

    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// A success response body could not be parsed as the expected JSON.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

impl MessagingError {
    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message, .. }
            | Self::NotFound { message }
            | Self::Server { message, .. } => message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::UnexpectedStatus { status } => format!("Unexpected status code: {status}"),
            Self::Transport(err) | Self::Parse(err) => err.to_string(),
        }
    }
}

/// Successful outcome of a response, before domain decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// `200 OK` / `201 Created`; the raw body, possibly empty.
    Content(String),
    /// `204 No Content`.
    NoContent,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn message(&self) -> Option<String> {
        text_field(self.message.as_ref())
    }

    fn error(&self) -> Option<String> {
        text_field(self.error.as_ref())
    }
}

fn text_field(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

/// Map a status code and body to exactly one outcome.
///
/// Extraction rules, checked in this order: 200/201 content, 204 no content,
/// 401/403 `message`, 400 `error`, 404 `message`, 5xx `message`, anything else is
/// [`MessagingError::UnexpectedStatus`].
pub(crate) fn classify_response(status: u16, body: String) -> Result<Outcome, MessagingError> {
    match status {
        200 | 201 => Ok(Outcome::Content(body)),
        204 => Ok(Outcome::NoContent),
        401 => Err(MessagingError::Authentication {
            status,
            message: ErrorBody::parse(&body)
                .message()
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_owned()),
        }),
        403 => Err(MessagingError::Authentication {
            status,
            message: ErrorBody::parse(&body)
                .message()
                .unwrap_or_else(|| FORBIDDEN.to_owned()),
        }),
        400 => Err(MessagingError::Validation(ValidationError::Rejected {
            message: ErrorBody::parse(&body)
                .error()
                .unwrap_or_else(|| VALIDATION_FAILED.to_owned()),
        })),
        404 => Err(MessagingError::NotFound {
            message: ErrorBody::parse(&body)
                .message()
                .unwrap_or_else(|| NOT_FOUND.to_owned()),
        }),
        500..=599 => Err(MessagingError::Server {
            status,
            message: ErrorBody::parse(&body)
                .message()
                .unwrap_or_else(|| SERVER_FAILED.to_owned()),
        }),
        _ => Err(MessagingError::UnexpectedStatus { status }),
    }
}
