use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidBaseUrl { input: String, reason: String },
    InvalidHeaderValue { field: &'static str },
    UnknownWireContract { input: String },
    /// The server answered `400 Bad Request`.
    Rejected { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => {
                write!(f, "invalid phone number: {input} (expected E.164, e.g. +1234567890)")
            }
            Self::InvalidBaseUrl { input, reason } => {
                write!(f, "invalid base URL {input}: {reason}")
            }
            Self::InvalidHeaderValue { field } => {
                write!(f, "{field} contains characters not allowed in an HTTP header")
            }
            Self::UnknownWireContract { input } => {
                write!(f, "unknown wire contract: {input} (expected A or B)")
            }
            Self::Rejected { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}
