//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod contact;
mod message;
mod pagination;
mod timestamp;
mod webhook;

use serde::de::DeserializeOwned;

pub use contact::{
    decode_contact_json_response, decode_contact_list_json_response, encode_contact_update,
    encode_new_contact,
};
pub use message::{
    decode_message_json_response, decode_message_list_json_response, encode_send_message,
};
pub use pagination::encode_pagination_query;
pub use webhook::decode_webhook_event;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid {field}: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("empty response for {operation}")]
    EmptyResponse { operation: &'static str },
}

/// Parse a success body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    let body = body.trim();
    let body = if body.is_empty() { "{}" } else { body };
    Ok(serde_json::from_str(body)?)
}
