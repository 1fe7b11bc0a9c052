use chrono::{DateTime, Utc};

use crate::domain::value::{ContactId, MessageId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Address-book entry.
///
/// `id` is `None` only for values that were never returned by the server.
pub struct Contact {
    pub id: Option<ContactId>,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A sent message as reported by the server.
///
/// `to` is always the recipient's contact id. When the server embeds the whole contact
/// object, only its `id` is retained.
pub struct Message {
    pub id: Option<MessageId>,
    pub from: String,
    pub to: ContactId,
    pub content: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Delivery snapshot for this message, available once the server assigned an id, a
    /// status and a creation time.
    pub fn status_snapshot(&self) -> Option<MessageStatus> {
        Some(MessageStatus {
            id: self.id.clone()?,
            status: self.status.clone()?,
            created_at: self.created_at?,
            delivered_at: self.delivered_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStatus {
    pub id: MessageId,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Delivery-status notification pushed by the server.
///
/// Only produced by [`crate::WebhookVerifier::verify_and_parse`], after the signature
/// has been checked.
pub struct WebhookEvent {
    pub id: MessageId,
    pub status: String,
    pub delivered_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}
