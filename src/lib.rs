//! Typed Rust client for the messaging HTTP API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for wire-format
//! quirks (two API revisions disagree on pagination names and on the shape of a message
//! recipient), a client layer orchestrating requests, and a webhook layer verifying HMAC
//! signatures on delivery callbacks.
//!
//! ```rust,no_run
//! use messaging_sdk::{ApiKey, MessagingClient, NewContact, SendMessage, WireContract};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), messaging_sdk::MessagingError> {
//!     let client = MessagingClient::builder(ApiKey::new("...")?, WireContract::RevisionB)
//!         .base_url("http://localhost:3000")
//!         .build()?;
//!     let contact = client
//!         .create_contact(NewContact::new("John Doe", "+1234567890"))
//!         .await?;
//!     if let Some(id) = contact.id {
//!         client
//!             .send_message(SendMessage::new("+1122334455", id, "hello"))
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;
pub mod webhook;

pub use client::{MessagingClient, MessagingClientBuilder, MessagingError};
pub use domain::{
    ApiKey, Contact, ContactDescriptor, ContactId, ContactUpdate, Message, MessageId,
    MessageStatus, NewContact, Pagination, PhoneNumber, Recipient, SendMessage, ValidationError,
    WebhookEvent, WebhookSecret, WireContract,
};
pub use webhook::{SIGNATURE_HEADER, WEBHOOK_PATH, WebhookError, WebhookVerifier};
