//! Domain layer: strong types with validation and invariants (no I/O).

mod model;
mod request;
mod validation;
mod value;

pub use model::{Contact, Message, MessageStatus, WebhookEvent};
pub use request::{
    ContactDescriptor, ContactUpdate, NewContact, Pagination, Recipient, SendMessage,
    WireContract,
};
pub use validation::ValidationError;
pub use value::{ApiKey, ContactId, MessageId, PhoneNumber, WebhookSecret};
