use std::str::FromStr;

use serde::Deserialize;

use crate::domain::model::Contact;
use crate::domain::validation::ValidationError;
use crate::domain::value::ContactId;

/// Wire format spoken by the target server.
///
/// The two API revisions disagree on pagination parameter names and on the JSON shape of a
/// message recipient. A client speaks exactly one of them for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum WireContract {
    /// `page`/`limit` pagination; `to` is sent as given (bare id or contact object).
    #[serde(rename = "A", alias = "a")]
    RevisionA,
    /// `pageIndex`/`max` pagination; `to` is always an object and phone numbers are
    /// validated client-side before they reach the server.
    #[serde(rename = "B", alias = "b")]
    RevisionB,
}

impl WireContract {
    pub fn validates_phone_numbers(self) -> bool {
        matches!(self, Self::RevisionB)
    }
}

impl FromStr for WireContract {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "A" | "a" => Ok(Self::RevisionA),
            "B" | "b" => Ok(Self::RevisionB),
            other => Err(ValidationError::UnknownWireContract {
                input: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Optional page selection for list endpoints. Unset values are omitted from the query.
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
}

impl NewContact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Partial contact update; only the fields that are `Some` are sent.
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ContactUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Full contact details of a message recipient.
pub struct ContactDescriptor {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

impl TryFrom<Contact> for ContactDescriptor {
    type Error = ValidationError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        let id = contact.id.ok_or(ValidationError::Empty {
            field: ContactId::FIELD,
        })?;
        Ok(Self {
            id,
            name: contact.name,
            phone: contact.phone,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message recipient, either a bare contact id or a full contact descriptor.
pub enum Recipient {
    Id(ContactId),
    Contact(ContactDescriptor),
}

impl Recipient {
    pub fn contact_id(&self) -> &ContactId {
        match self {
            Self::Id(id) => id,
            Self::Contact(descriptor) => &descriptor.id,
        }
    }
}

impl From<ContactId> for Recipient {
    fn from(value: ContactId) -> Self {
        Self::Id(value)
    }
}

impl From<ContactDescriptor> for Recipient {
    fn from(value: ContactDescriptor) -> Self {
        Self::Contact(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    pub from: String,
    pub to: Recipient,
    pub content: String,
}

impl SendMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<Recipient>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            content: content.into(),
        }
    }
}
