use serde::Deserialize;
use serde_json::json;

use crate::domain::{Contact, ContactId, ContactUpdate, NewContact};
use crate::transport::{TransportError, parse_body};

#[derive(Debug, Clone, Deserialize)]
struct ContactJson {
    #[serde(default)]
    id: Option<String>,
    name: String,
    phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ContactListJson {
    #[serde(default)]
    contacts: Option<Vec<ContactJson>>,
}

impl TryFrom<ContactJson> for Contact {
    type Error = TransportError;

    fn try_from(value: ContactJson) -> Result<Self, Self::Error> {
        let id = value
            .id
            .map(|id| {
                ContactId::new(id.clone())
                    .map_err(|_| TransportError::InvalidId { field: ContactId::FIELD, value: id })
            })
            .transpose()?;
        Ok(Contact {
            id,
            name: value.name,
            phone: value.phone,
        })
    }
}

pub fn encode_new_contact(request: &NewContact) -> serde_json::Value {
    json!({
        "name": request.name,
        "phone": request.phone,
    })
}

pub fn encode_contact_update(update: &ContactUpdate) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    if let Some(name) = update.name.as_ref() {
        payload.insert("name".to_owned(), json!(name));
    }
    if let Some(phone) = update.phone.as_ref() {
        payload.insert("phone".to_owned(), json!(phone));
    }
    serde_json::Value::Object(payload)
}

pub fn decode_contact_json_response(body: &str) -> Result<Contact, TransportError> {
    let parsed: ContactJson = parse_body(body)?;
    parsed.try_into()
}

pub fn decode_contact_list_json_response(body: &str) -> Result<Vec<Contact>, TransportError> {
    let parsed: ContactListJson = parse_body(body)?;
    parsed
        .contacts
        .unwrap_or_default()
        .into_iter()
        .map(Contact::try_from)
        .collect()
}
