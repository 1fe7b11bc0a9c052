use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{ContactId, Message, MessageId, Recipient, SendMessage, WireContract};
use crate::transport::timestamp::deserialize_optional_timestamp;
use crate::transport::{TransportError, parse_body};

/// `to` as the server returns it: a bare contact id or an embedded contact object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecipientJson {
    Id(String),
    Contact { id: String },
}

impl RecipientJson {
    fn into_contact_id(self) -> Result<ContactId, TransportError> {
        let raw = match self {
            Self::Id(id) | Self::Contact { id } => id,
        };
        ContactId::new(raw.clone()).map_err(|_| TransportError::InvalidId {
            field: "to",
            value: raw,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJson {
    #[serde(default)]
    id: Option<String>,
    from: String,
    to: RecipientJson,
    content: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "deliveredAt",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    delivered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MessageListJson {
    #[serde(default)]
    messages: Option<Vec<MessageJson>>,
}

impl TryFrom<MessageJson> for Message {
    type Error = TransportError;

    fn try_from(value: MessageJson) -> Result<Self, Self::Error> {
        let id = value
            .id
            .map(|id| {
                MessageId::new(id.clone())
                    .map_err(|_| TransportError::InvalidId { field: MessageId::FIELD, value: id })
            })
            .transpose()?;
        Ok(Message {
            id,
            from: value.from,
            to: value.to.into_contact_id()?,
            content: value.content,
            status: value.status,
            created_at: value.created_at,
            delivered_at: value.delivered_at,
        })
    }
}

pub fn encode_send_message(contract: WireContract, request: &SendMessage) -> serde_json::Value {
    let to = match (&request.to, contract) {
        (Recipient::Id(id), WireContract::RevisionA) => json!(id.as_str()),
        (Recipient::Id(id), WireContract::RevisionB) => json!({ "id": id.as_str() }),
        (Recipient::Contact(descriptor), _) => json!({
            "id": descriptor.id.as_str(),
            "name": descriptor.name,
            "phone": descriptor.phone,
        }),
    };

    json!({
        "from": request.from,
        "to": to,
        "content": request.content,
    })
}

pub fn decode_message_json_response(body: &str) -> Result<Message, TransportError> {
    let parsed: MessageJson = parse_body(body)?;
    parsed.try_into()
}

pub fn decode_message_list_json_response(body: &str) -> Result<Vec<Message>, TransportError> {
    let parsed: MessageListJson = parse_body(body)?;
    parsed
        .messages
        .unwrap_or_default()
        .into_iter()
        .map(Message::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::domain::ContactDescriptor;

    use super::*;

    fn descriptor() -> ContactDescriptor {
        ContactDescriptor {
            id: ContactId::new("contact124").unwrap(),
            name: "Jane Doe".to_owned(),
            phone: "+0987654321".to_owned(),
        }
    }

    #[test]
    fn revision_a_sends_bare_id_as_string() {
        let request = SendMessage::new(
            "+1234567890",
            ContactId::new("contact123").unwrap(),
            "Hello, John!",
        );
        assert_eq!(
            encode_send_message(WireContract::RevisionA, &request),
            json!({"from": "+1234567890", "to": "contact123", "content": "Hello, John!"})
        );
    }

    #[test]
    fn revision_b_wraps_bare_id_in_object() {
        let request = SendMessage::new(
            "+1234567890",
            ContactId::new("contact123").unwrap(),
            "Hello, John!",
        );
        assert_eq!(
            encode_send_message(WireContract::RevisionB, &request),
            json!({"from": "+1234567890", "to": {"id": "contact123"}, "content": "Hello, John!"})
        );
    }

    #[test]
    fn descriptor_is_sent_as_object_under_both_contracts() {
        let request = SendMessage::new("+1234567890", descriptor(), "Hi Jane!");
        let expected = json!({
            "from": "+1234567890",
            "to": {"id": "contact124", "name": "Jane Doe", "phone": "+0987654321"},
            "content": "Hi Jane!"
        });
        assert_eq!(encode_send_message(WireContract::RevisionA, &request), expected);
        assert_eq!(encode_send_message(WireContract::RevisionB, &request), expected);
    }

    #[test]
    fn decode_normalizes_object_recipient_to_id() {
        let json = r#"
        {
          "id": "msg123",
          "from": "+1234567890",
          "to": {"id": "contact123", "name": "John Doe", "phone": "+0987654321"},
          "content": "Hello, John!",
          "status": "queued",
          "createdAt": "2023-10-01T12:00:00Z",
          "deliveredAt": null
        }
        "#;
        let message = decode_message_json_response(json).unwrap();
        assert_eq!(message.id.as_ref().map(MessageId::as_str), Some("msg123"));
        assert_eq!(message.to.as_str(), "contact123");
        assert_eq!(message.status.as_deref(), Some("queued"));
        assert_eq!(
            message.created_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(message.delivered_at, None);
    }

    #[test]
    fn decode_accepts_bare_recipient_and_snake_case_timestamps() {
        let json = r#"
        {
          "from": "+1234567890",
          "to": "fa942602-25ca-4ab3-ae65-6f744467e856",
          "content": "Hello, World!",
          "created_at": "2023-10-20T10:00:00+02:00",
          "delivered_at": "2023-10-20T10:00:05+02:00"
        }
        "#;
        let message = decode_message_json_response(json).unwrap();
        assert_eq!(message.id, None);
        assert_eq!(message.to.as_str(), "fa942602-25ca-4ab3-ae65-6f744467e856");
        assert_eq!(
            message.created_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 20, 8, 0, 0).unwrap())
        );
        assert_eq!(
            message.delivered_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 20, 8, 0, 5).unwrap())
        );
    }

    #[test]
    fn decode_reads_offsetless_timestamps_as_utc() {
        let json =
            r#"{"id":"msg1","from":"+1","to":"c1","content":"hi","created_at":"2023-10-01T12:00:00"}"#;
        let message = decode_message_json_response(json).unwrap();
        assert_eq!(
            message.created_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(message.delivered_at, None);
    }

    #[test]
    fn decode_rejects_unreadable_timestamp() {
        let json = r#"{"from":"+1","to":"c1","content":"hi","createdAt":"last tuesday"}"#;
        assert!(matches!(
            decode_message_json_response(json),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn decode_rejects_recipient_object_without_id() {
        let json = r#"{"from": "+1", "to": {"name": "John"}, "content": "hi"}"#;
        assert!(matches!(
            decode_message_json_response(json),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn sent_bare_id_matches_echoed_object_recipient() {
        let id = ContactId::new("contact123").unwrap();
        let request = SendMessage::new("+1234567890", id.clone(), "Hello!");

        for contract in [WireContract::RevisionA, WireContract::RevisionB] {
            let mut echoed = encode_send_message(contract, &request);
            echoed["to"] = json!({"id": "contact123", "name": "John Doe", "phone": "+0987654321"});
            echoed["id"] = json!("msg1");

            let message = decode_message_json_response(&echoed.to_string()).unwrap();
            assert_eq!(message.to, id);
        }
    }

    #[test]
    fn decode_message_list_reads_envelope() {
        let json = r#"
        {
          "messages": [
            {
              "id": "msg1",
              "from": "+1234567890",
              "to": {"id": "contact1", "name": "Alice", "phone": "+1111111111"},
              "content": "Hi Alice!",
              "status": "delivered",
              "createdAt": "2023-10-01T12:00:00Z"
            },
            {
              "id": "msg2",
              "from": "+1234567890",
              "to": {"id": "contact2", "name": "Bob", "phone": "+2222222222"},
              "content": "Hi Bob!",
              "status": "queued",
              "createdAt": "2023-10-01T12:05:00Z"
            }
          ],
          "page": 1,
          "quantityPerPage": 2
        }
        "#;
        let messages = decode_message_list_json_response(json).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id.as_ref().map(MessageId::as_str), Some("msg1"));
        assert_eq!(messages[1].to.as_str(), "contact2");
    }

    #[test]
    fn decode_message_list_empty_cases() {
        assert!(decode_message_list_json_response("").unwrap().is_empty());
        assert!(
            decode_message_list_json_response(
                r#"{"messages": [], "page": 1, "quantityPerPage": 0}"#
            )
            .unwrap()
            .is_empty()
        );
    }
}
