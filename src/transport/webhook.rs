use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{MessageId, WebhookEvent};
use crate::transport::TransportError;
use crate::transport::timestamp::deserialize_optional_timestamp;

#[derive(Debug, Clone, Deserialize)]
struct WebhookEventJson {
    id: String,
    status: String,
    #[serde(
        default,
        alias = "deliveredAt",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    delivered_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "failureReason")]
    failure_reason: Option<String>,
}

pub fn decode_webhook_event(raw_body: &[u8]) -> Result<WebhookEvent, TransportError> {
    let parsed: WebhookEventJson = serde_json::from_slice(raw_body)?;
    let id = MessageId::new(parsed.id.clone()).map_err(|_| TransportError::InvalidId {
        field: MessageId::FIELD,
        value: parsed.id,
    })?;
    Ok(WebhookEvent {
        id,
        status: parsed.status,
        delivered_at: parsed.delivered_at,
        failure_reason: parsed.failure_reason,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn decode_delivered_event() {
        let body =
            br#"{"id": "msg123", "status": "delivered", "delivered_at": "2023-10-20T10:00:00Z"}"#;
        let event = decode_webhook_event(body).unwrap();
        assert_eq!(event.id.as_str(), "msg123");
        assert_eq!(event.status, "delivered");
        assert_eq!(
            event.delivered_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 20, 10, 0, 0).unwrap())
        );
        assert_eq!(event.failure_reason, None);
    }

    #[test]
    fn decode_event_with_offsetless_timestamp() {
        let body =
            br#"{"id": "msg123", "status": "delivered", "deliveredAt": "2023-10-20T10:00:00"}"#;
        let event = decode_webhook_event(body).unwrap();
        assert_eq!(
            event.delivered_at,
            Some(Utc.with_ymd_and_hms(2023, 10, 20, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn decode_failed_event_with_camel_case_fields() {
        let body = br#"{"id": "msg9", "status": "failed", "failureReason": "carrier rejected"}"#;
        let event = decode_webhook_event(body).unwrap();
        assert_eq!(event.status, "failed");
        assert_eq!(event.delivered_at, None);
        assert_eq!(event.failure_reason.as_deref(), Some("carrier rejected"));
    }

    #[test]
    fn decode_rejects_missing_status() {
        assert!(matches!(
            decode_webhook_event(br#"{"id": "msg123"}"#),
            Err(TransportError::Json(_))
        ));
        assert!(matches!(
            decode_webhook_event(br#"{"id": "", "status": "sent"}"#),
            Err(TransportError::InvalidId { .. })
        ));
    }
}
