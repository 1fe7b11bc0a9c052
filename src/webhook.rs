//! Webhook signature verification.
//!
//! The server signs every callback with `hex(HMAC-SHA256(secret, raw_body))` and sends the
//! digest in the `Authorization` header. Verification must run over the exact bytes that
//! arrived on the wire, before any JSON parsing.

use std::error::Error as StdError;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::{WebhookEvent, WebhookSecret};

/// Header carrying the signature on webhook callbacks.
pub const SIGNATURE_HEADER: &str = "Authorization";

/// Path the server posts callbacks to.
pub const WEBHOOK_PATH: &str = "/webhooks";

/// Scheme labels a sender may put in front of the digest. At most one is stripped.
const SIGNATURE_SCHEMES: [&str; 2] = ["HMAC-SHA256 ", "Bearer "];

const DIGEST_HEX_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
/// Reasons a webhook receiver rejects a callback.
pub enum WebhookError {
    #[error("no signature provided")]
    MissingSignature,

    #[error("signature is not a hex-encoded SHA-256 digest")]
    MalformedSignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid webhook payload: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

impl WebhookError {
    /// HTTP status a receiver should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingSignature | Self::MalformedSignature | Self::InvalidSignature => 401,
            Self::Parse(_) => 400,
        }
    }
}

#[derive(Debug, Clone)]
/// Verifies callback signatures with a shared secret.
///
/// Stateless apart from the secret; safe to share across threads and call concurrently.
pub struct WebhookVerifier {
    secret: WebhookSecret,
}

impl WebhookVerifier {
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    /// Lowercase hex HMAC-SHA256 digest of `raw_body`.
    pub fn sign(&self, raw_body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(raw_body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check `signature` against the digest of `raw_body`.
    ///
    /// A leading scheme label (`HMAC-SHA256 ` or `Bearer `) is ignored. The comparison runs
    /// in constant time. Never fails: anything that does not match returns `false`.
    pub fn verify(&self, signature: &str, raw_body: &[u8]) -> bool {
        let provided = strip_scheme(signature);
        let expected = self.sign(raw_body);
        constant_time_compare(expected.as_bytes(), provided.as_bytes())
    }

    /// Receiver entry point: verify the header value, then parse the body.
    ///
    /// The body is only parsed after the signature matched.
    pub fn verify_and_parse(
        &self,
        signature: Option<&str>,
        raw_body: &[u8],
    ) -> Result<WebhookEvent, WebhookError> {
        let signature = match signature {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                tracing::warn!("webhook rejected: no signature provided");
                return Err(WebhookError::MissingSignature);
            }
        };

        if !is_hex_digest(strip_scheme(signature)) {
            tracing::warn!("webhook rejected: malformed signature");
            return Err(WebhookError::MalformedSignature);
        }

        if !self.verify(signature, raw_body) {
            tracing::warn!(body_len = raw_body.len(), "webhook rejected: invalid signature");
            return Err(WebhookError::InvalidSignature);
        }

        let event = crate::transport::decode_webhook_event(raw_body)
            .map_err(|err| WebhookError::Parse(Box::new(err)))?;
        tracing::debug!(id = %event.id, status = %event.status, "webhook accepted");
        Ok(event)
    }
}

fn strip_scheme(signature: &str) -> &str {
    SIGNATURE_SCHEMES
        .iter()
        .find_map(|scheme| signature.strip_prefix(scheme))
        .unwrap_or(signature)
}

fn is_hex_digest(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "mySecret";
    const BODY: &[u8] = br#"{"id":"msg123","status":"delivered"}"#;
    const BODY_DIGEST: &str = "8cf4000b03cfa141eb85f77820d1486c7d7ba39db6d3bca75f616c6ecd9897ba";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(WebhookSecret::new(SECRET).unwrap())
    }

    fn reference_digest(secret: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn sign_matches_known_digest() {
        assert_eq!(verifier().sign(BODY), BODY_DIGEST);
        assert_eq!(reference_digest(SECRET, BODY), BODY_DIGEST);
    }

    #[test]
    fn sign_accepts_secrets_of_any_length() {
        let body = BODY;
        for secret in ["k".to_owned(), "s".repeat(64), "long-secret-".repeat(40)] {
            let verifier = WebhookVerifier::new(WebhookSecret::new(secret.clone()).unwrap());
            let signature = verifier.sign(body);
            assert_eq!(signature, reference_digest(&secret, body));
            assert!(verifier.verify(&signature, body));
        }
    }

    #[test]
    fn verify_accepts_matching_signature() {
        assert!(verifier().verify(BODY_DIGEST, BODY));
    }

    #[test]
    fn verify_rejects_single_flipped_hex_character() {
        let mut flipped = BODY_DIGEST.to_owned();
        flipped.replace_range(0..1, "9");
        assert!(!verifier().verify(&flipped, BODY));

        let mut flipped = BODY_DIGEST.to_owned();
        flipped.replace_range(63..64, "b");
        assert!(!verifier().verify(&flipped, BODY));
    }

    #[test]
    fn verify_is_bound_to_exact_bytes() {
        let reformatted = br#"{"id": "msg123", "status": "delivered"}"#;
        assert!(!verifier().verify(BODY_DIGEST, reformatted));
        assert!(verifier().verify(&reference_digest(SECRET, reformatted), reformatted));
    }

    #[test]
    fn verify_rejects_other_secret() {
        let other = WebhookVerifier::new(WebhookSecret::new("otherSecret").unwrap());
        assert!(!other.verify(BODY_DIGEST, BODY));
    }

    #[test]
    fn verify_is_idempotent() {
        let verifier = verifier();
        assert_eq!(verifier.verify(BODY_DIGEST, BODY), verifier.verify(BODY_DIGEST, BODY));
        assert_eq!(verifier.verify("nope", BODY), verifier.verify("nope", BODY));
    }

    #[test]
    fn verify_strips_one_known_scheme() {
        let verifier = verifier();
        assert!(verifier.verify(&format!("HMAC-SHA256 {BODY_DIGEST}"), BODY));
        assert!(verifier.verify(&format!("Bearer {BODY_DIGEST}"), BODY));
        assert!(!verifier.verify(&format!("Bearer Bearer {BODY_DIGEST}"), BODY));
        assert!(!verifier.verify(&format!("Digest {BODY_DIGEST}"), BODY));
    }

    #[test]
    fn verify_returns_false_for_garbage() {
        let verifier = verifier();
        assert!(!verifier.verify("", BODY));
        assert!(!verifier.verify("zz", BODY));
        assert!(!verifier.verify(&BODY_DIGEST.to_uppercase(), BODY));
    }

    #[test]
    fn verify_and_parse_yields_event() {
        let event = verifier()
            .verify_and_parse(Some(BODY_DIGEST), BODY)
            .unwrap();
        assert_eq!(event.id.as_str(), "msg123");
        assert_eq!(event.status, "delivered");
    }

    #[test]
    fn verify_and_parse_rejects_missing_signature() {
        let err = verifier().verify_and_parse(None, BODY).unwrap_err();
        assert!(matches!(err, WebhookError::MissingSignature));
        assert_eq!(err.status_code(), 401);

        let err = verifier().verify_and_parse(Some("  "), BODY).unwrap_err();
        assert!(matches!(err, WebhookError::MissingSignature));
    }

    #[test]
    fn verify_and_parse_rejects_malformed_and_wrong_signatures() {
        let err = verifier().verify_and_parse(Some("not-hex"), BODY).unwrap_err();
        assert!(matches!(err, WebhookError::MalformedSignature));
        assert_eq!(err.status_code(), 401);

        let wrong = reference_digest("otherSecret", BODY);
        let err = verifier().verify_and_parse(Some(&wrong), BODY).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn verify_and_parse_reports_bad_payload_after_valid_signature() {
        let body = b"not json";
        let signature = reference_digest(SECRET, body);
        let err = verifier().verify_and_parse(Some(&signature), body).unwrap_err();
        assert!(matches!(err, WebhookError::Parse(_)));
        assert_eq!(err.status_code(), 400);
    }
}
