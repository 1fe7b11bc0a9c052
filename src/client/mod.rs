//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod error;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::domain::{
    ApiKey, Contact, ContactId, ContactUpdate, Message, MessageId, NewContact, Pagination,
    PhoneNumber, SendMessage, ValidationError, WebhookSecret, WireContract,
};
use crate::transport::TransportError;
use crate::webhook::WebhookVerifier;

pub use error::MessagingError;

use error::{Outcome, classify_response};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = request.body.as_ref() {
                builder = builder.json(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Headers attached to every request: bearer authorization and JSON content type.
fn default_headers(api_key: &ApiKey) -> Result<HeaderMap, ValidationError> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", api_key.as_str()))
        .map_err(|_| ValidationError::InvalidHeaderValue {
            field: ApiKey::FIELD,
        })?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn parse_base_url(input: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
        reason,
    };

    let url = Url::parse(input.trim().trim_end_matches('/'))
        .map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}

#[derive(Debug, Clone)]
/// Builder for [`MessagingClient`].
///
/// Use this when you need to customize the base URL, timeout, user-agent, or enable webhook
/// verification.
pub struct MessagingClientBuilder {
    api_key: ApiKey,
    contract: WireContract,
    base_url: String,
    webhook_secret: Option<WebhookSecret>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MessagingClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(api_key: ApiKey, contract: WireContract) -> Self {
        Self {
            api_key,
            contract,
            base_url: DEFAULT_BASE_URL.to_owned(),
            webhook_secret: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL. A trailing slash is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Secret used by [`MessagingClient::verify_webhook_signature`].
    pub fn webhook_secret(mut self, secret: WebhookSecret) -> Self {
        self.webhook_secret = Some(secret);
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`MessagingClient`].
    ///
    /// Fails with [`MessagingError::Validation`] for an unusable base URL or API key.
    pub fn build(self) -> Result<MessagingClient, MessagingError> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut builder =
            reqwest::Client::builder().default_headers(default_headers(&self.api_key)?);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| MessagingError::Transport(Box::new(err)))?;

        Ok(MessagingClient {
            contract: self.contract,
            base_url,
            webhook: self.webhook_secret.map(WebhookVerifier::new),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level messaging API client.
///
/// Every operation issues exactly one HTTP request and either returns a typed value or a
/// [`MessagingError`]. Nothing is cached between calls; clones share the underlying
/// connection handle and can be used from many tasks at once.
pub struct MessagingClient {
    contract: WireContract,
    base_url: Url,
    webhook: Option<WebhookVerifier>,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingClient")
            .field("contract", &self.contract)
            .field("base_url", &self.base_url())
            .field("webhook_secret", &self.webhook.is_some())
            .finish_non_exhaustive()
    }
}

impl MessagingClient {
    /// Create a client for `http://localhost:3000`.
    ///
    /// For more customization, use [`MessagingClient::builder`].
    pub fn new(api_key: ApiKey, contract: WireContract) -> Result<Self, MessagingError> {
        Self::builder(api_key, contract).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey, contract: WireContract) -> MessagingClientBuilder {
        MessagingClientBuilder::new(api_key, contract)
    }

    pub fn contract(&self) -> WireContract {
        self.contract
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// The verifier configured through [`MessagingClientBuilder::webhook_secret`].
    pub fn webhook_verifier(&self) -> Option<&WebhookVerifier> {
        self.webhook.as_ref()
    }

    /// Create a contact.
    ///
    /// Under [`WireContract::RevisionB`] the phone number must be E.164; otherwise this fails
    /// with [`MessagingError::Validation`] without touching the network.
    pub async fn create_contact(&self, request: NewContact) -> Result<Contact, MessagingError> {
        if self.contract.validates_phone_numbers() {
            PhoneNumber::parse(request.phone.as_str())?;
        }

        let body = crate::transport::encode_new_contact(&request);
        let outcome = self
            .execute(Method::POST, self.endpoint(&["contacts"]), Vec::new(), Some(body))
            .await?;
        decode(outcome, "create_contact", crate::transport::decode_contact_json_response)
    }

    /// List contacts; pagination parameter names follow the configured wire contract.
    pub async fn list_contacts(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<Contact>, MessagingError> {
        let query = crate::transport::encode_pagination_query(self.contract, &pagination);
        let outcome = self
            .execute(Method::GET, self.endpoint(&["contacts"]), query, None)
            .await?;
        decode(outcome, "list_contacts", crate::transport::decode_contact_list_json_response)
    }

    pub async fn get_contact(&self, id: &ContactId) -> Result<Contact, MessagingError> {
        let outcome = self
            .execute(Method::GET, self.endpoint(&["contacts", id.as_str()]), Vec::new(), None)
            .await?;
        decode(outcome, "get_contact", crate::transport::decode_contact_json_response)
    }

    /// Update the supplied fields of a contact; `None` fields are left untouched.
    pub async fn update_contact(
        &self,
        id: &ContactId,
        update: ContactUpdate,
    ) -> Result<Contact, MessagingError> {
        if let Some(phone) = update.phone.as_deref() {
            if self.contract.validates_phone_numbers() {
                PhoneNumber::parse(phone)?;
            }
        }

        let body = crate::transport::encode_contact_update(&update);
        let outcome = self
            .execute(
                Method::PATCH,
                self.endpoint(&["contacts", id.as_str()]),
                Vec::new(),
                Some(body),
            )
            .await?;
        decode(outcome, "update_contact", crate::transport::decode_contact_json_response)
    }

    /// Delete a contact. `204 No Content` (or any other success) returns `()`.
    pub async fn delete_contact(&self, id: &ContactId) -> Result<(), MessagingError> {
        self.execute(
            Method::DELETE,
            self.endpoint(&["contacts", id.as_str()]),
            Vec::new(),
            None,
        )
        .await?;
        Ok(())
    }

    /// Send a message. The recipient is encoded according to the configured wire contract.
    pub async fn send_message(&self, request: SendMessage) -> Result<Message, MessagingError> {
        let body = crate::transport::encode_send_message(self.contract, &request);
        let outcome = self
            .execute(Method::POST, self.endpoint(&["messages"]), Vec::new(), Some(body))
            .await?;
        decode(outcome, "send_message", crate::transport::decode_message_json_response)
    }

    pub async fn list_messages(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<Message>, MessagingError> {
        let query = crate::transport::encode_pagination_query(self.contract, &pagination);
        let outcome = self
            .execute(Method::GET, self.endpoint(&["messages"]), query, None)
            .await?;
        decode(outcome, "list_messages", crate::transport::decode_message_list_json_response)
    }

    pub async fn get_message(&self, id: &MessageId) -> Result<Message, MessagingError> {
        let outcome = self
            .execute(Method::GET, self.endpoint(&["messages", id.as_str()]), Vec::new(), None)
            .await?;
        decode(outcome, "get_message", crate::transport::decode_message_json_response)
    }

    /// Verify a webhook signature with the configured secret.
    ///
    /// Fails only when the client was built without a webhook secret.
    pub fn verify_webhook_signature(
        &self,
        signature: &str,
        raw_body: &[u8],
    ) -> Result<bool, MessagingError> {
        let verifier = self.webhook.as_ref().ok_or(ValidationError::Empty {
            field: WebhookSecret::FIELD,
        })?;
        Ok(verifier.verify(signature, raw_body))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `parse_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<Outcome, MessagingError> {
        let path = url.path().to_owned();
        tracing::debug!(%method, %path, "sending request");

        let response = self
            .http
            .execute(HttpRequest {
                method: method.clone(),
                url,
                query,
                body,
            })
            .await
            .map_err(|err| {
                tracing::debug!(%method, %path, error = %err, "request failed");
                MessagingError::Transport(err)
            })?;

        tracing::debug!(%method, %path, status = response.status, "received response");
        classify_response(response.status, response.body)
    }
}

/// Decode a success body. An empty body (or `204`) that the decoder cannot turn into a
/// value is reported as an empty response for `operation`.
fn decode<T>(
    outcome: Outcome,
    operation: &'static str,
    decoder: impl FnOnce(&str) -> Result<T, TransportError>,
) -> Result<T, MessagingError> {
    let body = match outcome {
        Outcome::Content(body) => body,
        Outcome::NoContent => String::new(),
    };
    let empty = body.trim().is_empty();
    decoder(&body).map_err(|err| {
        let err = if empty {
            TransportError::EmptyResponse { operation }
        } else {
            err
        };
        MessagingError::Parse(Box::new(err))
    })
}
