//! reqwest-backed Postmark client
//!
//! Owns everything wire-level: endpoint URLs, the server-token header, the
//! sandbox token, PascalCase message payloads, and decoding of Postmark
//! error bodies. Calls are single synchronous round-trips with no retry.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::types::ApiErrorBody;
use super::{
    BatchSendResponse, Bounce, BounceActivation, BounceDump, BouncesResponse, DeliveryStats,
    PostmarkApi, SendResponse,
};
use crate::error::PostmarkError;
use crate::message::{Attachment, Header, Message};
use crate::options::ResolvedOptions;

const SECURE_BASE_URL: &str = "https://api.postmarkapp.com";
const INSECURE_BASE_URL: &str = "http://api.postmarkapp.com";

/// Token Postmark accepts for sandboxed requests that are never delivered.
const TEST_API_TOKEN: &str = "POSTMARK_API_TEST";

/// Production [`PostmarkApi`] implementation over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a client with a default reqwest client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client reusing an existing reqwest client
    #[must_use]
    pub const fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn url(options: &ResolvedOptions, path: &str) -> String {
        let base = if options.secure {
            SECURE_BASE_URL
        } else {
            INSECURE_BASE_URL
        };
        format!("{base}{path}")
    }

    /// Sandbox mode swaps the server token for Postmark's test token, so
    /// requests authenticate but nothing is delivered.
    fn token(options: &ResolvedOptions) -> &str {
        if options.test {
            TEST_API_TOKEN
        } else {
            &options.api_key
        }
    }

    async fn request<R>(
        &self,
        method: Method,
        path: &str,
        options: &ResolvedOptions,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<R, PostmarkError>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = Self::url(options, path);
        debug!(%url, test = options.test, "postmark request");

        let mut request = self
            .http
            .request(method, &url)
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", Self::token(options));
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(PostmarkError::api(
                status.as_u16(),
                error.error_code,
                error.message,
            ));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PostmarkApi for HttpClient {
    async fn send(
        &self,
        message: &Message,
        options: &ResolvedOptions,
    ) -> Result<SendResponse, PostmarkError> {
        let payload = MessagePayload::from(message);
        self.request(Method::POST, "/email", options, Some(&payload))
            .await
    }

    async fn send_batch(
        &self,
        messages: &[Message],
        options: &ResolvedOptions,
    ) -> Result<BatchSendResponse, PostmarkError> {
        let payload: Vec<MessagePayload> = messages.iter().map(MessagePayload::from).collect();
        self.request(Method::POST, "/email/batch", options, Some(&payload))
            .await
    }

    async fn get_delivery_stats(
        &self,
        options: &ResolvedOptions,
    ) -> Result<DeliveryStats, PostmarkError> {
        self.request::<DeliveryStats>(Method::GET, "/deliverystats", options, None::<&()>)
            .await
    }

    async fn get_bounces(
        &self,
        options: &ResolvedOptions,
    ) -> Result<BouncesResponse, PostmarkError> {
        self.request::<BouncesResponse>(Method::GET, "/bounces", options, None::<&()>)
            .await
    }

    async fn get_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<Bounce, PostmarkError> {
        self.request::<Bounce>(
            Method::GET,
            &format!("/bounces/{bounce_id}"),
            options,
            None::<&()>,
        )
        .await
    }

    async fn get_bounce_dump(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceDump, PostmarkError> {
        self.request::<BounceDump>(
            Method::GET,
            &format!("/bounces/{bounce_id}/dump"),
            options,
            None::<&()>,
        )
        .await
    }

    async fn get_bounce_tags(
        &self,
        options: &ResolvedOptions,
    ) -> Result<Vec<String>, PostmarkError> {
        self.request::<Vec<String>>(Method::GET, "/bounces/tags", options, None::<&()>)
            .await
    }

    async fn activate_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceActivation, PostmarkError> {
        self.request::<BounceActivation>(
            Method::PUT,
            &format!("/bounces/{bounce_id}/activate"),
            options,
            None::<&()>,
        )
        .await
    }
}

/// Postmark's wire format for one message. Recipient lists are comma-joined
/// and field names are PascalCase, per the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bcc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers: Vec<HeaderPayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    track_opens: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct HeaderPayload {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttachmentPayload {
    name: String,
    content: String,
    content_type: String,
}

fn join_recipients(addresses: &[String]) -> Option<String> {
    if addresses.is_empty() {
        None
    } else {
        Some(addresses.join(","))
    }
}

impl From<&Message> for MessagePayload {
    fn from(message: &Message) -> Self {
        Self {
            from: message.sender.clone(),
            to: join_recipients(&message.to),
            cc: join_recipients(&message.cc),
            bcc: join_recipients(&message.bcc),
            subject: message.subject.clone(),
            tag: message.tag.clone(),
            html_body: message.html.clone(),
            text_body: message.text.clone(),
            reply_to: message.reply_to.clone(),
            headers: message.headers.iter().map(HeaderPayload::from).collect(),
            attachments: message
                .attachments
                .iter()
                .map(AttachmentPayload::from)
                .collect(),
            track_opens: message.track_opens,
        }
    }
}

impl From<&Header> for HeaderPayload {
    fn from(header: &Header) -> Self {
        Self {
            name: header.name.clone(),
            value: header.value.clone(),
        }
    }
}

impl From<&Attachment> for AttachmentPayload {
    fn from(attachment: &Attachment) -> Self {
        Self {
            name: attachment.name.clone(),
            content: attachment.content.clone(),
            content_type: attachment.content_type.clone(),
        }
    }
}
