//! Message construction with configured defaults
//!
//! [`MessageBuilder`] distinguishes fields the caller never set from fields
//! the caller explicitly set, including explicitly-empty ones. Unset fields
//! are filled from [`PostmarkConfig`] when the message is built; explicit
//! values are never overridden by configuration.
//!
//! ```rust
//! use axum_postmark::config::PostmarkConfig;
//! use axum_postmark::message::Message;
//!
//! # fn example() -> Result<(), axum_postmark::PostmarkError> {
//! let mut config = PostmarkConfig::new("server-token");
//! config.default_sender = Some("noreply@example.com".into());
//!
//! let message = Message::builder()
//!     .to("user@example.com")
//!     .subject("Welcome!")
//!     .text_body("Hello")
//!     .build(&config)?;
//!
//! assert_eq!(message.sender.as_deref(), Some("noreply@example.com"));
//! # Ok(())
//! # }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::config::PostmarkConfig;
use crate::error::PostmarkError;

/// Maximum recipients (To + Cc + Bcc) Postmark accepts per message.
pub const MAX_RECIPIENTS: usize = 50;

/// A single custom email header, ordered as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name
    pub name: String,
    /// Header value
    pub value: String,
}

impl Header {
    /// Create a header from a name/value pair
    #[must_use]
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An email attachment. `content` is base64-encoded, as the Postmark API
/// expects on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient
    pub name: String,
    /// Base64-encoded content
    pub content: String,
    /// MIME content type
    pub content_type: String,
}

impl Attachment {
    /// Create an attachment from already base64-encoded content
    #[must_use]
    pub fn new<N, C, T>(name: N, content: C, content_type: T) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Create an attachment from raw bytes, base64-encoding the content
    #[must_use]
    pub fn from_bytes<N, T>(name: N, data: &[u8], content_type: T) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self::new(name, BASE64.encode(data), content_type)
    }
}

/// One outbound email, immutable from the adapter's perspective once built.
///
/// Messages are not retained by the adapter except when buffered into the
/// outbox in testing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sender address (From)
    pub sender: Option<String>,
    /// To recipients
    pub to: Vec<String>,
    /// Cc recipients
    pub cc: Vec<String>,
    /// Bcc recipients
    pub bcc: Vec<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Postmark tag for categorizing the message
    pub tag: Option<String>,
    /// HTML body
    pub html: Option<String>,
    /// Plain text body
    pub text: Option<String>,
    /// Reply-To address
    pub reply_to: Option<String>,
    /// Custom headers, in order
    pub headers: Vec<Header>,
    /// Attachments
    pub attachments: Vec<Attachment>,
    /// Enable Postmark open tracking
    pub track_opens: Option<bool>,
    /// Whether this message was verified at construction time
    pub verified: bool,
}

impl Message {
    /// Start building a message
    #[must_use]
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Total recipient count across To, Cc and Bcc
    #[must_use]
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Check the message is sendable.
    ///
    /// # Errors
    ///
    /// Returns an error if the message has no recipients, no sender, no
    /// body content, or more recipients than Postmark accepts per call.
    pub fn verify(&self) -> Result<(), PostmarkError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(PostmarkError::NoRecipients);
        }
        if self.sender.is_none() {
            return Err(PostmarkError::NoSender);
        }
        if self.text.is_none() && self.html.is_none() {
            return Err(PostmarkError::NoContent);
        }
        let recipients = self.recipient_count();
        if recipients > MAX_RECIPIENTS {
            return Err(PostmarkError::TooManyRecipients(recipients));
        }
        Ok(())
    }
}

/// Fluent builder for [`Message`].
///
/// Fields left unset are filled from application configuration by
/// [`build`](Self::build). Fields set explicitly are preserved as given,
/// even when empty: `.headers(vec![])` builds a message with no headers
/// regardless of any configured defaults.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    sender: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: Option<String>,
    tag: Option<String>,
    html: Option<String>,
    text: Option<String>,
    reply_to: Option<String>,
    headers: Option<Vec<Header>>,
    attachments: Vec<Attachment>,
    track_opens: Option<bool>,
    verify: Option<bool>,
}

impl MessageBuilder {
    /// Set the sender address (From)
    #[must_use]
    pub fn sender<T: Into<String>>(mut self, address: T) -> Self {
        self.sender = Some(address.into());
        self
    }

    /// Add a To recipient
    #[must_use]
    pub fn to<T: Into<String>>(mut self, address: T) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a Cc recipient
    #[must_use]
    pub fn cc<T: Into<String>>(mut self, address: T) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a Bcc recipient
    #[must_use]
    pub fn bcc<T: Into<String>>(mut self, address: T) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Set the subject line
    #[must_use]
    pub fn subject<T: Into<String>>(mut self, subject: T) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the Postmark tag
    #[must_use]
    pub fn tag<T: Into<String>>(mut self, tag: T) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the HTML body
    #[must_use]
    pub fn html_body<T: Into<String>>(mut self, body: T) -> Self {
        self.html = Some(body.into());
        self
    }

    /// Set the plain text body
    #[must_use]
    pub fn text_body<T: Into<String>>(mut self, body: T) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Set the Reply-To address
    #[must_use]
    pub fn reply_to<T: Into<String>>(mut self, address: T) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Append a custom header.
    ///
    /// Marks the header list as explicitly set, so configured default
    /// headers no longer apply.
    #[must_use]
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push(Header::new(name, value));
        self
    }

    /// Replace the full header list. An empty list is an explicit value and
    /// suppresses configured default headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add an attachment
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Attach raw bytes, base64-encoding the content
    #[must_use]
    pub fn attach_binary<N, T>(mut self, name: N, data: &[u8], content_type: T) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        self.attachments
            .push(Attachment::from_bytes(name, data, content_type));
        self
    }

    /// Enable or disable Postmark open tracking
    #[must_use]
    pub fn track_opens(mut self, enabled: bool) -> Self {
        self.track_opens = Some(enabled);
        self
    }

    /// Verify the message when built, overriding the configured
    /// `verify_messages` flag
    #[must_use]
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    /// Build the message, filling unset fields from configuration.
    ///
    /// Sender, Reply-To and headers fall back to the configured defaults
    /// when unset. The verify flag falls back to `config.verify_messages`;
    /// when it resolves true the built message is checked with
    /// [`Message::verify`] before being returned.
    ///
    /// # Errors
    ///
    /// Returns an error only when verification is enabled and fails.
    pub fn build(self, config: &PostmarkConfig) -> Result<Message, PostmarkError> {
        let verified = self.verify.unwrap_or(config.verify_messages);

        let message = Message {
            sender: self.sender.or_else(|| config.default_sender.clone()),
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject,
            tag: self.tag,
            html: self.html,
            text: self.text,
            reply_to: self.reply_to.or_else(|| config.default_reply_to.clone()),
            headers: self
                .headers
                .or_else(|| config.default_headers.clone())
                .unwrap_or_default(),
            attachments: self.attachments,
            track_opens: self.track_opens,
            verified,
        };

        if verified {
            message.verify()?;
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PostmarkConfig {
        PostmarkConfig::new("xxx")
    }

    fn configured() -> PostmarkConfig {
        let mut config = config();
        config.default_sender = Some("me@example.com".into());
        config.default_reply_to = Some("you@example.com".into());
        config.default_headers = Some(vec![Header::new("X-Origin", "web")]);
        config.verify_messages = true;
        config
    }

    #[test]
    fn builder_passes_fields_through() {
        let message = Message::builder()
            .sender("a@example.com")
            .to("b@example.com")
            .cc("c@example.com")
            .bcc("d@example.com")
            .subject("hi")
            .tag("welcome")
            .html_body("<p>hi</p>")
            .text_body("hi")
            .reply_to("e@example.com")
            .header("X-Priority", "1")
            .build(&config())
            .unwrap();

        assert_eq!(message.sender.as_deref(), Some("a@example.com"));
        assert_eq!(message.to, vec!["b@example.com"]);
        assert_eq!(message.cc, vec!["c@example.com"]);
        assert_eq!(message.bcc, vec!["d@example.com"]);
        assert_eq!(message.subject.as_deref(), Some("hi"));
        assert_eq!(message.tag.as_deref(), Some("welcome"));
        assert_eq!(message.html.as_deref(), Some("<p>hi</p>"));
        assert_eq!(message.text.as_deref(), Some("hi"));
        assert_eq!(message.reply_to.as_deref(), Some("e@example.com"));
        assert_eq!(message.headers, vec![Header::new("X-Priority", "1")]);
        assert!(!message.verified);
    }

    #[test]
    fn unset_fields_take_configured_defaults() {
        let message = Message::builder()
            .to("user@example.com")
            .text_body("hello")
            .build(&configured())
            .unwrap();

        assert_eq!(message.sender.as_deref(), Some("me@example.com"));
        assert_eq!(message.reply_to.as_deref(), Some("you@example.com"));
        assert_eq!(message.headers, vec![Header::new("X-Origin", "web")]);
        assert!(message.verified);
    }

    #[test]
    fn explicit_values_beat_configured_defaults() {
        let message = Message::builder()
            .sender("not_me@example.com")
            .reply_to("not_you@example.com")
            .headers(vec![])
            .verify(false)
            .to("user@example.com")
            .build(&configured())
            .unwrap();

        assert_eq!(message.sender.as_deref(), Some("not_me@example.com"));
        assert_eq!(message.reply_to.as_deref(), Some("not_you@example.com"));
        // An explicitly empty header list is preserved, not replaced.
        assert!(message.headers.is_empty());
        assert!(!message.verified);
    }

    #[test]
    fn verify_rejects_missing_recipients() {
        let err = Message::builder()
            .sender("a@example.com")
            .text_body("hi")
            .verify(true)
            .build(&config())
            .unwrap_err();
        assert!(matches!(err, PostmarkError::NoRecipients));
    }

    #[test]
    fn verify_rejects_missing_sender() {
        let err = Message::builder()
            .to("user@example.com")
            .text_body("hi")
            .verify(true)
            .build(&config())
            .unwrap_err();
        assert!(matches!(err, PostmarkError::NoSender));
    }

    #[test]
    fn verify_rejects_missing_content() {
        let err = Message::builder()
            .sender("a@example.com")
            .to("user@example.com")
            .verify(true)
            .build(&config())
            .unwrap_err();
        assert!(matches!(err, PostmarkError::NoContent));
    }

    #[test]
    fn verify_rejects_too_many_recipients() {
        let mut builder = Message::builder()
            .sender("a@example.com")
            .text_body("hi")
            .verify(true);
        for i in 0..51 {
            builder = builder.to(format!("user{i}@example.com"));
        }
        let err = builder.build(&config()).unwrap_err();
        assert!(matches!(err, PostmarkError::TooManyRecipients(51)));
    }

    #[test]
    fn unverified_build_skips_checks() {
        // No recipients, no sender, no body, but verification is off.
        let message = Message::builder().build(&config()).unwrap();
        assert!(!message.verified);
        assert!(message.verify().is_err());
    }

    #[test]
    fn attach_binary_base64_encodes() {
        let message = Message::builder()
            .attach_binary("report.txt", b"hello", "text/plain")
            .build(&config())
            .unwrap();
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].content, "aGVsbG8=");
        assert_eq!(message.attachments[0].content_type, "text/plain");
    }
}
