//! Test support for host applications
//!
//! [`RecordingApi`] stands in for the real HTTP client and captures every
//! forwarded call, so tests can assert on exactly what would have been sent
//! and with which merged options.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use axum_postmark::testing::RecordingApi;
//! use axum_postmark::{CallOptions, Message, Postmark, PostmarkConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), axum_postmark::PostmarkError> {
//! let api = RecordingApi::new();
//! let postmark = Postmark::with_client(PostmarkConfig::new("xxx"), Arc::new(api.clone()));
//!
//! let message = Message::builder()
//!     .sender("me@example.com")
//!     .to("user@example.com")
//!     .text_body("hi")
//!     .build(&postmark.config())?;
//! postmark.send(message, CallOptions::default()).await?;
//!
//! assert_eq!(api.call_count(), 1);
//! assert!(api.was_sent_to("user@example.com"));
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{
    BatchSendResponse, Bounce, BounceActivation, BounceDump, BouncesResponse, DeliveryStats,
    PostmarkApi, SendResponse,
};
use crate::error::PostmarkError;
use crate::message::Message;
use crate::options::ResolvedOptions;

/// One captured call to the underlying client.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Name of the forwarded operation, e.g. `"send"`
    pub operation: &'static str,
    /// Merged options the adapter handed to the client
    pub options: ResolvedOptions,
    /// Messages of the call; empty for non-send operations
    pub messages: Vec<Message>,
    /// Bounce id of the call, for the bounce operations that take one
    pub bounce_id: Option<u64>,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<RecordedCall>,
    fail_next: bool,
}

/// A [`PostmarkApi`] that records calls and returns canned successes.
///
/// Clones share the same records, so a handle kept by the test observes
/// calls made through the clone held by the adapter.
#[derive(Debug, Clone, Default)]
pub struct RecordingApi {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingApi {
    /// Create a new recording client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with a Postmark API error, for exercising
    /// error passthrough
    pub fn fail_next(&self) {
        self.inner.lock().expect("recording lock poisoned").fail_next = true;
    }

    /// All captured calls, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().expect("recording lock poisoned").calls.clone()
    }

    /// Number of captured calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.lock().expect("recording lock poisoned").calls.len()
    }

    /// The most recent captured call
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.inner
            .lock()
            .expect("recording lock poisoned")
            .calls
            .last()
            .cloned()
    }

    /// Whether any captured message addressed the given recipient
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.inner
            .lock()
            .expect("recording lock poisoned")
            .calls
            .iter()
            .flat_map(|call| call.messages.iter())
            .any(|message| message.to.iter().any(|to| to == address))
    }

    fn record(
        &self,
        operation: &'static str,
        options: &ResolvedOptions,
        messages: Vec<Message>,
        bounce_id: Option<u64>,
    ) -> Result<(), PostmarkError> {
        let mut inner = self.inner.lock().expect("recording lock poisoned");
        inner.calls.push(RecordedCall {
            operation,
            options: options.clone(),
            messages,
            bounce_id,
        });
        if inner.fail_next {
            inner.fail_next = false;
            return Err(PostmarkError::api(422, 300, "simulated failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PostmarkApi for RecordingApi {
    async fn send(
        &self,
        message: &Message,
        options: &ResolvedOptions,
    ) -> Result<SendResponse, PostmarkError> {
        self.record("send", options, vec![message.clone()], None)?;
        Ok(SendResponse {
            message: "OK".into(),
            ..SendResponse::default()
        })
    }

    async fn send_batch(
        &self,
        messages: &[Message],
        options: &ResolvedOptions,
    ) -> Result<BatchSendResponse, PostmarkError> {
        self.record("send_batch", options, messages.to_vec(), None)?;
        Ok(messages
            .iter()
            .map(|_| SendResponse {
                message: "OK".into(),
                ..SendResponse::default()
            })
            .collect())
    }

    async fn get_delivery_stats(
        &self,
        options: &ResolvedOptions,
    ) -> Result<DeliveryStats, PostmarkError> {
        self.record("get_delivery_stats", options, Vec::new(), None)?;
        Ok(DeliveryStats::default())
    }

    async fn get_bounces(
        &self,
        options: &ResolvedOptions,
    ) -> Result<BouncesResponse, PostmarkError> {
        self.record("get_bounces", options, Vec::new(), None)?;
        Ok(BouncesResponse::default())
    }

    async fn get_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<Bounce, PostmarkError> {
        self.record("get_bounce", options, Vec::new(), Some(bounce_id))?;
        Ok(Bounce {
            id: bounce_id,
            ..Bounce::default()
        })
    }

    async fn get_bounce_dump(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceDump, PostmarkError> {
        self.record("get_bounce_dump", options, Vec::new(), Some(bounce_id))?;
        Ok(BounceDump::default())
    }

    async fn get_bounce_tags(
        &self,
        options: &ResolvedOptions,
    ) -> Result<Vec<String>, PostmarkError> {
        self.record("get_bounce_tags", options, Vec::new(), None)?;
        Ok(Vec::new())
    }

    async fn activate_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceActivation, PostmarkError> {
        self.record("activate_bounce", options, Vec::new(), Some(bounce_id))?;
        Ok(BounceActivation {
            message: "OK".into(),
            bounce: Bounce {
                id: bounce_id,
                ..Bounce::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostmarkConfig;
    use crate::options::CallOptions;

    fn options() -> ResolvedOptions {
        CallOptions::default().resolve(&PostmarkConfig::new("xxx"))
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let api = RecordingApi::new();
        let opts = options();

        api.get_bounce_tags(&opts).await.unwrap();
        api.get_bounce(7, &opts).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, "get_bounce_tags");
        assert_eq!(calls[1].operation, "get_bounce");
        assert_eq!(calls[1].bounce_id, Some(7));
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_once() {
        let api = RecordingApi::new();
        let opts = options();

        api.fail_next();
        assert!(api.get_bounces(&opts).await.is_err());
        assert!(api.get_bounces(&opts).await.is_ok());
        // Failed calls are still recorded.
        assert_eq!(api.call_count(), 2);
    }
}
