//! The `Postmark` adapter: registration, option-merging forwarding, and the
//! testing-mode outbox.

use std::sync::{Arc, Mutex};

use axum::{Extension, Router};
use parking_lot::RwLock;
use tracing::debug;

use crate::api::{
    BatchSendResponse, Bounce, BounceActivation, BounceDump, BouncesResponse, DeliveryStats,
    HttpClient, PostmarkApi, SendResponse,
};
use crate::config::PostmarkConfig;
use crate::error::PostmarkError;
use crate::message::{Message, MessageBuilder};
use crate::options::CallOptions;

/// Postmark adapter for an axum application.
///
/// One adapter per application. Cloning is cheap and every clone shares the
/// same configuration and outbox, so a handle kept by a test observes sends
/// made through the handle registered on the router.
///
/// Each forwarded operation merges its [`CallOptions`] with the current
/// configuration (explicit values first, configured values second, built-in
/// defaults last) and invokes the underlying client, returning its result
/// and propagating its errors unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{routing::post, Extension, Router};
/// use axum_postmark::{CallOptions, Message, Postmark, PostmarkConfig};
///
/// async fn signup(Extension(postmark): Extension<Postmark>) {
///     let message = postmark
///         .compose(
///             Message::builder()
///                 .to("user@example.com")
///                 .subject("Welcome!")
///                 .text_body("Hello"),
///         )
///         .unwrap();
///     let _ = postmark.send(message, CallOptions::default()).await;
/// }
///
/// let postmark = Postmark::new(PostmarkConfig::new("server-token"));
/// let app: Router = postmark.attach(Router::new().route("/signup", post(signup)));
/// ```
#[derive(Clone)]
pub struct Postmark {
    config: Arc<RwLock<PostmarkConfig>>,
    outbox: Arc<Mutex<Vec<Message>>>,
    client: Arc<dyn PostmarkApi>,
}

impl std::fmt::Debug for Postmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Postmark")
            .field("config", &*self.config.read())
            .field("outbox_count", &self.outbox_count())
            .finish_non_exhaustive()
    }
}

impl Postmark {
    /// Create an adapter talking to the real Postmark API
    #[must_use]
    pub fn new(config: PostmarkConfig) -> Self {
        Self::with_client(config, Arc::new(HttpClient::new()))
    }

    /// Create an adapter with a custom client, typically a
    /// [`RecordingApi`](crate::testing::RecordingApi) in tests
    #[must_use]
    pub fn with_client(config: PostmarkConfig, client: Arc<dyn PostmarkApi>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            outbox: Arc::new(Mutex::new(Vec::new())),
            client,
        }
    }

    /// Register the adapter on a router.
    ///
    /// Handlers reach it through `Extension<Postmark>`. Keep a clone if the
    /// caller needs the adapter afterwards, e.g. for outbox assertions.
    #[must_use]
    pub fn attach<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(Extension(self))
    }

    /// Snapshot of the current configuration
    #[must_use]
    pub fn config(&self) -> PostmarkConfig {
        self.config.read().clone()
    }

    /// Mutate the configuration in place.
    ///
    /// The adapter reads configuration fresh on every call, so changes take
    /// effect immediately:
    ///
    /// ```rust
    /// # use axum_postmark::{Postmark, PostmarkConfig};
    /// let postmark = Postmark::new(PostmarkConfig::new("server-token"));
    /// postmark.update_config(|config| config.testing = true);
    /// assert!(postmark.is_testing());
    /// ```
    pub fn update_config<F: FnOnce(&mut PostmarkConfig)>(&self, f: F) {
        f(&mut self.config.write());
    }

    /// Whether the application's generic testing flag is set. Read fresh on
    /// every check, never cached.
    #[must_use]
    pub fn is_testing(&self) -> bool {
        self.config.read().testing
    }

    /// Messages buffered by send operations while testing was enabled, in
    /// call order. Empty unless the testing flag has been set.
    #[must_use]
    pub fn outbox(&self) -> Vec<Message> {
        self.outbox.lock().expect("outbox lock poisoned").clone()
    }

    /// Number of messages in the outbox
    #[must_use]
    pub fn outbox_count(&self) -> usize {
        self.outbox.lock().expect("outbox lock poisoned").len()
    }

    /// Build a message with the adapter's current configuration applied to
    /// its unset fields (see [`MessageBuilder::build`]).
    ///
    /// # Errors
    ///
    /// Returns an error when verification resolves enabled and fails.
    pub fn compose(&self, builder: MessageBuilder) -> Result<Message, PostmarkError> {
        builder.build(&self.config.read())
    }

    fn buffer(&self, messages: &[Message]) {
        debug!(count = messages.len(), "testing enabled, buffering in outbox");
        self.outbox
            .lock()
            .expect("outbox lock poisoned")
            .extend_from_slice(messages);
    }

    /// Send a message.
    ///
    /// In testing mode the message is appended to the outbox first; the
    /// forwarding call still happens.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn send(
        &self,
        message: Message,
        options: CallOptions,
    ) -> Result<SendResponse, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        if self.is_testing() {
            self.buffer(std::slice::from_ref(&message));
        }
        debug!(to = ?message.to, test = resolved.test, "forwarding send");
        self.client.send(&message, &resolved).await
    }

    /// Send a batch of messages in one call.
    ///
    /// In testing mode every message is appended to the outbox, in batch
    /// order; the forwarding call still happens.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn send_batch(
        &self,
        messages: Vec<Message>,
        options: CallOptions,
    ) -> Result<BatchSendResponse, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        if self.is_testing() {
            self.buffer(&messages);
        }
        debug!(count = messages.len(), test = resolved.test, "forwarding send_batch");
        self.client.send_batch(&messages, &resolved).await
    }

    /// Get delivery stats for the server.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn get_delivery_stats(
        &self,
        options: CallOptions,
    ) -> Result<DeliveryStats, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.get_delivery_stats(&resolved).await
    }

    /// Get a paginated list of bounces.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn get_bounces(&self, options: CallOptions) -> Result<BouncesResponse, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.get_bounces(&resolved).await
    }

    /// Get a single bounce by id.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn get_bounce(
        &self,
        bounce_id: u64,
        options: CallOptions,
    ) -> Result<Bounce, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.get_bounce(bounce_id, &resolved).await
    }

    /// Get the raw email dump for a single bounce.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn get_bounce_dump(
        &self,
        bounce_id: u64,
        options: CallOptions,
    ) -> Result<BounceDump, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.get_bounce_dump(bounce_id, &resolved).await
    }

    /// Get the tags of bounces recorded for the server.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn get_bounce_tags(&self, options: CallOptions) -> Result<Vec<String>, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.get_bounce_tags(&resolved).await
    }

    /// Reactivate a deactivated bounce.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub async fn activate_bounce(
        &self,
        bounce_id: u64,
        options: CallOptions,
    ) -> Result<BounceActivation, PostmarkError> {
        let resolved = options.resolve(&self.config.read());
        self.client.activate_bounce(bounce_id, &resolved).await
    }
}
