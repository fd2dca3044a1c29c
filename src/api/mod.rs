//! The underlying Postmark API client
//!
//! [`PostmarkApi`] is the seam between the adapter and the wire: the adapter
//! merges options and forwards, the client owns transport. The production
//! implementation is [`HttpClient`]; tests substitute
//! [`RecordingApi`](crate::testing::RecordingApi).

mod http;
mod types;

pub use http::HttpClient;
pub use types::{
    Bounce, BounceActivation, BounceDump, BounceTypeCount, BouncesResponse, DeliveryStats,
    SendResponse,
};

use async_trait::async_trait;

use crate::error::PostmarkError;
use crate::message::Message;
use crate::options::ResolvedOptions;

/// Responses to a batch send, one per message, in message order.
pub type BatchSendResponse = Vec<SendResponse>;

/// Operations exposed by the Postmark API.
///
/// All methods take fully-merged [`ResolvedOptions`]; callers never hand a
/// client unresolved per-call options. Errors are reported as-is, with no
/// retries and no translation beyond decoding Postmark's error body.
#[async_trait]
pub trait PostmarkApi: Send + Sync {
    /// Send a single message
    async fn send(
        &self,
        message: &Message,
        options: &ResolvedOptions,
    ) -> Result<SendResponse, PostmarkError>;

    /// Send a batch of messages in one call
    async fn send_batch(
        &self,
        messages: &[Message],
        options: &ResolvedOptions,
    ) -> Result<BatchSendResponse, PostmarkError>;

    /// Get delivery stats for the server
    async fn get_delivery_stats(
        &self,
        options: &ResolvedOptions,
    ) -> Result<DeliveryStats, PostmarkError>;

    /// Get a paginated list of bounces
    async fn get_bounces(
        &self,
        options: &ResolvedOptions,
    ) -> Result<BouncesResponse, PostmarkError>;

    /// Get a single bounce by id
    async fn get_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<Bounce, PostmarkError>;

    /// Get the raw email dump for a single bounce
    async fn get_bounce_dump(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceDump, PostmarkError>;

    /// Get the tags of bounces recorded for the server
    async fn get_bounce_tags(
        &self,
        options: &ResolvedOptions,
    ) -> Result<Vec<String>, PostmarkError>;

    /// Reactivate a deactivated bounce
    async fn activate_bounce(
        &self,
        bounce_id: u64,
        options: &ResolvedOptions,
    ) -> Result<BounceActivation, PostmarkError>;
}
