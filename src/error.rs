//! Error types

use thiserror::Error;

/// Errors surfaced by the adapter and the underlying Postmark client.
///
/// The adapter performs no retries and no error translation: transport and
/// API failures are reported exactly as the client saw them.
#[derive(Debug, Error)]
pub enum PostmarkError {
    /// Message has no recipients
    #[error("message must have at least one recipient")]
    NoRecipients,

    /// Message has no sender address
    #[error("message must have a sender address")]
    NoSender,

    /// Message has no body content
    #[error("message must have either a text or an HTML body")]
    NoContent,

    /// Message addresses more recipients than Postmark accepts per call
    #[error("message has {0} recipients, Postmark allows at most 50")]
    TooManyRecipients(usize),

    /// HTTP transport error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error response from the Postmark API
    #[error("Postmark API error {error_code} (HTTP {status}): {message}")]
    Api {
        /// HTTP status of the response
        status: u16,
        /// Postmark `ErrorCode` from the response body
        error_code: i64,
        /// Postmark `Message` from the response body
        message: String,
    },

    /// Configuration loading or extraction error
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl PostmarkError {
    /// Create an API error from a response body
    #[must_use]
    pub fn api<T: Into<String>>(status: u16, error_code: i64, message: T) -> Self {
        Self::Api {
            status,
            error_code,
            message: message.into(),
        }
    }
}
