//! axum-postmark: Postmark transactional email for axum applications
//!
//! A thin adapter that binds a Postmark API client into axum's extension
//! convention. The adapter registers on a [`Router`](axum::Router), fills
//! per-call options and message fields from application configuration
//! (explicit values always win over configured defaults), and forwards every
//! operation to the underlying client unchanged. When the application's
//! generic `testing` flag is set, sent messages are additionally buffered
//! into an in-process outbox for test assertions.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{routing::post, Extension, Router};
//! use axum_postmark::{CallOptions, Message, Postmark, PostmarkConfig};
//!
//! async fn signup(Extension(postmark): Extension<Postmark>) {
//!     let message = postmark
//!         .compose(
//!             Message::builder()
//!                 .to("user@example.com")
//!                 .subject("Welcome!")
//!                 .text_body("Glad you're here."),
//!         )
//!         .expect("message builds");
//!
//!     if let Err(error) = postmark.send(message, CallOptions::default()).await {
//!         tracing::error!(%error, "welcome email failed");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), axum_postmark::PostmarkError> {
//!     let config = PostmarkConfig::load("./postmark.toml")?;
//!     let postmark = Postmark::new(config);
//!
//!     let app: Router = postmark
//!         .clone()
//!         .attach(Router::new().route("/signup", post(signup)));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Set `testing = true` in the configuration and assert on
//! [`Postmark::outbox`], or swap in a
//! [`RecordingApi`](testing::RecordingApi) to inspect the merged options of
//! every forwarded call.

pub mod api;
pub mod config;
pub mod error;
pub mod message;
pub mod options;
pub mod testing;

mod adapter;

pub use adapter::Postmark;
pub use config::PostmarkConfig;
pub use error::PostmarkError;
pub use message::{Attachment, Header, Message, MessageBuilder};
pub use options::CallOptions;

pub mod prelude {
    //! Convenience re-exports for common types

    pub use crate::api::{HttpClient, PostmarkApi, SendResponse};
    pub use crate::config::PostmarkConfig;
    pub use crate::error::PostmarkError;
    pub use crate::message::{Attachment, Header, Message, MessageBuilder};
    pub use crate::options::{CallOptions, ResolvedOptions};
    pub use crate::Postmark;
}
