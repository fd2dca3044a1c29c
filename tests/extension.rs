//! Integration tests for the axum binding
//!
//! Drives a real router with the adapter attached as an extension and
//! asserts on the outbox and the calls captured by the recording client.

use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Extension, Router};
use axum_postmark::testing::RecordingApi;
use axum_postmark::{CallOptions, Message, Postmark, PostmarkConfig};
use axum_test::TestServer;

async fn signup(Extension(postmark): Extension<Postmark>) -> StatusCode {
    let message = postmark
        .compose(
            Message::builder()
                .sender("noreply@example.com")
                .to("user@example.com")
                .subject("Welcome!")
                .text_body("Glad you're here."),
        )
        .expect("message builds");

    match postmark.send(message, CallOptions::default()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::BAD_GATEWAY,
    }
}

fn test_app(config: PostmarkConfig) -> (TestServer, Postmark, RecordingApi) {
    let api = RecordingApi::new();
    let postmark = Postmark::with_client(config, Arc::new(api.clone()));

    let app: Router = postmark
        .clone()
        .attach(Router::new().route("/signup", post(signup)));
    let server = TestServer::new(app).expect("server builds");

    (server, postmark, api)
}

#[tokio::test]
async fn handler_reaches_the_adapter_through_the_extension() {
    let (server, postmark, api) = test_app(PostmarkConfig::new("xxx"));

    server.post("/signup").await.assert_status_ok();

    assert_eq!(api.call_count(), 1);
    assert!(api.was_sent_to("user@example.com"));
    let call = api.last_call().unwrap();
    assert_eq!(call.options.api_key, "xxx");
    assert!(call.options.secure);
    assert!(!call.options.test);
    // Testing flag is off, so nothing is buffered.
    assert!(postmark.outbox().is_empty());
}

#[tokio::test]
async fn testing_mode_buffers_messages_sent_by_handlers() {
    let mut config = PostmarkConfig::new("xxx");
    config.testing = true;
    let (server, postmark, api) = test_app(config);

    server.post("/signup").await.assert_status_ok();
    server.post("/signup").await.assert_status_ok();

    let outbox = postmark.outbox();
    assert_eq!(outbox.len(), 2);
    assert_eq!(outbox[0].to, vec!["user@example.com"]);
    assert_eq!(outbox[0], outbox[1]);
    // Buffering is additive: the client was still invoked each time.
    assert_eq!(api.call_count(), 2);
}

#[tokio::test]
async fn client_failures_surface_to_the_handler() {
    let (server, postmark, api) = test_app(PostmarkConfig::new("xxx"));
    api.fail_next();

    server
        .post("/signup")
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
    assert!(postmark.outbox().is_empty());
}

#[tokio::test]
async fn configured_defaults_apply_to_handler_messages() {
    let mut config = PostmarkConfig::new("xxx");
    config.testing = true;
    config.default_reply_to = Some("support@example.com".into());
    let (server, postmark, _api) = test_app(config);

    server.post("/signup").await.assert_status_ok();

    let outbox = postmark.outbox();
    // The handler sets the sender explicitly; reply_to comes from config.
    assert_eq!(outbox[0].sender.as_deref(), Some("noreply@example.com"));
    assert_eq!(outbox[0].reply_to.as_deref(), Some("support@example.com"));
}
