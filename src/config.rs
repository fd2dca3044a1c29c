//! Application-level Postmark configuration
//!
//! Configuration is an explicit struct with named fields rather than a
//! free-form key/value mapping. Every field except the server API key has a
//! built-in default, and per-call options always take precedence over
//! configured values (see [`CallOptions`](crate::options::CallOptions)).
//!
//! Configuration can be built in code or loaded with figment, merging a TOML
//! file with `POSTMARK_`-prefixed environment variables (environment wins):
//!
//! ```toml
//! # postmark.toml
//! api_key = "server-token"
//! default_sender = "noreply@example.com"
//! verify_messages = true
//! ```
//!
//! ```rust,no_run
//! use axum_postmark::config::PostmarkConfig;
//!
//! # fn example() -> Result<(), axum_postmark::PostmarkError> {
//! let config = PostmarkConfig::load("./postmark.toml")?;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::PostmarkError;
use crate::message::Header;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "POSTMARK_";

/// Postmark settings owned by the host application.
///
/// The adapter reads these on every call, so a host that mutates its
/// configuration at runtime (test suites flipping `testing`, for example)
/// sees the change take effect immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmarkConfig {
    /// Postmark server API token. Required; there is no built-in default.
    pub api_key: String,

    /// Use HTTPS when talking to the Postmark API
    #[serde(default = "default_true")]
    pub https: bool,

    /// Use Postmark's sandbox mode for every call unless overridden
    #[serde(default)]
    pub test_api: bool,

    /// Sender address applied to messages built without one
    #[serde(default)]
    pub default_sender: Option<String>,

    /// Reply-To address applied to messages built without one
    #[serde(default)]
    pub default_reply_to: Option<String>,

    /// Headers applied to messages built without any
    #[serde(default)]
    pub default_headers: Option<Vec<Header>>,

    /// Verify messages at construction time
    #[serde(default)]
    pub verify_messages: bool,

    /// Generic testing flag: buffer sent messages into the adapter outbox
    #[serde(default)]
    pub testing: bool,
}

const fn default_true() -> bool {
    true
}

impl PostmarkConfig {
    /// Create a configuration with the given server token and every other
    /// field at its built-in default.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use axum_postmark::config::PostmarkConfig;
    ///
    /// let config = PostmarkConfig::new("server-token");
    /// assert!(config.https);
    /// assert!(!config.test_api);
    /// ```
    #[must_use]
    pub fn new<T: Into<String>>(api_key: T) -> Self {
        Self {
            api_key: api_key.into(),
            https: true,
            test_api: false,
            default_sender: None,
            default_reply_to: None,
            default_headers: None,
            verify_messages: false,
            testing: false,
        }
    }

    /// Load configuration from a TOML file merged with `POSTMARK_`
    /// environment variables. Environment variables take precedence.
    ///
    /// # Errors
    ///
    /// Returns `PostmarkError::Config` if the file cannot be parsed or the
    /// merged configuration is missing `api_key`.
    pub fn load(path: &str) -> Result<Self, PostmarkError> {
        let config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from `POSTMARK_` environment variables only.
    ///
    /// # Errors
    ///
    /// Returns `PostmarkError::Config` if `POSTMARK_API_KEY` is not set.
    pub fn from_env() -> Result<Self, PostmarkError> {
        let config = Figment::new().merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_builtin_defaults() {
        let config = PostmarkConfig::new("xxx");
        assert_eq!(config.api_key, "xxx");
        assert!(config.https);
        assert!(!config.test_api);
        assert_eq!(config.default_sender, None);
        assert_eq!(config.default_reply_to, None);
        assert_eq!(config.default_headers, None);
        assert!(!config.verify_messages);
        assert!(!config.testing);
    }

    #[test]
    fn load_from_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "postmark.toml",
                r#"
                    api_key = "xxx"
                    https = false
                    default_sender = "me@example.com"

                    [[default_headers]]
                    name = "X-Origin"
                    value = "web"
                "#,
            )?;

            let config = PostmarkConfig::load("postmark.toml").expect("config loads");
            assert_eq!(config.api_key, "xxx");
            assert!(!config.https);
            assert_eq!(config.default_sender.as_deref(), Some("me@example.com"));
            let headers = config.default_headers.expect("headers configured");
            assert_eq!(headers, vec![Header::new("X-Origin", "web")]);
            // Unconfigured fields keep their built-in defaults.
            assert!(!config.test_api);
            assert!(!config.verify_messages);
            assert!(!config.testing);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("postmark.toml", r#"api_key = "from-file""#)?;
            jail.set_env("POSTMARK_API_KEY", "from-env");
            jail.set_env("POSTMARK_TEST_API", "true");

            let config = PostmarkConfig::load("postmark.toml").expect("config loads");
            assert_eq!(config.api_key, "from-env");
            assert!(config.test_api);
            Ok(())
        });
    }

    #[test]
    fn missing_api_key_is_an_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("postmark.toml", r#"https = false"#)?;
            assert!(PostmarkConfig::load("postmark.toml").is_err());
            Ok(())
        });
    }
}
