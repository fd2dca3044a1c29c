//! Per-call options and their merge with application configuration
//!
//! Every forwarding operation accepts [`CallOptions`]. Before a call reaches
//! the underlying client, the options are resolved against the application's
//! [`PostmarkConfig`] with a fixed precedence: explicit per-call value, then
//! configured value, then built-in default. Explicit values are never
//! overridden by configuration.

use serde::{Deserialize, Serialize};

use crate::config::PostmarkConfig;

/// Per-call overrides for a forwarded Postmark operation.
///
/// Any field left at `None` is filled from configuration when the call is
/// made. Extra HTTP headers are passed through to the transport untouched.
///
/// ```rust
/// use axum_postmark::options::CallOptions;
///
/// let options = CallOptions::default().secure(false);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Override the configured server API token for this call
    pub api_key: Option<String>,
    /// Override the HTTPS flag for this call
    pub secure: Option<bool>,
    /// Override the sandbox-mode flag for this call
    pub test: Option<bool>,
    /// Extra HTTP request headers, passed through to the transport
    pub headers: Vec<(String, String)>,
}

impl CallOptions {
    /// Override the server API token
    #[must_use]
    pub fn api_key<T: Into<String>>(mut self, api_key: T) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the HTTPS flag
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Override the sandbox-mode flag
    #[must_use]
    pub fn test(mut self, test: bool) -> Self {
        self.test = Some(test);
        self
    }

    /// Add an extra HTTP request header
    #[must_use]
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Merge these options with the application configuration.
    ///
    /// `api_key` falls back to the configured token (it has no built-in
    /// default); `secure` falls back to `config.https`, itself defaulting
    /// to `true`; `test` falls back to `config.test_api`, itself defaulting
    /// to `false`.
    #[must_use]
    pub fn resolve(self, config: &PostmarkConfig) -> ResolvedOptions {
        ResolvedOptions {
            api_key: self.api_key.unwrap_or_else(|| config.api_key.clone()),
            secure: self.secure.unwrap_or(config.https),
            test: self.test.unwrap_or(config.test_api),
            headers: self.headers,
        }
    }
}

/// Fully-merged options handed to the underlying client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    /// Server API token to authenticate with
    pub api_key: String,
    /// Talk to the API over HTTPS
    pub secure: bool,
    /// Use Postmark's sandbox mode
    pub test: bool,
    /// Extra HTTP request headers
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_config() {
        let config = PostmarkConfig::new("xxx");
        let resolved = CallOptions::default().resolve(&config);
        assert_eq!(resolved.api_key, "xxx");
        assert!(resolved.secure);
        assert!(!resolved.test);
        assert!(resolved.headers.is_empty());
    }

    #[test]
    fn configured_values_beat_builtin_defaults() {
        let mut config = PostmarkConfig::new("xxx");
        config.https = false;
        config.test_api = true;
        let resolved = CallOptions::default().resolve(&config);
        assert!(!resolved.secure);
        assert!(resolved.test);
    }

    #[test]
    fn explicit_values_beat_configured_values() {
        let mut config = PostmarkConfig::new("xxx");
        config.https = false;
        config.test_api = true;
        let resolved = CallOptions::default()
            .api_key("zzz")
            .secure(true)
            .test(false)
            .resolve(&config);
        assert_eq!(resolved.api_key, "zzz");
        assert!(resolved.secure);
        assert!(!resolved.test);
    }

    #[test]
    fn passthrough_headers_are_preserved() {
        let config = PostmarkConfig::new("xxx");
        let resolved = CallOptions::default().header("a", "b").resolve(&config);
        assert_eq!(resolved.headers, vec![("a".to_string(), "b".to_string())]);
    }
}
