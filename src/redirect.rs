//! Outbound HTTP client used by redirect resolution.
//!
//! Sub-resource redirects leave the process boundary: the matched target is
//! fetched with a real HTTP call and its body replaces the response data.
//! [`RedirectClient`] is the collaborator that performs that call. It only
//! speaks GET, POST and DELETE — the three methods a redirect may carry —
//! and sends the inbound query parameters as a form-encoded payload.
//!
//! TLS certificate validation is on; the client uses rustls and a
//! per-request timeout so a stalled target cannot stall the caller forever.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::context::Method;

/// Default timeout applied to outbound redirect calls.
pub const DEFAULT_REDIRECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by the outbound redirect client.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// The inbound method cannot be forwarded to a redirect target.
    #[error("Cannot redirect with method {method}; only get, post and delete are supported.")]
    UnsupportedMethod {
        /// The method that was rejected.
        method: String,
    },

    /// Network or connection error while calling the target.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// HTTP client for forwarding a request to a redirect target.
///
/// # Example
///
/// ```rust,no_run
/// use std::collections::HashMap;
/// use restkit::{Method, RedirectClient};
///
/// # async fn example() -> Result<(), restkit::RedirectError> {
/// let client = RedirectClient::new();
/// let body = client
///     .send(Method::Get, "https://ws.example.com/groups/1", &HashMap::new(), None)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RedirectClient {
    client: reqwest::Client,
}

// Verify RedirectClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RedirectClient>();
};

impl RedirectClient {
    /// Creates a client with the default timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created, which only
    /// happens on TLS initialization failure.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REDIRECT_TIMEOUT)
    }

    /// Creates a client with an explicit timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Forwards a request to the redirect target and returns the body.
    ///
    /// The query parameters travel as a form-encoded payload and the
    /// client's accept header is passed through when present.
    ///
    /// # Errors
    ///
    /// Returns [`RedirectError::UnsupportedMethod`] for any method other
    /// than GET, POST or DELETE, and [`RedirectError::Network`] when the
    /// call itself fails or times out.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        params: &HashMap<String, String>,
        accept: Option<&str>,
    ) -> Result<String, RedirectError> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
            other => {
                return Err(RedirectError::UnsupportedMethod {
                    method: other.to_string(),
                })
            }
        };

        if let Some(accept) = accept {
            request = request.header("Accept", accept);
        }

        tracing::debug!(%method, url, "forwarding request to redirect target");

        let response = request.form(params).send().await?;
        let body = response.text().await?;
        Ok(body)
    }
}

impl Default for RedirectClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_is_rejected_before_any_network_activity() {
        let client = RedirectClient::new();
        let result = client
            .send(Method::Put, "http://unreachable.invalid/", &HashMap::new(), None)
            .await;

        assert!(matches!(
            result,
            Err(RedirectError::UnsupportedMethod { method }) if method == "put"
        ));
    }

    #[test]
    fn test_unsupported_method_message_names_the_method() {
        let error = RedirectError::UnsupportedMethod {
            method: "put".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot redirect with method put; only get, post and delete are supported."
        );
    }

    #[test]
    fn test_default_client_can_be_constructed() {
        let _ = RedirectClient::default();
    }
}
