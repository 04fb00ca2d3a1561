//! The inbound request: method, path, query parameters and redirects.
//!
//! Everything the toolkit needs to know about the inbound call is carried
//! by an explicit, immutable [`RequestContext`] — there is no ambient
//! request state. The context is built once per call with
//! [`RequestContext::builder`] and handed to every operation that needs it.
//!
//! # Path anatomy
//!
//! A resource path has up to three segments:
//!
//! ```text
//! /documentations/1/groups
//!  └─ resource ──┘ │ └─ relation
//!                  └─ id
//! ```
//!
//! # Example
//!
//! ```rust
//! use restkit::{Method, RequestContext, RequestPath};
//!
//! let context = RequestContext::builder(Method::Get)
//!     .path(RequestPath::parse("/items/5"))
//!     .host("ws.example.com")
//!     .uri("/api/items/5")
//!     .build();
//!
//! assert_eq!(context.path().resource(), Some("items"));
//! assert_eq!(context.path().id(), Some("5"));
//! assert_eq!(context.path().relation(), None);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::redirect::{RedirectClient, RedirectError};
use crate::response::Response;

/// Placeholder substituted with the path id when matching redirect
/// patterns.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Query parameter whose presence requests an abbreviated serialization.
pub const SUMMARY_PARAM: &str = "summary";

/// HTTP methods understood by the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// The parsed resource path of an inbound request.
///
/// Derived once from the raw segments and immutable afterwards. The first
/// three segments address the resource, the record id and the sub-resource
/// relation; accessors return `None` for absent segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
}

impl RequestPath {
    /// Parses a slash-delimited path, dropping empty segments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use restkit::RequestPath;
    ///
    /// let path = RequestPath::parse("/documentations/1/groups");
    /// assert_eq!(path.resource(), Some("documentations"));
    /// assert_eq!(path.id(), Some("1"));
    /// assert_eq!(path.relation(), Some("groups"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Builds a path from pre-split segments.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The resource segment (segment 0).
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// The id segment (segment 1).
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// The sub-resource relation segment (segment 2).
    #[must_use]
    pub fn relation(&self) -> Option<&str> {
        self.segments.get(2).map(String::as_str)
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` when the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Outcome of a redirect resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The path carries no relation segment; nothing to redirect. Callers
    /// usually map this to 404.
    NoRelation,
    /// No mapping entry matched (or no target URL could be built); the
    /// response was set to 404.
    NoMatch,
    /// An outbound call was performed and the response updated — with the
    /// target's body on success, with 404 on an empty or failed result.
    Completed,
}

/// The immutable context of one inbound call.
///
/// Scoped to exactly one request; never shared or reused across calls.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: RequestPath,
    params: HashMap<String, String>,
    host: Option<String>,
    uri: String,
    accept: Option<String>,
    scheme: String,
}

impl RequestContext {
    /// Creates a builder for a request with the given method.
    #[must_use]
    pub fn builder(method: Method) -> RequestContextBuilder {
        RequestContextBuilder::new(method)
    }

    /// The inbound HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The parsed resource path.
    #[must_use]
    pub const fn path(&self) -> &RequestPath {
        &self.path
    }

    /// The inbound query parameters.
    #[must_use]
    pub const fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// The inbound host, when the transport supplied one.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The raw request URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The client's accept header, when present.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    /// The scheme used when building redirect target URLs.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether the request asked for an abbreviated serialization.
    #[must_use]
    pub fn summary_requested(&self) -> bool {
        self.params.contains_key(SUMMARY_PARAM)
    }

    /// The query parameters minus the named keys.
    #[must_use]
    pub fn params_without(&self, keys: &[&str]) -> HashMap<String, String> {
        self.params
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The query parameters with the summary marker stripped, ready to use
    /// as a store filter.
    #[must_use]
    pub fn filter_params(&self) -> HashMap<String, String> {
        self.params_without(&[SUMMARY_PARAM])
    }

    /// Checks a caller-evaluated precondition.
    ///
    /// Returns `true` without touching the response when the precondition
    /// holds; otherwise transitions the response to 400 Bad Request and
    /// returns `false`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use restkit::{Method, RequestContext, Response};
    ///
    /// let context = RequestContext::builder(Method::Get).build();
    /// let mut response = Response::new();
    ///
    /// assert!(context.validate(true, &mut response));
    /// assert_eq!(response.http_code(), 200);
    ///
    /// assert!(!context.validate(false, &mut response));
    /// assert_eq!(response.http_code(), 400);
    /// ```
    pub fn validate(&self, is_valid: bool, response: &mut Response) -> bool {
        if is_valid {
            true
        } else {
            response.bad_request("", Value::Array(Vec::new()));
            false
        }
    }

    /// Resolves a sub-resource redirect against a pattern mapping.
    ///
    /// Requires a relation segment; without one the resolution is skipped
    /// entirely. Each `(pattern, target)` pair is tried in declaration
    /// order: the pattern — with [`ID_PLACEHOLDER`] substituted by the path
    /// id — must equal `"{id}/{relation}"` exactly. The first match wins.
    ///
    /// On a match the target is resolved into an absolute URL under the
    /// request's host and path prefix and fetched with the inbound method;
    /// the body replaces the response data. An empty or failed body yields
    /// 404 with an empty payload.
    ///
    /// # Errors
    ///
    /// Returns [`RedirectError::UnsupportedMethod`] when the inbound method
    /// is not GET, POST or DELETE. Network failures are absorbed into a 404
    /// response, not surfaced as errors.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use restkit::{Method, RedirectClient, RequestContext, RequestPath, Response};
    ///
    /// # async fn example() -> Result<(), restkit::RedirectError> {
    /// let context = RequestContext::builder(Method::Get)
    ///     .path(RequestPath::parse("/documentations/7/groups"))
    ///     .host("ws.example.com")
    ///     .uri("/docs/documentations/7/groups")
    ///     .build();
    ///
    /// let mut response = Response::new();
    /// let client = RedirectClient::new();
    /// let outcome = context
    ///     .resolve_redirect(&[("{id}/groups", "/groups/1")], &client, &mut response)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve_redirect(
        &self,
        mapping: &[(&str, &str)],
        client: &RedirectClient,
        response: &mut Response,
    ) -> Result<RedirectOutcome, RedirectError> {
        let (Some(id), Some(relation)) = (self.path.id(), self.path.relation()) else {
            return Ok(RedirectOutcome::NoRelation);
        };

        let requested = format!("{id}/{relation}");
        let target = mapping.iter().find_map(|(pattern, target)| {
            let candidate = pattern.trim_matches('/').replace(ID_PLACEHOLDER, id);
            (candidate == requested).then_some(*target)
        });

        let Some(target) = target else {
            response.not_found("", Value::Array(Vec::new()));
            return Ok(RedirectOutcome::NoMatch);
        };
        let Some(url) = self.redirect_url(target) else {
            response.not_found("", Value::Array(Vec::new()));
            return Ok(RedirectOutcome::NoMatch);
        };

        match client
            .send(self.method, &url, &self.params, self.accept.as_deref())
            .await
        {
            Ok(body) if body.is_empty() => {
                response.not_found("", Value::Array(Vec::new()));
                Ok(RedirectOutcome::Completed)
            }
            Ok(body) => {
                response.set_data(Value::String(body));
                Ok(RedirectOutcome::Completed)
            }
            Err(error @ RedirectError::UnsupportedMethod { .. }) => Err(error),
            Err(error) => {
                tracing::warn!(%error, url = %url, "redirect target call failed");
                response.not_found("", Value::Array(Vec::new()));
                Ok(RedirectOutcome::Completed)
            }
        }
    }

    /// Builds the absolute URL for a redirect target: scheme, host, the
    /// part of the raw URI before the resource segment, then the target.
    fn redirect_url(&self, target: &str) -> Option<String> {
        let resource = self.path.resource()?;
        let host = self.host.as_deref()?;
        let prefix = self
            .uri
            .find(resource)
            .map_or("/", |position| &self.uri[..position]);

        Some(format!(
            "{}://{host}{prefix}{}",
            self.scheme,
            target.trim_start_matches('/')
        ))
    }
}

/// Builder for [`RequestContext`] instances.
#[derive(Debug)]
pub struct RequestContextBuilder {
    method: Method,
    path: RequestPath,
    params: HashMap<String, String>,
    host: Option<String>,
    uri: String,
    accept: Option<String>,
    scheme: String,
}

impl RequestContextBuilder {
    fn new(method: Method) -> Self {
        Self {
            method,
            path: RequestPath::default(),
            params: HashMap::new(),
            host: None,
            uri: String::new(),
            accept: None,
            scheme: "https".to_string(),
        }
    }

    /// Sets the parsed resource path.
    #[must_use]
    pub fn path(mut self, path: RequestPath) -> Self {
        self.path = path;
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets the inbound host used for redirect URLs.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the raw request URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Sets the client's accept header.
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Overrides the scheme used for redirect target URLs (default
    /// `https`).
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Builds the immutable context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method,
            path: self.path,
            params: self.params,
            host: self.host,
            uri: self.uri,
            accept: self.accept,
            scheme: self.scheme,
        }
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Method>();
    assert_send_sync::<RequestPath>();
    assert_send_sync::<RequestContext>();
    assert_send_sync::<RedirectOutcome>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(path: &str) -> RequestContext {
        RequestContext::builder(Method::Get)
            .path(RequestPath::parse(path))
            .build()
    }

    #[test]
    fn test_path_segments_map_to_resource_id_relation() {
        let path = RequestPath::parse("/documentations/1/groups");

        assert_eq!(path.resource(), Some("documentations"));
        assert_eq!(path.id(), Some("1"));
        assert_eq!(path.relation(), Some("groups"));
    }

    #[test]
    fn test_missing_segments_are_none() {
        let path = RequestPath::parse("items");
        assert_eq!(path.resource(), Some("items"));
        assert_eq!(path.id(), None);
        assert_eq!(path.relation(), None);

        let empty = RequestPath::parse("");
        assert!(empty.is_empty());
        assert_eq!(empty.resource(), None);
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        let path = RequestPath::parse("//items//5/");
        assert_eq!(path.segments(), &["items".to_string(), "5".to_string()]);
    }

    #[test]
    fn test_resource_is_present_for_any_non_empty_path() {
        for raw in ["a", "/a", "a/b", "/a/b/c/d"] {
            assert!(RequestPath::parse(raw).resource().is_some(), "path {raw}");
        }
    }

    #[test]
    fn test_from_segments_preserves_order() {
        let path = RequestPath::from_segments(["items", "5", "owners"]);
        assert_eq!(path.resource(), Some("items"));
        assert_eq!(path.id(), Some("5"));
        assert_eq!(path.relation(), Some("owners"));
    }

    #[test]
    fn test_validate_true_leaves_response_untouched() {
        let context = context_for("/items");
        let mut response = Response::new();

        assert!(context.validate(true, &mut response));
        assert_eq!(response.http_code(), 200);
        assert!(response.errors().is_empty());
    }

    #[test]
    fn test_validate_false_sets_400() {
        let context = context_for("/items");
        let mut response = Response::new();

        assert!(!context.validate(false, &mut response));
        assert_eq!(response.http_code(), 400);
        assert_eq!(response.errors()[0].code, 400);
    }

    #[test]
    fn test_summary_flag_follows_parameter_presence() {
        let with = RequestContext::builder(Method::Get)
            .param(SUMMARY_PARAM, "1")
            .build();
        assert!(with.summary_requested());

        let without = RequestContext::builder(Method::Get).build();
        assert!(!without.summary_requested());
    }

    #[test]
    fn test_params_without_strips_only_named_keys() {
        let context = RequestContext::builder(Method::Get)
            .param("summary", "1")
            .param("name", "x")
            .build();

        let filtered = context.params_without(&["summary"]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("name"), Some(&"x".to_string()));
    }

    #[test]
    fn test_filter_params_strips_summary_marker() {
        let context = RequestContext::builder(Method::Get)
            .param("summary", "")
            .param("owner", "7")
            .build();

        let filter = context.filter_params();
        assert!(!filter.contains_key("summary"));
        assert_eq!(filter.get("owner"), Some(&"7".to_string()));
    }

    #[test]
    fn test_redirect_url_keeps_uri_prefix_before_resource() {
        let context = RequestContext::builder(Method::Get)
            .path(RequestPath::parse("/documentations/1/groups"))
            .host("ws.example.com")
            .uri("/docs/documentations/1/groups")
            .build();

        assert_eq!(
            context.redirect_url("/groups/1"),
            Some("https://ws.example.com/docs/groups/1".to_string())
        );
    }

    #[test]
    fn test_redirect_url_respects_scheme_override() {
        let context = RequestContext::builder(Method::Get)
            .path(RequestPath::parse("/items/1/parts"))
            .host("127.0.0.1:9000")
            .uri("/items/1/parts")
            .scheme("http")
            .build();

        assert_eq!(
            context.redirect_url("/parts/2"),
            Some("http://127.0.0.1:9000/parts/2".to_string())
        );
    }

    #[test]
    fn test_redirect_url_requires_host() {
        let context = context_for("/items/1/parts");
        assert!(context.redirect_url("/parts/2").is_none());
    }

    #[tokio::test]
    async fn test_redirect_without_relation_is_skipped() {
        let context = context_for("/items/1");
        let client = RedirectClient::new();
        let mut response = Response::new();

        let outcome = context
            .resolve_redirect(&[("{id}/groups", "/groups/1")], &client, &mut response)
            .await
            .unwrap();

        assert_eq!(outcome, RedirectOutcome::NoRelation);
        assert_eq!(response.http_code(), 200);
    }

    #[tokio::test]
    async fn test_redirect_without_matching_pattern_sets_404() {
        let context = RequestContext::builder(Method::Get)
            .path(RequestPath::parse("/items/7/members"))
            .host("ws.example.com")
            .uri("/items/7/members")
            .build();
        let client = RedirectClient::new();
        let mut response = Response::new();

        let outcome = context
            .resolve_redirect(&[("{id}/groups", "/groups/1")], &client, &mut response)
            .await
            .unwrap();

        assert_eq!(outcome, RedirectOutcome::NoMatch);
        assert_eq!(response.http_code(), 404);
    }

    #[tokio::test]
    async fn test_redirect_without_host_sets_404() {
        let context = context_for("/items/7/groups");
        let client = RedirectClient::new();
        let mut response = Response::new();

        let outcome = context
            .resolve_redirect(&[("{id}/groups", "/groups/1")], &client, &mut response)
            .await
            .unwrap();

        assert_eq!(outcome, RedirectOutcome::NoMatch);
        assert_eq!(response.http_code(), 404);
    }

    #[tokio::test]
    async fn test_redirect_with_put_propagates_unsupported_method() {
        let context = RequestContext::builder(Method::Put)
            .path(RequestPath::parse("/items/7/groups"))
            .host("ws.example.com")
            .uri("/items/7/groups")
            .build();
        let client = RedirectClient::new();
        let mut response = Response::new();

        let result = context
            .resolve_redirect(&[("{id}/groups", "/groups/1")], &client, &mut response)
            .await;

        assert!(matches!(
            result,
            Err(RedirectError::UnsupportedMethod { method }) if method == "put"
        ));
    }

    #[test]
    fn test_method_display_is_lowercase() {
        assert_eq!(Method::Get.to_string(), "get");
        assert_eq!(Method::Post.to_string(), "post");
        assert_eq!(Method::Put.to_string(), "put");
        assert_eq!(Method::Delete.to_string(), "delete");
    }
}
