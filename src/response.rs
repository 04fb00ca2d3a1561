//! Response builder with HTTP status semantics.
//!
//! This module provides the [`Response`] type, a per-call builder that
//! accumulates the payload, status, message, content type and error list of
//! one outgoing response.
//!
//! # Status setters
//!
//! Every status transition goes through a named setter (`ok`,
//! `bad_request`, `not_found`, ...). Each setter stores the payload and the
//! message — falling back to the default message of the
//! [`Status`] when the caller passes an empty one — and, for every code at
//! or above 400 except 500, appends an [`ApiError`] to the error list. That
//! asymmetry for 500 is observable contract.
//!
//! # Payload visibility
//!
//! [`Response::data`] exposes the stored payload only while the status code
//! is below 400; for failure statuses it exposes the serialized error list
//! instead.
//!
//! # Example
//!
//! ```rust
//! use restkit::Response;
//! use serde_json::json;
//!
//! let mut response = Response::new();
//! assert_eq!(response.http_code(), 200);
//!
//! response.set_data(json!({"id": 5}));
//! assert_eq!(response.data(), json!({"id": 5}));
//! assert_eq!(response.content_type(), Some("application/json"));
//!
//! response.not_found("", json!([]));
//! assert_eq!(response.http_code(), 404);
//! // data() now yields the error list, not the payload
//! assert_eq!(response.data()[0]["code"], 404);
//! ```

use serde_json::Value;

use crate::error::{ApiError, Status};
use crate::format::CONTENT_TYPE_JSON;

/// A mutable response being assembled for one inbound call.
///
/// The builder is scoped to exactly one call and must never be shared
/// across requests; create a fresh one per call.
#[derive(Debug, Clone, Default)]
pub struct Response {
    data: Value,
    errors: Vec<ApiError>,
    status: Status,
    message: String,
    content_type: Option<String>,
}

impl Response {
    /// Creates an empty response with status 200 OK and no payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the payload and pins the default `application/json` content
    /// type.
    pub fn set_data(&mut self, data: Value) {
        self.set_data_as(data, CONTENT_TYPE_JSON);
    }

    /// Stores the payload together with an explicit content type.
    pub fn set_data_as(&mut self, data: Value, content_type: &str) {
        self.content_type = Some(content_type.to_string());
        self.data = data;
    }

    /// Returns the payload for the wire.
    ///
    /// While the status code is below 400 this is the stored payload; at or
    /// above 400 it is the serialized error list, regardless of what was
    /// stored.
    #[must_use]
    pub fn data(&self) -> Value {
        if self.status.code() < 400 {
            self.data.clone()
        } else {
            ApiError::to_values(&self.errors)
        }
    }

    /// Returns the pinned content type, if one has been set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Pins the content type without touching the payload.
    pub fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the numeric HTTP status code.
    #[must_use]
    pub const fn http_code(&self) -> u16 {
        self.status.code()
    }

    /// Sets the status directly, bypassing message and error bookkeeping.
    ///
    /// Prefer the named setters; this exists for callers that manage the
    /// message and error list themselves.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Returns the response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sets the response message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Returns the collected errors in insertion order.
    #[must_use]
    pub fn errors(&self) -> &[ApiError] {
        &self.errors
    }

    /// Appends an error to the list.
    pub fn add_error(&mut self, error: ApiError) {
        self.errors.push(error);
    }

    /// Replaces the error list.
    pub fn set_errors(&mut self, errors: Vec<ApiError>) {
        self.errors = errors;
    }

    /// Picks the response content type from the client's accept signal.
    ///
    /// A previously pinned content type always wins. Without an accept
    /// signal the first allowed type is pinned; with one, the
    /// comma-separated accept tokens are scanned in order and the first one
    /// present in `allowed` is pinned. When nothing matches (or nothing is
    /// allowed), the response transitions to 415 and `None` is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use restkit::Response;
    ///
    /// let mut response = Response::new();
    /// let picked = response.negotiate_content_type(
    ///     &["application/json", "application/xml"],
    ///     Some("application/xml, text/plain"),
    /// );
    /// assert_eq!(picked.as_deref(), Some("application/xml"));
    /// assert_eq!(response.content_type(), Some("application/xml"));
    /// ```
    pub fn negotiate_content_type(
        &mut self,
        allowed: &[&str],
        accept: Option<&str>,
    ) -> Option<String> {
        if let Some(pinned) = &self.content_type {
            return Some(pinned.clone());
        }
        let Some(accept) = accept else {
            if let Some(first) = allowed.first() {
                self.content_type = Some((*first).to_string());
                return Some((*first).to_string());
            }
            self.unsupported_media_type("", Value::Array(Vec::new()));
            return None;
        };
        for token in accept.split(',').map(str::trim) {
            if allowed.contains(&token) {
                self.content_type = Some(token.to_string());
                return Some(token.to_string());
            }
        }
        self.unsupported_media_type("", Value::Array(Vec::new()));
        None
    }

    fn transition(&mut self, status: Status, message: &str, data: Value) {
        self.status = status;
        self.data = data;
        self.message = if message.is_empty() {
            status.default_message().to_string()
        } else {
            message.to_string()
        };
        // 500 intentionally stays off the error list
        if status.is_error() && status != Status::InternalServerError {
            self.errors
                .push(ApiError::for_status(status, self.message.clone()));
        }
    }

    /// Transitions to 200 OK.
    pub fn ok(&mut self, message: &str, data: Value) {
        self.transition(Status::Ok, message, data);
    }

    /// Transitions to 201 Created.
    pub fn created(&mut self, message: &str, data: Value) {
        self.transition(Status::Created, message, data);
    }

    /// Transitions to 204 No Content.
    pub fn no_content(&mut self, message: &str, data: Value) {
        self.transition(Status::NoContent, message, data);
    }

    /// Transitions to 304 Not Modified.
    pub fn not_modified(&mut self, message: &str, data: Value) {
        self.transition(Status::NotModified, message, data);
    }

    /// Transitions to 400 Bad Request and records the error.
    pub fn bad_request(&mut self, message: &str, data: Value) {
        self.transition(Status::BadRequest, message, data);
    }

    /// Transitions to 401 Unauthorized and records the error.
    pub fn unauthorized(&mut self, message: &str, data: Value) {
        self.transition(Status::Unauthorized, message, data);
    }

    /// Transitions to 403 Forbidden and records the error.
    pub fn forbidden(&mut self, message: &str, data: Value) {
        self.transition(Status::Forbidden, message, data);
    }

    /// Transitions to 404 Not Found and records the error.
    pub fn not_found(&mut self, message: &str, data: Value) {
        self.transition(Status::NotFound, message, data);
    }

    /// Transitions to 405 Method Not Allowed and records the error.
    pub fn method_not_allowed(&mut self, message: &str, data: Value) {
        self.transition(Status::MethodNotAllowed, message, data);
    }

    /// Transitions to 410 Gone and records the error.
    pub fn gone(&mut self, message: &str, data: Value) {
        self.transition(Status::Gone, message, data);
    }

    /// Transitions to 415 Unsupported Media Type and records the error.
    pub fn unsupported_media_type(&mut self, message: &str, data: Value) {
        self.transition(Status::UnsupportedMediaType, message, data);
    }

    /// Transitions to 422 Unprocessable Entity and records the error.
    pub fn unprocessable_entity(&mut self, message: &str, data: Value) {
        self.transition(Status::UnprocessableEntity, message, data);
    }

    /// Transitions to 429 Too Many Requests and records the error.
    pub fn too_many_requests(&mut self, message: &str, data: Value) {
        self.transition(Status::TooManyRequests, message, data);
    }

    /// Transitions to 500 Internal Server Error.
    ///
    /// Unlike the other failure setters this does NOT record an
    /// [`ApiError`]; the error list stays as it was.
    pub fn internal_server_error(&mut self, message: &str, data: Value) {
        self.transition(Status::InternalServerError, message, data);
    }
}

// Verify Response is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Response>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_response_defaults_to_200_with_null_payload() {
        let response = Response::new();

        assert_eq!(response.http_code(), 200);
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.data(), Value::Null);
        assert!(response.errors().is_empty());
        assert_eq!(response.message(), "");
        assert!(response.content_type().is_none());
    }

    #[test]
    fn test_set_data_pins_json_content_type() {
        let mut response = Response::new();
        response.set_data(json!({"id": 1}));

        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.data(), json!({"id": 1}));
    }

    #[test]
    fn test_set_data_as_pins_explicit_content_type() {
        let mut response = Response::new();
        response.set_data_as(json!("<root/>"), "application/xml");

        assert_eq!(response.content_type(), Some("application/xml"));
    }

    #[test]
    fn test_data_returns_error_list_at_and_above_400() {
        let mut response = Response::new();
        response.set_data(json!({"secret": true}));
        response.bad_request("broken filter", json!([]));

        let data = response.data();
        let list = data.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["code"], 400);
        assert_eq!(list[0]["msg"], "broken filter");
    }

    #[test]
    fn test_data_returns_payload_below_400() {
        for (status, expected) in [
            (Status::Ok, 200),
            (Status::Created, 201),
            (Status::NoContent, 204),
            (Status::NotModified, 304),
        ] {
            let mut response = Response::new();
            response.set_data(json!({"kept": true}));
            response.set_status(status);

            assert_eq!(response.http_code(), expected);
            assert_eq!(response.data(), json!({"kept": true}));
        }
    }

    #[test]
    fn test_empty_message_falls_back_to_default() {
        let mut response = Response::new();
        response.not_found("", json!([]));

        assert_eq!(response.message(), "Not Found");
        assert_eq!(response.errors()[0].msg, "Not Found");
    }

    #[test]
    fn test_custom_message_takes_precedence() {
        let mut response = Response::new();
        response.not_found("no such widget", json!([]));

        assert_eq!(response.message(), "no such widget");
        assert_eq!(response.errors()[0].msg, "no such widget");
    }

    #[test]
    fn test_every_client_error_setter_appends_an_error() {
        let setters: &[(fn(&mut Response, &str, Value), u16)] = &[
            (Response::bad_request, 400),
            (Response::unauthorized, 401),
            (Response::forbidden, 403),
            (Response::not_found, 404),
            (Response::method_not_allowed, 405),
            (Response::gone, 410),
            (Response::unsupported_media_type, 415),
            (Response::unprocessable_entity, 422),
            (Response::too_many_requests, 429),
        ];

        for (setter, code) in setters {
            let mut response = Response::new();
            setter(&mut response, "", json!([]));

            assert_eq!(response.http_code(), *code);
            assert_eq!(response.errors().len(), 1);
            assert_eq!(response.errors()[0].code, *code);
            assert!(response.errors()[0].url.ends_with(&format!("name={code}")));
        }
    }

    #[test]
    fn test_success_setters_do_not_append_errors() {
        let setters: &[(fn(&mut Response, &str, Value), u16)] = &[
            (Response::ok, 200),
            (Response::created, 201),
            (Response::no_content, 204),
            (Response::not_modified, 304),
        ];

        for (setter, code) in setters {
            let mut response = Response::new();
            setter(&mut response, "", json!([]));

            assert_eq!(response.http_code(), *code);
            assert!(response.errors().is_empty());
        }
    }

    #[test]
    fn test_internal_server_error_does_not_append_an_error() {
        let mut response = Response::new();
        response.internal_server_error("", json!([]));

        assert_eq!(response.http_code(), 500);
        assert_eq!(response.message(), "Internal Server Error");
        assert!(response.errors().is_empty());
        // with an empty error list, data() serializes to an empty array
        assert_eq!(response.data(), json!([]));
    }

    #[test]
    fn test_errors_accumulate_in_insertion_order() {
        let mut response = Response::new();
        response.bad_request("first", json!([]));
        response.not_found("second", json!([]));

        assert_eq!(response.errors().len(), 2);
        assert_eq!(response.errors()[0].code, 400);
        assert_eq!(response.errors()[1].code, 404);
    }

    #[test]
    fn test_negotiation_prefers_pinned_content_type() {
        let mut response = Response::new();
        response.set_content_type("application/xml");

        let picked = response.negotiate_content_type(&["application/json"], Some("text/html"));
        assert_eq!(picked.as_deref(), Some("application/xml"));
        assert_eq!(response.http_code(), 200);
    }

    #[test]
    fn test_negotiation_without_accept_picks_first_allowed() {
        let mut response = Response::new();

        let picked =
            response.negotiate_content_type(&["application/json", "application/xml"], None);
        assert_eq!(picked.as_deref(), Some("application/json"));
        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[test]
    fn test_negotiation_without_accept_and_nothing_allowed_triggers_415() {
        let mut response = Response::new();

        let picked = response.negotiate_content_type(&[], None);
        assert!(picked.is_none());
        assert_eq!(response.http_code(), 415);
        assert_eq!(response.errors()[0].code, 415);
    }

    #[test]
    fn test_negotiation_scans_accept_tokens_in_order() {
        let mut response = Response::new();

        let picked = response.negotiate_content_type(
            &["application/json", "application/xml"],
            Some("text/plain, application/xml, application/json"),
        );
        assert_eq!(picked.as_deref(), Some("application/xml"));
    }

    #[test]
    fn test_negotiation_with_no_matching_token_triggers_415() {
        let mut response = Response::new();

        let picked =
            response.negotiate_content_type(&["application/json"], Some("text/plain, image/png"));
        assert!(picked.is_none());
        assert_eq!(response.http_code(), 415);
    }

    #[test]
    fn test_set_errors_replaces_the_list() {
        let mut response = Response::new();
        response.bad_request("", json!([]));
        response.set_errors(vec![ApiError::for_status(Status::Gone, "gone")]);

        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].code, 410);
    }
}
