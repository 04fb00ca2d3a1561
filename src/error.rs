//! HTTP status semantics and the error value object.
//!
//! This module defines the closed set of status codes a [`Response`] can
//! carry, the default message and documentation URL attached to each, and
//! the [`ApiError`] value object that failure statuses append to the
//! response error list.
//!
//! # Status → message → doc-url table
//!
//! The table is part of the wire contract and must not drift:
//!
//! | Code | Default message | Doc URL suffix |
//! |------|------------------------|-------------|
//! | 400  | Bad Request            | `name=400`  |
//! | 401  | Unauthorized           | `name=401`  |
//! | 403  | Forbidden              | `name=403`  |
//! | 404  | Not Found              | `name=404`  |
//! | 405  | Method Not Allowed     | `name=405`  |
//! | 410  | Gone                   | `name=410`  |
//! | 415  | Unsupported Media Type | `name=415`  |
//! | 422  | Unprocessable Entity   | `name=422`  |
//! | 429  | Too Many Requests      | `name=429`  |
//!
//! 500 carries the default message "Internal Server Error" but no doc URL
//! and never appends an [`ApiError`].
//!
//! [`Response`]: crate::Response

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL for the error documentation pages linked from error payloads.
pub const ERROR_DOC_BASE: &str = "http://docs.dansnet.de/?search=";

/// The closed set of HTTP status codes a [`Response`](crate::Response) can
/// carry.
///
/// A response never holds an arbitrary integer code; every transition goes
/// through a named setter and lands on one of these variants.
///
/// # Example
///
/// ```rust
/// use restkit::Status;
///
/// assert_eq!(Status::NotFound.code(), 404);
/// assert_eq!(Status::NotFound.default_message(), "Not Found");
/// assert!(Status::NotFound.is_error());
/// assert!(!Status::Ok.is_error());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200 OK.
    #[default]
    Ok,
    /// 201 Created.
    Created,
    /// 204 No Content.
    NoContent,
    /// 304 Not Modified.
    NotModified,
    /// 400 Bad Request.
    BadRequest,
    /// 401 Unauthorized.
    Unauthorized,
    /// 403 Forbidden.
    Forbidden,
    /// 404 Not Found.
    NotFound,
    /// 405 Method Not Allowed.
    MethodNotAllowed,
    /// 410 Gone.
    Gone,
    /// 415 Unsupported Media Type.
    UnsupportedMediaType,
    /// 422 Unprocessable Entity.
    UnprocessableEntity,
    /// 429 Too Many Requests.
    TooManyRequests,
    /// 500 Internal Server Error.
    InternalServerError,
}

impl Status {
    /// Returns the numeric HTTP status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::NotModified => 304,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Gone => 410,
            Self::UnsupportedMediaType => 415,
            Self::UnprocessableEntity => 422,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
        }
    }

    /// Returns the default message used when a setter is called with an
    /// empty message.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Created => "Created",
            Self::NoContent => "No Content",
            Self::NotModified => "Not Modified",
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Gone => "Gone",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::UnprocessableEntity => "Unprocessable Entity",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Returns `true` for codes at or above 400.
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.code() >= 400
    }

    /// Returns the documentation URL for this status.
    ///
    /// `Some` for every error code except 500; informational and success
    /// codes have no documentation page.
    ///
    /// # Example
    ///
    /// ```rust
    /// use restkit::Status;
    ///
    /// assert_eq!(
    ///     Status::BadRequest.doc_url().as_deref(),
    ///     Some("http://docs.dansnet.de/?search=name=400"),
    /// );
    /// assert!(Status::InternalServerError.doc_url().is_none());
    /// assert!(Status::Ok.doc_url().is_none());
    /// ```
    #[must_use]
    pub fn doc_url(self) -> Option<String> {
        if self.is_error() && self != Self::InternalServerError {
            Some(format!("{ERROR_DOC_BASE}name={}", self.code()))
        } else {
            None
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.default_message())
    }
}

/// An error entry collected on a [`Response`](crate::Response).
///
/// Created when a named setter signals a failure status; entries accumulate
/// in insertion order and are never mutated after creation. The serialized
/// form uses the wire keys `code`, `msg` and `url`.
///
/// # Example
///
/// ```rust
/// use restkit::{ApiError, Status};
///
/// let error = ApiError::for_status(Status::NotFound, "Not Found");
/// assert_eq!(error.code, 404);
/// assert_eq!(error.msg, "Not Found");
/// assert_eq!(error.url, "http://docs.dansnet.de/?search=name=404");
///
/// let json = serde_json::to_string(&error).unwrap();
/// assert!(json.contains(r#""code":404"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// The HTTP status code the error was raised with.
    pub code: u16,
    /// The error message, default or caller-supplied.
    pub msg: String,
    /// URL of the documentation page describing the error.
    pub url: String,
}

impl ApiError {
    /// Creates an error entry from raw parts.
    #[must_use]
    pub fn new(code: u16, msg: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            url: url.into(),
        }
    }

    /// Creates an error entry for a status, resolving the doc URL from the
    /// status table.
    #[must_use]
    pub fn for_status(status: Status, msg: impl Into<String>) -> Self {
        Self {
            code: status.code(),
            msg: msg.into(),
            url: status.doc_url().unwrap_or_default(),
        }
    }

    /// Serializes a list of errors into a JSON array value.
    #[must_use]
    pub fn to_values(errors: &[Self]) -> serde_json::Value {
        serde_json::to_value(errors).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Status>();
    assert_send_sync::<ApiError>();
};
