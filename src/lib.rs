//! # restkit
//!
//! A minimal REST request/response toolkit for webservice backends,
//! providing path-based routing of CRUD operations onto an abstract
//! data-access contract and responses with proper HTTP status semantics.
//!
//! ## Overview
//!
//! This crate provides:
//! - Resource path parsing into resource / id / relation segments via
//!   [`RequestPath`]
//! - An explicit, immutable per-call [`RequestContext`] (no ambient
//!   request state) with validation and sub-resource redirect resolution
//! - A [`Response`] builder with named status setters, an accumulated
//!   error list and content-type negotiation
//! - The [`ResourceManager`] trait: five storage primitives with a
//!   three-way [`StoreOutcome`] contract, CRUD operations as provided
//!   methods, and extension/formatting hooks
//! - An outbound [`RedirectClient`] that forwards matched redirects with
//!   form-encoded payloads
//! - JSON, HTML and XML wire formatting via the [`format`] module
//!
//! ## Quick Start
//!
//! ```rust
//! use restkit::{Method, RequestContext, RequestPath, Response};
//! use serde_json::json;
//!
//! // Build the context from whatever your transport hands you.
//! let context = RequestContext::builder(Method::Get)
//!     .path(RequestPath::parse("/items/5"))
//!     .host("ws.example.com")
//!     .uri("/api/items/5")
//!     .build();
//!
//! assert_eq!(context.path().resource(), Some("items"));
//! assert_eq!(context.path().id(), Some("5"));
//!
//! // Assemble a response.
//! let mut response = Response::new();
//! response.set_data(json!({"id": 5, "name": "x"}));
//! assert_eq!(response.http_code(), 200);
//! assert_eq!(response.content_type(), Some("application/json"));
//! ```
//!
//! ## Serving a resource
//!
//! Implement the five storage primitives and the CRUD operations come for
//! free; wire everything together per call with [`Restful`]:
//!
//! ```rust,ignore
//! struct WidgetManager { db: Database }
//!
//! impl ResourceManager for WidgetManager {
//!     async fn fetch_one(&self, id: &str, table: &str) -> StoreOutcome<Value> {
//!         match self.db.get(table, id).await {
//!             Ok(Some(row)) => StoreOutcome::Found(row),
//!             Ok(None) => StoreOutcome::Missing,
//!             Err(e) => StoreOutcome::Failed(StoreError::new(e.to_string())),
//!         }
//!     }
//!     // ... fetch_many, fetch_by_query, store, remove
//! }
//!
//! let mut call = Restful::new(context, WidgetManager { db });
//! call.get_resource(None).await;
//! let response = call.into_response();
//! // hand {http_code, content_type, data} back to the transport
//! ```
//!
//! ## Redirects
//!
//! A path with a relation segment (`/documentations/7/groups`) can be
//! redirected to another resource. The mapping is an ordered list of
//! `(pattern, target)` pairs where `{id}` in the pattern stands for the
//! current path id:
//!
//! ```rust,ignore
//! let client = RedirectClient::new();
//! let outcome = call
//!     .resolve_redirect(&[("{id}/groups", "/groups/1")], &client)
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the request context is built explicitly and
//!   passed into every operation
//! - **Tagged outcomes**: stores report `Found` / `Missing` / `Failed`,
//!   never sentinel values; "not found" is never conflated with "error"
//! - **Per-call scope**: context, response and facade live for exactly one
//!   inbound call
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: storage primitives and redirect calls are `async`

pub mod context;
pub mod error;
pub mod facade;
pub mod format;
pub mod manager;
pub mod redirect;
pub mod response;
pub mod store;

// Re-export public types at crate root for convenience
pub use context::{
    Method, RedirectOutcome, RequestContext, RequestContextBuilder, RequestPath, ID_PLACEHOLDER,
    SUMMARY_PARAM,
};
pub use error::{ApiError, Status, ERROR_DOC_BASE};
pub use facade::Restful;
pub use format::{CONTENT_TYPE_HTML, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
pub use manager::ResourceManager;
pub use redirect::{RedirectClient, RedirectError, DEFAULT_REDIRECT_TIMEOUT};
pub use response::Response;
pub use store::{StoreError, StoreOutcome};
