//! The resource manager: CRUD operations over an abstract store.
//!
//! This module defines the [`ResourceManager`] trait. Implementers supply
//! five storage primitives with the three-way [`StoreOutcome`] contract and
//! get the public CRUD operations — `get_resource`, `get_resources`,
//! `get_resources_by_query`, `save_resource`, `delete_resource` — as
//! provided methods that translate store outcomes into response statuses.
//!
//! # Status mapping
//!
//! | Store outcome | Response |
//! |---------------|----------|
//! | `Failed`      | 400 Bad Request |
//! | `Missing`     | 404 Not Found (empty list for collections) |
//! | `Found`       | operation-specific success status |
//!
//! A store failure maps to 400 — never 500 — at this layer; surfacing real
//! infrastructure trouble is the collaborator's responsibility. Callers
//! must be aware that client mistakes and backend failures are therefore
//! indistinguishable on the wire.
//!
//! # Hooks
//!
//! Two override points customize the pipeline between fetch and response:
//! [`ResourceManager::extend_resource`] enriches a record with derived
//! fields, [`ResourceManager::format_resource`] produces the wire-ready
//! value per negotiated content type. Both have framework defaults.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use restkit::{ResourceManager, StoreOutcome};
//! use serde_json::{json, Value};
//!
//! struct Widgets;
//!
//! impl ResourceManager for Widgets {
//!     async fn fetch_one(&self, id: &str, _table: &str) -> StoreOutcome<Value> {
//!         if id == "1" {
//!             StoreOutcome::Found(json!({"id": 1, "name": "widget"}))
//!         } else {
//!             StoreOutcome::Missing
//!         }
//!     }
//!
//!     async fn fetch_many(
//!         &self,
//!         _filter: &HashMap<String, String>,
//!         _table: &str,
//!     ) -> StoreOutcome<Vec<Value>> {
//!         StoreOutcome::Found(vec![json!({"id": 1, "name": "widget"})])
//!     }
//!
//!     async fn fetch_by_query(&self, _query: &str) -> StoreOutcome<Vec<Value>> {
//!         StoreOutcome::Missing
//!     }
//!
//!     async fn store(
//!         &self,
//!         data: &Value,
//!         _id: Option<&str>,
//!         _table: &str,
//!     ) -> StoreOutcome<Value> {
//!         StoreOutcome::Found(data.clone())
//!     }
//!
//!     async fn remove(&self, _id: &str, _table: &str) -> StoreOutcome<Value> {
//!         StoreOutcome::Found(Value::Bool(true))
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::context::RequestContext;
use crate::format::{self, CONTENT_TYPE_JSON};
use crate::response::Response;
use crate::store::StoreOutcome;

/// CRUD contract over an injected data store.
///
/// The five required methods are the storage primitives; everything else is
/// provided. Implementations are scoped to one request and hold no state
/// beyond their store handle.
#[allow(async_fn_in_trait)]
pub trait ResourceManager: Send + Sync {
    /// Fetches one record by id.
    async fn fetch_one(&self, id: &str, table: &str) -> StoreOutcome<Value>;

    /// Fetches records matching a property filter.
    async fn fetch_many(
        &self,
        filter: &HashMap<String, String>,
        table: &str,
    ) -> StoreOutcome<Vec<Value>>;

    /// Fetches records with a store-specific query.
    async fn fetch_by_query(&self, query: &str) -> StoreOutcome<Vec<Value>>;

    /// Creates or updates a record. `Missing` means an update targeted a
    /// record that does not exist.
    async fn store(&self, data: &Value, id: Option<&str>, table: &str) -> StoreOutcome<Value>;

    /// Deletes a record by id. `Missing` means there was nothing to
    /// delete.
    async fn remove(&self, id: &str, table: &str) -> StoreOutcome<Value>;

    /// Enriches a fetched or saved record with derived fields before
    /// formatting. Default: no-op.
    fn extend_resource(&self, resource: &mut Value) {
        let _ = resource;
    }

    /// Produces the wire-ready value for one record.
    ///
    /// `result_count` is the size of the collection the record belongs to
    /// (1 for single-record operations) and `summary` reflects the
    /// request's summary flag; the default implementation ignores both and
    /// delegates to [`format::wire_value`].
    fn format_resource(
        &self,
        data: &Value,
        result_count: usize,
        summary: bool,
        content_type: &str,
    ) -> Value {
        let _ = (result_count, summary);
        format::wire_value(data, content_type)
    }

    /// Fetches the resource addressed by the request path.
    ///
    /// Without an id segment this delegates to [`Self::get_resources`] and
    /// returns the collection as an array value. Returns the pre-format
    /// record on success; on failure the response carries the status (400
    /// for a store failure, 404 when nothing matched) and `None` is
    /// returned.
    async fn get_resource(
        &self,
        ctx: &RequestContext,
        response: &mut Response,
        table: Option<&str>,
    ) -> Option<Value> {
        let Some(table) = resolve_table(ctx, table) else {
            response.bad_request("", Value::Array(Vec::new()));
            return None;
        };
        let Some(id) = ctx.path().id() else {
            return self
                .get_resources(ctx, response, Some(table))
                .await
                .map(Value::Array);
        };

        match self.fetch_one(id, table).await {
            StoreOutcome::Failed(error) => {
                tracing::warn!(%error, table, id, "store failed fetching resource");
                response.bad_request("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Missing => {
                response.not_found("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Found(mut resource) => {
                self.extend_resource(&mut resource);
                let content_type = negotiated(response);
                let wire =
                    self.format_resource(&resource, 1, ctx.summary_requested(), &content_type);
                response.set_data_as(wire, &content_type);
                Some(resource)
            }
        }
    }

    /// Fetches the collection addressed by the request, filtered by the
    /// query parameters (minus the summary marker).
    ///
    /// A `Missing` store outcome is an empty collection, not an error.
    /// Returns the pre-format records on success.
    async fn get_resources(
        &self,
        ctx: &RequestContext,
        response: &mut Response,
        table: Option<&str>,
    ) -> Option<Vec<Value>> {
        let Some(table) = resolve_table(ctx, table) else {
            response.bad_request("", Value::Array(Vec::new()));
            return None;
        };
        let filter = ctx.filter_params();

        match self.fetch_many(&filter, table).await {
            StoreOutcome::Failed(error) => {
                tracing::warn!(%error, table, "store failed fetching resources");
                response.bad_request("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Missing => Some(publish_collection(self, ctx, response, Vec::new())),
            StoreOutcome::Found(items) => Some(publish_collection(self, ctx, response, items)),
        }
    }

    /// Fetches a collection with a store-specific query.
    async fn get_resources_by_query(
        &self,
        ctx: &RequestContext,
        response: &mut Response,
        query: &str,
    ) -> Option<Vec<Value>> {
        match self.fetch_by_query(query).await {
            StoreOutcome::Failed(error) => {
                tracing::warn!(%error, "store failed running query");
                response.bad_request("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Missing => Some(publish_collection(self, ctx, response, Vec::new())),
            StoreOutcome::Found(items) => Some(publish_collection(self, ctx, response, items)),
        }
    }

    /// Creates or updates the resource addressed by the request path.
    ///
    /// The saved record is compared against the echoed input (with the path
    /// id injected when present): a structurally identical echo means the
    /// store performed a plain update — 200 OK — while any difference
    /// signals a creation or server-side change — 201 Created. Returns the
    /// saved record on success.
    async fn save_resource(
        &self,
        ctx: &RequestContext,
        response: &mut Response,
        data: Value,
        table: Option<&str>,
    ) -> Option<Value> {
        let Some(table) = resolve_table(ctx, table) else {
            response.bad_request("", Value::Array(Vec::new()));
            return None;
        };
        let id = ctx.path().id();
        let mut echo = data;

        match self.store(&echo, id, table).await {
            StoreOutcome::Failed(error) => {
                tracing::warn!(%error, table, "store failed saving resource");
                response.bad_request("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Missing => {
                response.not_found("", Value::Array(Vec::new()));
                None
            }
            StoreOutcome::Found(mut saved) => {
                if let Some(id) = id {
                    inject_id(&mut echo, id);
                }
                self.extend_resource(&mut saved);
                let unchanged = echo == saved;
                let content_type = negotiated(response);
                let wire = self.format_resource(&saved, 1, ctx.summary_requested(), &content_type);
                if unchanged {
                    response.ok("", wire.clone());
                } else {
                    response.created("", wire.clone());
                }
                response.set_data_as(wire, &content_type);
                Some(saved)
            }
        }
    }

    /// Deletes the resource addressed by the request path.
    ///
    /// A missing id segment yields 404 without ever invoking the delete
    /// primitive. On success the response is 204 No Content with the
    /// store's return value as payload, and `true` is returned.
    async fn delete_resource(
        &self,
        ctx: &RequestContext,
        response: &mut Response,
        table: Option<&str>,
    ) -> bool {
        let Some(table) = resolve_table(ctx, table) else {
            response.bad_request("", Value::Array(Vec::new()));
            return false;
        };
        let Some(id) = ctx.path().id() else {
            response.not_found("", Value::Array(Vec::new()));
            return false;
        };

        match self.remove(id, table).await {
            StoreOutcome::Failed(error) => {
                tracing::warn!(%error, table, id, "store failed deleting resource");
                response.bad_request("", Value::Array(Vec::new()));
                false
            }
            StoreOutcome::Missing => {
                response.not_found("", Value::Array(Vec::new()));
                false
            }
            StoreOutcome::Found(result) => {
                response.no_content("", result);
                true
            }
        }
    }
}

/// Resolves the target table: the explicit argument when non-empty,
/// otherwise the path's resource segment.
fn resolve_table<'a>(ctx: &'a RequestContext, table: Option<&'a str>) -> Option<&'a str> {
    match table {
        Some(table) if !table.is_empty() => Some(table),
        _ => ctx.path().resource(),
    }
}

/// Runs the extension and formatting hooks over a collection and publishes
/// it on the response, returning the pre-format originals.
fn publish_collection<M: ResourceManager + ?Sized>(
    manager: &M,
    ctx: &RequestContext,
    response: &mut Response,
    mut items: Vec<Value>,
) -> Vec<Value> {
    let content_type = negotiated(response);
    let summary = ctx.summary_requested();
    let count = items.len();

    let mut wire_items = Vec::with_capacity(count);
    for item in &mut items {
        manager.extend_resource(item);
        wire_items.push(manager.format_resource(item, count, summary, &content_type));
    }

    response.set_data_as(Value::Array(wire_items), &content_type);
    items
}

fn negotiated(response: &Response) -> String {
    response
        .content_type()
        .unwrap_or(CONTENT_TYPE_JSON)
        .to_string()
}

/// Injects the path id into an echoed record, as a number when it parses
/// as one.
fn inject_id(data: &mut Value, id: &str) {
    if let Value::Object(fields) = data {
        let id_value = id
            .parse::<i64>()
            .map_or_else(|_| Value::String(id.to_string()), Value::from);
        fields.insert("id".to_string(), id_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Method, RequestPath};
    use serde_json::json;

    fn context_for(path: &str) -> RequestContext {
        RequestContext::builder(Method::Get)
            .path(RequestPath::parse(path))
            .build()
    }

    #[test]
    fn test_resolve_table_prefers_explicit_argument() {
        let ctx = context_for("/items/5");
        assert_eq!(resolve_table(&ctx, Some("widgets")), Some("widgets"));
    }

    #[test]
    fn test_resolve_table_falls_back_to_resource_segment() {
        let ctx = context_for("/items/5");
        assert_eq!(resolve_table(&ctx, None), Some("items"));
        assert_eq!(resolve_table(&ctx, Some("")), Some("items"));
    }

    #[test]
    fn test_resolve_table_fails_without_resource() {
        let ctx = context_for("");
        assert_eq!(resolve_table(&ctx, None), None);
    }

    #[test]
    fn test_inject_id_uses_a_number_for_numeric_ids() {
        let mut data = json!({"name": "x"});
        inject_id(&mut data, "5");
        assert_eq!(data, json!({"id": 5, "name": "x"}));
    }

    #[test]
    fn test_inject_id_keeps_non_numeric_ids_as_strings() {
        let mut data = json!({"name": "x"});
        inject_id(&mut data, "abc-1");
        assert_eq!(data, json!({"id": "abc-1", "name": "x"}));
    }

    #[test]
    fn test_inject_id_ignores_non_object_payloads() {
        let mut data = json!(["a"]);
        inject_id(&mut data, "5");
        assert_eq!(data, json!(["a"]));
    }
}
