//! Per-call facade wiring request, response and resource manager.
//!
//! [`Restful`] owns one [`RequestContext`], one fresh [`Response`] and the
//! resource manager for the duration of a single inbound call. It exists so
//! transport handlers deal with one object: build the context, hand it to
//! the facade, run an operation, take the response.
//!
//! # Example
//!
//! ```rust,ignore
//! let context = RequestContext::builder(Method::Get)
//!     .path(RequestPath::parse("/items/5"))
//!     .build();
//!
//! let mut call = Restful::new(context, manager);
//! call.get_resource(None).await;
//!
//! let response = call.into_response();
//! // hand {response.http_code(), response.content_type(), response.data()}
//! // back to the transport
//! ```

use serde_json::Value;

use crate::context::{RedirectOutcome, RequestContext};
use crate::manager::ResourceManager;
use crate::redirect::{RedirectClient, RedirectError};
use crate::response::Response;

/// One inbound call: context, response and resource manager.
///
/// Never shared or reused across calls; create a fresh facade per request.
#[derive(Debug)]
pub struct Restful<M> {
    request: RequestContext,
    response: Response,
    resources: M,
}

impl<M: ResourceManager> Restful<M> {
    /// Wires a request context and a resource manager together with a
    /// fresh response.
    #[must_use]
    pub fn new(request: RequestContext, resources: M) -> Self {
        Self {
            request,
            response: Response::new(),
            resources,
        }
    }

    /// The inbound request context.
    #[must_use]
    pub const fn request(&self) -> &RequestContext {
        &self.request
    }

    /// The response being assembled.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// The resource manager.
    #[must_use]
    pub const fn resources(&self) -> &M {
        &self.resources
    }

    /// Consumes the facade, yielding the finished response.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Checks a caller-evaluated precondition; see
    /// [`RequestContext::validate`].
    pub fn validate(&mut self, is_valid: bool) -> bool {
        self.request.validate(is_valid, &mut self.response)
    }

    /// Resolves a sub-resource redirect; see
    /// [`RequestContext::resolve_redirect`].
    ///
    /// # Errors
    ///
    /// Returns [`RedirectError::UnsupportedMethod`] when the inbound method
    /// cannot be forwarded.
    pub async fn resolve_redirect(
        &mut self,
        mapping: &[(&str, &str)],
        client: &RedirectClient,
    ) -> Result<RedirectOutcome, RedirectError> {
        self.request
            .resolve_redirect(mapping, client, &mut self.response)
            .await
    }

    /// Fetches the resource addressed by the request path; see
    /// [`ResourceManager::get_resource`].
    pub async fn get_resource(&mut self, table: Option<&str>) -> Option<Value> {
        self.resources
            .get_resource(&self.request, &mut self.response, table)
            .await
    }

    /// Fetches the collection addressed by the request; see
    /// [`ResourceManager::get_resources`].
    pub async fn get_resources(&mut self, table: Option<&str>) -> Option<Vec<Value>> {
        self.resources
            .get_resources(&self.request, &mut self.response, table)
            .await
    }

    /// Fetches a collection with a store-specific query; see
    /// [`ResourceManager::get_resources_by_query`].
    pub async fn get_resources_by_query(&mut self, query: &str) -> Option<Vec<Value>> {
        self.resources
            .get_resources_by_query(&self.request, &mut self.response, query)
            .await
    }

    /// Creates or updates the resource addressed by the request path; see
    /// [`ResourceManager::save_resource`].
    pub async fn save_resource(&mut self, data: Value, table: Option<&str>) -> Option<Value> {
        self.resources
            .save_resource(&self.request, &mut self.response, data, table)
            .await
    }

    /// Deletes the resource addressed by the request path; see
    /// [`ResourceManager::delete_resource`].
    pub async fn delete_resource(&mut self, table: Option<&str>) -> bool {
        self.resources
            .delete_resource(&self.request, &mut self.response, table)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Method, RequestPath};
    use crate::store::StoreOutcome;
    use serde_json::json;
    use std::collections::HashMap;

    struct EmptyManager;

    impl ResourceManager for EmptyManager {
        async fn fetch_one(&self, _id: &str, _table: &str) -> StoreOutcome<Value> {
            StoreOutcome::Missing
        }

        async fn fetch_many(
            &self,
            _filter: &HashMap<String, String>,
            _table: &str,
        ) -> StoreOutcome<Vec<Value>> {
            StoreOutcome::Missing
        }

        async fn fetch_by_query(&self, _query: &str) -> StoreOutcome<Vec<Value>> {
            StoreOutcome::Missing
        }

        async fn store(
            &self,
            _data: &Value,
            _id: Option<&str>,
            _table: &str,
        ) -> StoreOutcome<Value> {
            StoreOutcome::Missing
        }

        async fn remove(&self, _id: &str, _table: &str) -> StoreOutcome<Value> {
            StoreOutcome::Missing
        }
    }

    fn facade_for(path: &str) -> Restful<EmptyManager> {
        let context = RequestContext::builder(Method::Get)
            .path(RequestPath::parse(path))
            .build();
        Restful::new(context, EmptyManager)
    }

    #[test]
    fn test_facade_starts_with_a_fresh_response() {
        let call = facade_for("/items");
        assert_eq!(call.response().http_code(), 200);
        assert!(call.response().errors().is_empty());
    }

    #[test]
    fn test_validate_routes_through_the_response() {
        let mut call = facade_for("/items");
        assert!(!call.validate(false));
        assert_eq!(call.response().http_code(), 400);
    }

    #[tokio::test]
    async fn test_missing_resource_maps_to_404() {
        let mut call = facade_for("/items/5");
        let result = call.get_resource(None).await;

        assert!(result.is_none());
        assert_eq!(call.response().http_code(), 404);
    }

    #[test]
    fn test_into_response_yields_the_assembled_response() {
        let mut call = facade_for("/items");
        call.response_mut().set_data(json!({"done": true}));

        let response = call.into_response();
        assert_eq!(response.data(), json!({"done": true}));
    }
}
