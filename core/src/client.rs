//! Stateless HTTP request builder and response normalizer for the blog API.
//!
//! # Design
//! `ApiClient` holds only the API base URL. `build` turns an endpoint and
//! `RequestOptions` into an `HttpRequest`, attaching the bearer token from
//! the `TokenStore` when one is present. `parse` applies the response
//! convention shared by every endpoint and hands back the raw JSON value;
//! each screen validates the shape it expects.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RequestError, GENERIC_FAILURE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::storage::TokenStore;

/// Method and optional JSON body of an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
        }
    }

    pub fn post<T: Serialize>(payload: &T) -> Result<Self, RequestError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| RequestError::Serialization(e.to_string()))?;
        Ok(Self {
            method: HttpMethod::Post,
            body: Some(body),
        })
    }
}

/// Client for the blog API rooted at `base_url` (e.g. `http://host/api`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Describe a call to `endpoint` (which starts with `/`).
    ///
    /// A token that cannot be read from storage is treated as absent.
    pub fn build(
        &self,
        endpoint: &str,
        options: RequestOptions,
        store: &dyn TokenStore,
    ) -> HttpRequest {
        let mut headers = Vec::new();
        if options.body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        match store.load() {
            Ok(Some(token)) => {
                headers.push(("authorization".to_string(), format!("Bearer {token}")));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not read credential token"),
        }
        tracing::debug!(method = %options.method, endpoint, "building request");
        HttpRequest {
            method: options.method,
            path: format!("{}{endpoint}", self.base_url),
            headers,
            body: options.body,
        }
    }

    /// Normalize a response.
    ///
    /// - 204 resolves to `None` without looking at the body.
    /// - Any other status must carry a JSON body, or the call fails with
    ///   `RequestError::Status`.
    /// - A non-2xx JSON body fails with its `error` field, or
    ///   `GENERIC_FAILURE` when that is absent.
    pub fn parse(&self, response: HttpResponse) -> Result<Option<Value>, RequestError> {
        if response.status == 204 {
            return Ok(None);
        }
        let data: Value = serde_json::from_str(&response.body)
            .map_err(|_| RequestError::Status(response.status))?;
        if !response.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .filter(|msg| !msg.is_empty())
                .unwrap_or(GENERIC_FAILURE);
            return Err(RequestError::Api(message.to_string()));
        }
        Ok(Some(data))
    }
}
