//! JSON request builder, response classifier and async HTTP client.
//!
//! # Design
//! `FetchClient` holds only a `base_url` and carries no mutable state between
//! calls. `build_get` / `build_post` produce an `HttpRequest` and
//! `parse_json` consumes an `HttpResponse`, keeping request shaping and error
//! classification deterministic and free of I/O. `HttpClient` pairs a
//! `FetchClient` with a `Transport` to provide the async `fetch_json` /
//! `post_json` operations.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ErrorBody, FetchError, GENERIC_ERROR_MESSAGE};
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::transport::Transport;

/// Stateless builder and parser for JSON exchanges against one base URL.
#[derive(Debug, Clone)]
pub struct FetchClient {
    base_url: String,
}

impl FetchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{endpoint}`. Any method in `options` is ignored.
    pub fn build_get(&self, endpoint: &str, options: &RequestOptions) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{endpoint}", self.base_url),
            headers: merge_headers(&options.headers),
            body: None,
            timeout: options.timeout,
        }
    }

    /// POST `{base_url}{endpoint}` with `data` as the JSON body. Any method in
    /// `options` is ignored.
    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &B,
        options: &RequestOptions,
    ) -> Result<HttpRequest, FetchError> {
        let body =
            serde_json::to_string(data).map_err(|e| FetchError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{endpoint}", self.base_url),
            headers: merge_headers(&options.headers),
            body: Some(body),
            timeout: options.timeout,
        })
    }

    /// Decode a 2xx body, or classify the failure.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, FetchError> {
        check_status(&response)?;
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

/// Map non-2xx status codes to `FetchError::Http`.
///
/// 5xx always carries the generic message and no details. Every other status
/// takes `message` and `details` from the JSON error body, falling back to
/// the generic message when the body has none.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    let status = response.status;
    if status >= 500 {
        return Err(FetchError::Http {
            status,
            message: GENERIC_ERROR_MESSAGE.to_string(),
            details: None,
        });
    }
    let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    let message = body
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    Err(FetchError::Http {
        status,
        message,
        details: body.details,
    })
}

/// Async JSON client: builds, executes and classifies in one call.
#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    fetch: FetchClient,
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            fetch: FetchClient::new(base_url),
            transport,
        }
    }

    pub fn fetch_client(&self) -> &FetchClient {
        &self.fetch
    }

    /// Issue a GET and decode the JSON response.
    pub async fn fetch_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<R, FetchError> {
        let request = self.fetch.build_get(endpoint, options);
        self.send(request).await
    }

    /// Issue a POST with `data` serialized as the body and decode the JSON
    /// response.
    pub async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        data: &B,
        options: &RequestOptions,
    ) -> Result<R, FetchError> {
        let request = self.fetch.build_post(endpoint, data, options)?;
        self.send(request).await
    }

    async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, FetchError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        tracing::debug!(method, %url, "sending request");

        let response = self.transport.execute(request).await.inspect_err(|e| {
            tracing::warn!(method, %url, error = %e, "request did not complete");
        })?;
        let status = response.status;
        self.fetch.parse_json(response).inspect_err(|e| {
            tracing::warn!(method, %url, status, error = %e, "request failed");
        })
    }
}
