// API client module: a small blocking HTTP client that talks to the
// GIS.ph API. Every call goes through `send`, which maps transport and
// status failures into the typed errors in `crate::error`.

use crate::config::ConfigStore;
use crate::error::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.gis.ph";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to send requests and how to authenticate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ApiSettings {
    /// Resolve settings from the config store, then the `API_URL` /
    /// `API_KEY` environment variables, then the built-in default.
    pub fn resolve(config: &ConfigStore) -> Self {
        Self::resolve_with(
            config,
            std::env::var("API_URL").ok(),
            std::env::var("API_KEY").ok(),
        )
    }

    pub fn resolve_with(
        config: &ConfigStore,
        env_url: Option<String>,
        env_key: Option<String>,
    ) -> Self {
        let base_url = config
            .api_url()
            .map(str::to_string)
            .or_else(|| env_url.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = config
            .api_key()
            .map(str::to_string)
            .or_else(|| env_key.filter(|s| !s.is_empty()));

        Self { base_url, api_key }
    }
}

/// Blocking client holding the reqwest client, the base URL and the optional
/// API key sent as a bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Request(format!("failed to build HTTP client: {}", e)))?;
        Ok(ApiClient {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers attached to every request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let val = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| Error::Request(format!("invalid API key header: {}", e)))?;
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Base URL with `segments` appended, each one percent-encoded so it
    /// stays a single path segment.
    fn segment_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Request(format!("invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Request(format!("invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        let req = self.client.get(self.url(endpoint)).query(params);
        self.send(req)
    }

    pub fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let req = self.client.post(self.url(endpoint)).json(body);
        self.send(req)
    }

    pub fn put<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let req = self.client.put(self.url(endpoint)).json(body);
        self.send(req)
    }

    pub fn delete(&self, endpoint: &str) -> Result<Value> {
        let req = self.client.delete(self.url(endpoint));
        self.send(req)
    }

    /// GET /v1/regions with optional query parameters (limit, field filters).
    pub fn get_regions(&self, params: &[(String, String)]) -> Result<Value> {
        self.get("/v1/regions", params)
    }

    /// GET /v1/regions/{id}.
    pub fn get_region_by_id(&self, id: &str) -> Result<Value> {
        if matches!(id, "" | "." | "..") {
            return Err(Error::InvalidArgument(format!("Invalid region id: {:?}", id)));
        }
        let url = self.segment_url(&["v1", "regions", id])?;
        self.send(self.client.get(url))
    }

    fn send(&self, req: RequestBuilder) -> Result<Value> {
        let request = req
            .headers(self.headers()?)
            .build()
            .map_err(|e| Error::Request(e.to_string()))?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let res = self.client.execute(request).map_err(|e| self.transport_error(e))?;
        let status = res.status();
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(status_error(res));
        }

        let body = res.text().map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_builder() {
            return Error::Request(err.to_string());
        }
        debug!(error = %err, "request did not get a response");
        Error::Network {
            base_url: self.base_url.clone(),
        }
    }
}

/// Build an `Api` error from a non-2xx response, preferring the server's
/// `message` field over the status reason phrase.
fn status_error(res: Response) -> Error {
    let status = res.status();
    let reason = status.canonical_reason().unwrap_or("Unknown status").to_string();
    let message = res
        .text()
        .ok()
        .and_then(|txt| serde_json::from_str::<Value>(&txt).ok())
        .and_then(|body| {
            body.get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or(reason);

    Error::Api {
        status: status.as_u16(),
        message,
    }
}
