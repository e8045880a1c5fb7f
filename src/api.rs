// API client module: a small blocking HTTP client shared by both
// services. Every remote operation funnels through `ApiClient::request`,
// which owns URL building, authentication and response interpretation.

use crate::config::{ClientConfig, ServiceProfile};
use crate::error::{BoxError, ClientError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
pub use reqwest::Method;
use serde_json::{json, Value};
use std::borrow::Cow;
use tracing::debug;

/// How an API key travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `X-API-Key: <key>`
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl AuthScheme {
    fn header(self, api_key: &str) -> (&'static str, String) {
        match self {
            AuthScheme::ApiKeyHeader => ("X-API-Key", api_key.to_string()),
            AuthScheme::Bearer => ("Authorization", format!("Bearer {}", api_key)),
        }
    }
}

/// A fully resolved request, ready for a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The seam between request logic and the network.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, BoxError>;
}

/// Production transport: one reusable reqwest blocking client with JSON
/// content type set on every request.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClientError::Network(Box::new(err)))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Authenticated access to one service's REST API.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    profile: &'static ServiceProfile,
    base_url: String,
    api_key: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(profile: &'static ServiceProfile, config: &ClientConfig, transport: T) -> Self {
        ApiClient {
            transport,
            profile,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Adopt a freshly issued key for the rest of this client's life.
    pub fn set_api_key(&mut self, api_key: &str) {
        self.api_key = Some(api_key.to_string());
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fails locally when an authenticated call has no key to send.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ClientError::MissingApiKey(self.profile.api_key_var))
    }

    pub fn get(&self, path: &str, auth_required: bool, query: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, auth_required, None, query)
    }

    pub fn post(&self, path: &str, auth_required: bool, body: Option<&Value>) -> Result<Value> {
        self.request(Method::POST, path, auth_required, body, &[])
    }

    /// Issue one call and interpret the answer.
    ///
    /// A 204 becomes `{"status": "success"}`, a non-JSON body becomes
    /// `{"raw": <text>}`, and any non-2xx status becomes
    /// [`ClientError::Api`].
    pub fn request(
        &self,
        method: Method,
        path: &str,
        auth_required: bool,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let mut headers = Vec::new();
        if auth_required {
            if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
                headers.push(self.profile.auth.header(key));
            }
        }
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            query: query
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            body: body.cloned(),
        };

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .transport
            .send(&request)
            .map_err(ClientError::Network)?;
        debug!(status = response.status, "received response");

        decode_response(response)
    }
}

/// Percent-encode a caller-supplied id so it stays a single path segment.
pub fn path_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

fn decode_response(response: HttpResponse) -> Result<Value> {
    let HttpResponse { status, body } = response;
    if status == 204 {
        return Ok(json!({ "status": "success" }));
    }

    let data: Value = serde_json::from_str(&body).unwrap_or_else(|_| json!({ "raw": body }));

    if !(200..300).contains(&status) {
        let field = |name: &str| data.get(name).and_then(Value::as_str).map(str::to_owned);
        return Err(ClientError::Api {
            status,
            message: field("error").unwrap_or_else(|| format!("HTTP {}", status)),
            code: field("code"),
            details: field("details"),
        });
    }

    Ok(data)
}
