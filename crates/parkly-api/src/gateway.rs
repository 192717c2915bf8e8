// Request gateway
//
// The single chokepoint for network I/O. Wraps `reqwest::Client` with base
// URL resolution, default JSON headers and body parsing, then hands every
// outcome to the registered inspectors before returning it unchanged.
// Endpoint methods (users, cars, parking) live in sibling modules as
// inherent impls so this file stays focused on transport mechanics.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Request options ──────────────────────────────────────────────────

/// Per-call options: method, optional JSON body and header overrides.
///
/// Header overrides are merged over the `Content-Type: application/json`
/// default, replacing it when they name the same header.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub data: Option<Value>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            data: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    /// Attach an already-built JSON body.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize `body` and attach it as the JSON body.
    pub fn with_json(self, body: &impl Serialize) -> Result<Self, Error> {
        let data = serde_json::to_value(body).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(self.with_data(data))
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

// ── Responses and outcomes ───────────────────────────────────────────

/// A successful (2xx) response whose body parsed as structured data.
///
/// An empty body is represented as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Decode the body into a typed model.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        let raw = self.body.to_string();
        serde_json::from_value(self.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: raw,
        })
    }

    /// A top-level field of an object body, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_object().and_then(|obj| obj.get(name))
    }
}

/// Borrowed view of how a call resolved, handed to each inspector.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Response(&'a ApiResponse),
    Failure(&'a Error),
}

impl<'a> From<&'a Result<ApiResponse, Error>> for Outcome<'a> {
    fn from(result: &'a Result<ApiResponse, Error>) -> Self {
        match result {
            Ok(resp) => Self::Response(resp),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Middleware hook run on every resolved call.
///
/// Inspectors observe; they cannot change the outcome the caller receives.
pub trait ResponseInspector: Send + Sync {
    fn inspect(&self, outcome: Outcome<'_>);
}

// ── Gateway ──────────────────────────────────────────────────────────

/// HTTP gateway to the parking service.
///
/// Resolves endpoints against the configured base URL, sends every request
/// through a cookie-carrying client, and maps non-success statuses and
/// unparseable bodies into [`Error`].
pub struct RequestGateway {
    http: reqwest::Client,
    base_url: Url,
    transport: TransportConfig,
    inspectors: Vec<Arc<dyn ResponseInspector>>,
}

impl RequestGateway {
    /// Create a gateway whose client is built from `transport`.
    pub fn new(base_url: Url, transport: TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            transport,
            inspectors: Vec::new(),
        })
    }

    /// Create a gateway around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            transport: TransportConfig::default(),
            inspectors: Vec::new(),
        }
    }

    /// Register an inspector. Inspectors run in registration order.
    #[must_use]
    pub fn layer(mut self, inspector: Arc<dyn ResponseInspector>) -> Self {
        self.inspectors.push(inspector);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// The session cookie header currently held for the service.
    pub fn session_cookie(&self) -> Option<String> {
        self.transport.cookie_header(&self.base_url)
    }

    /// Seed the cookie jar with a previously exported session cookie.
    pub fn restore_session_cookie(&self, header: &str) {
        self.transport.restore_cookies(&self.base_url, header);
    }

    /// Build the full URL for an endpoint path such as `/api/cars`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    /// Perform one request and run every inspector on its outcome.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<ApiResponse, Error> {
        let result = self.send(endpoint, options).await;
        let outcome = Outcome::from(&result);
        for inspector in &self.inspectors {
            inspector.inspect(outcome);
        }
        result
    }

    async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<ApiResponse, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!("{} {}", options.method, url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let mut request = self.http.request(options.method, url).headers(headers);
        if let Some(data) = options.data {
            trace!(body = %data, "request body");
            request = request.body(data.to_string());
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            debug!(status = status.as_u16(), "request failed");
            // The status alone decides the outcome; a body lost in transit is no payload.
            let raw = resp.text().await.unwrap_or_default();
            let body = parse_body(&raw).ok().filter(|v| !v.is_null());
            return Err(Error::Status {
                status: status.as_u16(),
                body,
                raw,
            });
        }

        let raw = resp.text().await?;

        let body = parse_body(&raw).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: raw.clone(),
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl fmt::Debug for RequestGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestGateway")
            .field("base_url", &self.base_url.as_str())
            .field("inspectors", &self.inspectors.len())
            .finish_non_exhaustive()
    }
}

/// Parse a response body. Blank bodies are `null`, not an error.
fn parse_body(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw)
}
