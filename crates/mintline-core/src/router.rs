//! Call routing: tool invocation -> HTTP request -> response envelope
//!
//! Every Mintline endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "error": { "message": "not found" } }
//! ```
//!
//! An argument counts as supplied when its key is present and its value is
//! not JSON `null`. Falsy values (`0`, `false`, `""`) are supplied.

use std::sync::Arc;

use reqwest::{Method, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::{Catalog, RouteEntry};
use crate::client::ApiClient;
use crate::descriptor::ParameterLocation;
use crate::error::{Error, Result};

/// Tool arguments as received from the MCP client
pub type Arguments = Map<String, Value>;

/// A fully resolved HTTP request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    /// `None` means no body is sent at all
    pub body: Option<Value>,
}

/// Parsed response envelope, returned unchanged to the formatting stage
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope(Value);

impl Envelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The `data` member, if present
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// True only when the envelope carries an explicit `success: false`
    pub fn is_failure(&self) -> bool {
        self.0.get("success").and_then(Value::as_bool) == Some(false)
    }

    /// Server-supplied error message, if any
    pub fn error_message(&self) -> Option<&str> {
        self.0
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Turn an explicit failure into an application error
    fn check(self, status: StatusCode) -> Result<Self> {
        if !self.is_failure() {
            return Ok(self);
        }
        let message = match self.error_message() {
            Some(m) => m.to_string(),
            None => format!("request failed ({})", status.as_u16()),
        };
        Err(Error::Api(message))
    }
}

/// Routes tool calls to the Mintline API using the synthesized routing table
#[derive(Debug, Clone)]
pub struct CallRouter {
    catalog: Arc<Catalog>,
    client: ApiClient,
}

impl CallRouter {
    pub fn new(catalog: Arc<Catalog>, client: ApiClient) -> Self {
        Self { catalog, client }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve a tool call into a request without sending it
    pub fn prepare(&self, name: &str, args: &Arguments) -> Result<PreparedRequest> {
        let route = self
            .catalog
            .route(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        let method = Method::from_bytes(route.method.as_bytes())
            .map_err(|_| Error::InvalidData(format!("Invalid HTTP method: {}", route.method)))?;

        Ok(PreparedRequest {
            method,
            url: self.resolve_url(route, args)?,
            body: build_body(route, args),
        })
    }

    /// Send a tool call and return the successful envelope
    pub async fn invoke(&self, name: &str, args: &Arguments) -> Result<Envelope> {
        let prepared = self.prepare(name, args)?;
        debug!("{} -> {} {}", name, prepared.method, prepared.url);

        let mut request = self.client.request(prepared.method, &prepared.url);
        if let Some(body) = &prepared.body {
            // .json() also sets Content-Type: application/json
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let value: Value = serde_json::from_str(&text).map_err(|_| Error::Transport {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })?;

        Envelope::new(value).check(status)
    }

    fn resolve_url(&self, route: &RouteEntry, args: &Arguments) -> Result<String> {
        let mut path = route.path.clone();
        let mut query: Vec<(&str, String)> = Vec::new();

        for param in &route.parameters {
            let Some(value) = supplied(args, &param.name) else {
                continue;
            };
            match param.location {
                ParameterLocation::Path => {
                    let text = scalar_text(value);
                    // `.` and `..` would be collapsed by URL normalization
                    // (escaped or not) and retarget the request
                    if text == "." || text == ".." {
                        return Err(Error::InvalidData(format!(
                            "path parameter {} cannot be {:?}",
                            param.name, text
                        )));
                    }
                    let placeholder = format!("{{{}}}", param.name);
                    let encoded = urlencoding::encode(&text).into_owned();
                    path = path.replace(&placeholder, &encoded);
                }
                ParameterLocation::Query => query.push((param.name.as_str(), scalar_text(value))),
                ParameterLocation::Other => {}
            }
        }

        let mut url = Url::parse(&self.client.url(&path))
            .map_err(|e| Error::InvalidData(format!("Invalid URL for {}: {}", route.path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }
}

fn supplied<'a>(args: &'a Arguments, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

/// Render a scalar argument the way it appears in a URL
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body = every supplied argument that is not a declared parameter
fn build_body(route: &RouteEntry, args: &Arguments) -> Option<Value> {
    if !route.has_body {
        return None;
    }
    let body: Map<String, Value> = args
        .iter()
        .filter(|(key, value)| !value.is_null() && !route.is_parameter(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if body.is_empty() {
        None
    } else {
        Some(Value::Object(body))
    }
}
