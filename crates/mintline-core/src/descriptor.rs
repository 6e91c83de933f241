//! Interface description (OpenAPI) model and loaders
//!
//! The description is fetched once at startup from
//! `GET {base}/api/docs/openapi.json`. Only the parts needed to build the
//! tool catalog are modeled; everything else in the document is ignored.
//!
//! Path items are kept as raw JSON maps so that document key order survives
//! (serde_json is built with `preserve_order`). Operation fields are read
//! leniently: a member of an unexpected shape falls back to its default and a
//! parameter that cannot be understood (e.g. an unresolved `$ref`) is dropped
//! on its own, so an operation with an `operationId` always yields a tool.

use std::collections::HashMap;
use std::path::Path;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::{Error, Result};

/// Well-known location of the description document
pub const DESCRIPTOR_PATH: &str = "/api/docs/openapi.json";

/// Embedded description of the Mintline API (static catalog)
const BUILTIN_DESCRIPTION: &str = include_str!("../assets/openapi.json");

/// Path item keys that hold operations
const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parsed interface description document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDescription {
    #[serde(default)]
    pub info: Option<ApiInfo>,
    /// path template -> method -> operation object
    #[serde(default)]
    pub paths: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub version: Option<String>,
}

/// One operation under a path/method pair
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, deserialize_with = "lenient")]
    pub operation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "parameter_list")]
    pub parameters: Vec<Parameter>,
    #[serde(default, deserialize_with = "lenient")]
    pub request_body: Option<RequestBody>,
}

/// A path or query parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, deserialize_with = "lenient")]
    pub required: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub schema: ParameterSchema,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    /// header, cookie, or anything else; listed in the schema, never routed
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParameterSchema {
    /// `type`; for a type list (`["string", "null"]`) the first non-null entry
    #[serde(rename = "type", default, deserialize_with = "schema_type")]
    pub kind: Option<String>,
    #[serde(rename = "enum", default, deserialize_with = "lenient")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default)]
    pub default: Option<Value>,
}

/// Deserialize a member, falling back to its default when the shape is wrong
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn parameter_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Parameter>(item) {
            Ok(param) => Some(param),
            Err(e) => {
                warn!("Skipping unsupported parameter: {}", e);
                None
            }
        })
        .collect())
}

fn schema_type<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(kind) => Some(kind),
        Value::Array(kinds) => {
            let names: Vec<&str> = kinds.iter().filter_map(Value::as_str).collect();
            names
                .iter()
                .find(|k| **k != "null")
                .or_else(|| names.first())
                .map(|k| k.to_string())
        }
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: HashMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<Value>,
}

/// Structured JSON body schema, extracted from `requestBody`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodySchema {
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl RequestBody {
    /// The `application/json` object schema, if one is declared
    pub fn json_object_schema(&self) -> Option<BodySchema> {
        let schema = self.content.get("application/json")?.schema.as_ref()?;
        let obj = schema.as_object()?;

        let is_object = match obj.get("type").and_then(Value::as_str) {
            Some(kind) => kind == "object",
            None => obj.contains_key("properties"),
        };
        if !is_object {
            return None;
        }

        let properties = obj
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(BodySchema {
            properties,
            required,
        })
    }
}

/// An operation located in the document
#[derive(Debug, Clone)]
pub struct LocatedOperation {
    pub path: String,
    pub method: String,
    pub operation: Operation,
}

impl ApiDescription {
    /// Parse a JSON description document
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::Descriptor(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Parse a YAML description document
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| Error::Descriptor(format!("invalid YAML: {}", e)))?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Descriptor(
                "description document is not an object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| Error::Descriptor(e.to_string()))
    }

    /// Every operation in document traversal order: paths, then methods.
    ///
    /// Only the HTTP method keys of a path item are read; `parameters`,
    /// `servers`, `x-*` extensions and non-object values are skipped.
    pub fn operations(&self) -> impl Iterator<Item = LocatedOperation> + '_ {
        self.paths.iter().flat_map(|(path, item)| {
            let methods = item.as_object().into_iter().flat_map(|m| m.iter());
            methods.filter_map(move |(method, raw)| {
                if !is_http_method(method) || !raw.is_object() {
                    return None;
                }
                match serde_json::from_value::<Operation>(raw.clone()) {
                    Ok(operation) => Some(LocatedOperation {
                        path: path.clone(),
                        method: method.clone(),
                        operation,
                    }),
                    Err(e) => {
                        warn!("Skipping malformed operation {} {}: {}", method, path, e);
                        None
                    }
                }
            })
        })
    }
}

fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.iter().any(|m| m.eq_ignore_ascii_case(key))
}

/// Fetch the description document from the API (startup only, no retry)
pub async fn fetch(client: &ApiClient) -> Result<ApiDescription> {
    let url = client.url(DESCRIPTOR_PATH);
    info!("Fetching API description from {}", url);

    let response = client
        .request(reqwest::Method::GET, &url)
        .send()
        .await
        .map_err(|e| Error::Descriptor(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Descriptor(format!(
            "{} returned {}",
            url, status
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Descriptor(format!("failed to read body: {}", e)))?;
    debug!("Description document: {} bytes", body.len());

    ApiDescription::from_json(&body)
}

/// Load a description document from a local file (JSON or YAML)
pub fn load_file(path: &Path) -> Result<ApiDescription> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Descriptor(format!("failed to read {}: {}", path.display(), e))
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => ApiDescription::from_yaml(&text),
        _ => ApiDescription::from_json(&text),
    }
}

/// The embedded Mintline description (static catalog variant)
pub fn builtin() -> Result<ApiDescription> {
    ApiDescription::from_json(BUILTIN_DESCRIPTION)
}
