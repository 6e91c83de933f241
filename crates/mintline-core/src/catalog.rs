//! Tool catalog synthesis
//!
//! Turns an [`ApiDescription`] into the tool list exposed over MCP and the
//! routing table used to turn tool calls back into HTTP requests. Both are
//! produced in a single pass and never mutated afterwards.
//!
//! ## Rules
//!
//! - Operations without an `operationId` are skipped.
//! - Parameter properties default to `"type": "string"`; `enum`, `default`
//!   and `description` are copied as-is.
//! - JSON object request bodies merge their properties into the same map and
//!   append their `required` names (no de-duplication).
//! - The `required` key is omitted when nothing is required.
//! - A repeated `operationId` replaces the earlier tool and route; the tool
//!   keeps the position of the first declaration.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::descriptor::{ApiDescription, LocatedOperation, Parameter};

/// A tool as advertised to MCP clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
    /// First tag of the operation, used for grouped listings only
    #[serde(skip)]
    pub group: Option<String>,
}

impl ToolDefinition {
    /// Names in the schema's `required` list (empty when omitted)
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The schema's `properties` map
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.input_schema.get("properties").and_then(Value::as_object)
    }
}

/// How to turn a call of one tool into an HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    /// Upper-cased HTTP method
    pub method: String,
    /// Raw path template, e.g. `/api/receipts/{id}`
    pub path: String,
    pub parameters: Vec<Parameter>,
    /// True iff the operation declared a request body
    pub has_body: bool,
}

impl RouteEntry {
    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }
}

/// Tool catalog plus routing table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<ToolDefinition>,
    routes: HashMap<String, RouteEntry>,
}

impl Catalog {
    /// Synthesize the catalog from a description document
    pub fn from_description(description: &ApiDescription) -> Self {
        let mut catalog = Self::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for located in description.operations() {
            let Some((tool, route)) = synthesize(&located) else {
                debug!(
                    "Skipping {} {}: no operationId",
                    located.method, located.path
                );
                continue;
            };

            match positions.get(&tool.name) {
                Some(&idx) => {
                    debug!("Duplicate operationId {}: later declaration wins", tool.name);
                    catalog.routes.insert(tool.name.clone(), route);
                    catalog.tools[idx] = tool;
                }
                None => {
                    positions.insert(tool.name.clone(), catalog.tools.len());
                    catalog.routes.insert(tool.name.clone(), route);
                    catalog.tools.push(tool);
                }
            }
        }

        catalog
    }

    /// Tools in document traversal order
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn route(&self, name: &str) -> Option<&RouteEntry> {
        self.routes.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tools grouped by tag, groups in order of first appearance
    pub fn grouped(&self) -> Vec<(&str, Vec<&ToolDefinition>)> {
        let mut groups: Vec<(&str, Vec<&ToolDefinition>)> = Vec::new();
        for tool in &self.tools {
            let group = tool.group.as_deref().unwrap_or("Other");
            match groups.iter_mut().find(|(name, _)| *name == group) {
                Some((_, members)) => members.push(tool),
                None => groups.push((group, vec![tool])),
            }
        }
        groups
    }
}

fn synthesize(located: &LocatedOperation) -> Option<(ToolDefinition, RouteEntry)> {
    let op = &located.operation;
    let name = op.operation_id.clone()?;

    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    for param in &op.parameters {
        properties.insert(param.name.clone(), parameter_property(param));
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    if let Some(body) = op.request_body.as_ref().and_then(|b| b.json_object_schema()) {
        for (prop, schema) in body.properties {
            properties.insert(prop, schema);
        }
        required.extend(body.required.into_iter().map(Value::String));
    }

    let mut input_schema = Map::new();
    input_schema.insert("type".to_string(), json!("object"));
    input_schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        input_schema.insert("required".to_string(), Value::Array(required));
    }

    let tool = ToolDefinition {
        name,
        description: describe(op.summary.as_deref(), op.description.as_deref()),
        input_schema,
        group: op.tags.first().cloned(),
    };

    let route = RouteEntry {
        method: located.method.to_uppercase(),
        path: located.path.clone(),
        parameters: op.parameters.clone(),
        has_body: op.request_body.is_some(),
    };

    Some((tool, route))
}

fn parameter_property(param: &Parameter) -> Value {
    let mut prop = Map::new();
    let kind = param.schema.kind.as_deref().unwrap_or("string");
    prop.insert("type".to_string(), json!(kind));
    if let Some(allowed) = &param.schema.allowed {
        prop.insert("enum".to_string(), Value::Array(allowed.clone()));
    }
    if let Some(default) = &param.schema.default {
        prop.insert("default".to_string(), default.clone());
    }
    if let Some(description) = &param.description {
        prop.insert("description".to_string(), json!(description));
    }
    Value::Object(prop)
}

fn describe(summary: Option<&str>, description: Option<&str>) -> String {
    match (summary, description) {
        (Some(s), Some(d)) => format!("{} {}", s, d),
        (Some(s), None) => s.to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor;

    fn catalog_of(doc: Value) -> Catalog {
        let desc = ApiDescription::from_json(&doc.to_string()).unwrap();
        Catalog::from_description(&desc)
    }

    #[test]
    fn test_skips_operations_without_id() {
        let catalog = catalog_of(json!({"paths": {
            "/health": {"get": {"summary": "Health check"}},
            "/api/receipts": {"get": {"operationId": "list_receipts"}}
        }}));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tools()[0].name, "list_receipts");
        assert!(catalog.route("health").is_none());
    }

    #[test]
    fn test_unresolved_refs_and_type_lists_keep_tools() {
        let catalog = catalog_of(json!({"paths": {
            "/api/receipts": {"get": {
                "operationId": "list_receipts",
                "parameters": [
                    {"$ref": "#/components/parameters/Limit"},
                    {"name": "q", "in": "query", "schema": {"type": "string"}}
                ]
            }},
            "/api/typed": {"get": {
                "operationId": "typed_31",
                "parameters": [
                    {"name": "cursor", "in": "query", "schema": {"type": ["string", "null"]}}
                ]
            }}
        }}));

        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["list_receipts", "typed_31"]);

        let receipts = catalog.tools()[0].properties().unwrap();
        assert_eq!(receipts.len(), 1);
        assert!(receipts.contains_key("q"));

        let typed = catalog.tools()[1].properties().unwrap();
        assert_eq!(typed["cursor"], json!({"type": "string"}));
        assert_eq!(catalog.route("typed_31").unwrap().parameters.len(), 1);
    }

    #[test]
    fn test_parameter_properties() {
        let catalog = catalog_of(json!({"paths": {"/api/matches": {"get": {
            "operationId": "list_matches",
            "parameters": [
                {"name": "status", "in": "query", "description": "Filter by status",
                 "schema": {"enum": ["proposed", "confirmed"], "default": "proposed"}},
                {"name": "limit", "in": "query", "schema": {"type": "number"}}
            ]
        }}}}));

        let tool = &catalog.tools()[0];
        let props = tool.properties().unwrap();
        assert_eq!(
            props["status"],
            json!({
                "type": "string",
                "enum": ["proposed", "confirmed"],
                "default": "proposed",
                "description": "Filter by status"
            })
        );
        assert_eq!(props["limit"], json!({"type": "number"}));
    }

    #[test]
    fn test_required_omitted_when_empty() {
        let catalog = catalog_of(json!({"paths": {"/api/statements": {"get": {
            "operationId": "list_statements",
            "parameters": [{"name": "limit", "in": "query", "required": false}]
        }}}}));
        let tool = &catalog.tools()[0];
        assert!(!tool.input_schema.contains_key("required"));
        assert_eq!(tool.input_schema["type"], "object");
    }

    #[test]
    fn test_required_union_params_then_body() {
        let catalog = catalog_of(json!({"paths": {"/api/matches/{id}/reject": {"post": {
            "operationId": "reject_match",
            "parameters": [
                {"name": "id", "in": "path", "required": true},
                {"name": "notify", "in": "query"}
            ],
            "requestBody": {"content": {"application/json": {"schema": {
                "type": "object",
                "properties": {
                    "reason": {"type": "string"},
                    "id": {"type": "string", "description": "body id"}
                },
                "required": ["reason", "id"]
            }}}}
        }}}}));

        let tool = &catalog.tools()[0];
        assert_eq!(tool.required(), vec!["id", "reason", "id"]);
        // body property overwrites the parameter entry of the same name
        assert_eq!(tool.properties().unwrap()["id"]["description"], "body id");
        assert_eq!(tool.properties().unwrap().len(), 3);
    }

    #[test]
    fn test_route_entry() {
        let catalog = catalog_of(json!({"paths": {"/api/matches/{id}/confirm": {"post": {
            "operationId": "confirm_match",
            "parameters": [{"name": "id", "in": "path", "required": true}],
            "requestBody": {"content": {"text/plain": {}}}
        }}}}));

        let route = catalog.route("confirm_match").unwrap();
        assert_eq!(route.method, "POST");
        assert_eq!(route.path, "/api/matches/{id}/confirm");
        assert!(route.has_body);
        assert!(route.is_parameter("id"));
        assert!(!route.is_parameter("reason"));
        // declared body without usable properties contributes nothing to the schema
        let tool = &catalog.tools()[0];
        assert_eq!(tool.properties().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_operation_id_last_wins() {
        let catalog = catalog_of(json!({"paths": {
            "/v1/receipts": {"get": {"operationId": "list_receipts", "summary": "old"}},
            "/api/statements": {"get": {"operationId": "list_statements"}},
            "/v2/receipts": {"get": {"operationId": "list_receipts", "summary": "new"}}
        }}));

        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["list_receipts", "list_statements"]);
        assert_eq!(catalog.tools()[0].description, "new");
        assert_eq!(catalog.route("list_receipts").unwrap().path, "/v2/receipts");
    }

    #[test]
    fn test_order_follows_document() {
        let catalog = catalog_of(json!({"paths": {
            "/z": {"delete": {"operationId": "z_delete"}, "get": {"operationId": "z_get"}},
            "/a": {"put": {"operationId": "a_put"}}
        }}));
        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["z_delete", "z_get", "a_put"]);
    }

    #[test]
    fn test_description_concatenation() {
        assert_eq!(describe(Some("List."), Some("More.")), "List. More.");
        assert_eq!(describe(None, Some("More.")), "More.");
        assert_eq!(describe(Some("List."), None), "List.");
        assert_eq!(describe(None, None), "");
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::from_description(&descriptor::builtin().unwrap());
        assert_eq!(catalog.len(), 12);

        let groups: Vec<_> = catalog.grouped().into_iter().map(|(g, _)| g).collect();
        assert_eq!(
            groups,
            vec!["Receipts", "Transactions", "Statements", "Matches", "Analytics"]
        );

        let reject = catalog
            .tools()
            .iter()
            .find(|t| t.name == "reject_match")
            .unwrap();
        assert_eq!(reject.required(), vec!["id"]);
        assert!(reject.properties().unwrap().contains_key("reason"));

        let unmatched = catalog
            .tools()
            .iter()
            .find(|t| t.name == "unmatched_summary")
            .unwrap();
        assert!(unmatched.properties().unwrap().is_empty());
        assert!(unmatched.required().is_empty());
    }
}
