//! MCP (Model Context Protocol) server for Mintline
//!
//! Exposes the synthesized tool catalog to LLM clients. The catalog is
//! dynamic, so `tools/list` and `tools/call` are answered by hand from the
//! [`Bridge`] rather than through a compile-time tool router.
//!
//! # Transports
//!
//! - stdio (default): one session over stdin/stdout
//! - Streamable HTTP: `http://{host}:{port}/mcp`, one session per client
//!
//! # Example
//!
//! ```bash
//! MINTLINE_API_KEY=... mintline-mcp                  # stdio
//! MINTLINE_API_KEY=... mintline-mcp --http-port 3001 # HTTP
//! ```

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use tracing::{debug, info};

use mintline_core::{Arguments, Bridge, ToolDefinition};

/// Mintline MCP server state
#[derive(Clone)]
pub struct MintlineMcpServer {
    pub(crate) bridge: Bridge,
}

impl MintlineMcpServer {
    pub fn new(bridge: Bridge) -> Self {
        Self { bridge }
    }

    /// Catalog entries as protocol tool descriptors, in catalog order
    pub fn tool_list(&self) -> Vec<Tool> {
        self.bridge.tools().iter().map(to_protocol_tool).collect()
    }

    /// Run one invocation; failures are reported in-band with `is_error`
    pub async fn invoke(&self, name: &str, args: Arguments) -> CallToolResult {
        debug!("tools/call {}", name);
        let outcome = self.bridge.call(name, &args).await;
        let content = vec![Content::text(outcome.text)];
        if outcome.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

fn to_protocol_tool(def: &ToolDefinition) -> Tool {
    Tool::new(
        def.name.clone(),
        def.description.clone(),
        Arc::new(def.input_schema.clone()),
    )
}

impl ServerHandler for MintlineMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mintline".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Mintline".to_string()),
                website_url: Some("https://github.com/mintline/mintline-mcp".to_string()),
                icons: None,
            },
            instructions: Some(
                "Mintline tracks receipts, bank transactions, statements, and the matches \
                 between them. Use the available tools to search records, review or resolve \
                 proposed matches, and summarize spending."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        Ok(self.invoke(&request.name, args).await)
    }
}

/// Serve one session over stdin/stdout until the client disconnects
pub async fn serve_stdio(bridge: Bridge) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("MCP server ready on stdio ({} tools)", bridge.tools().len());

    let service = MintlineMcpServer::new(bridge).serve(stdio()).await?;
    let reason = service.waiting().await?;
    info!("MCP session ended: {:?}", reason);

    Ok(())
}

/// Axum router with the Streamable HTTP endpoint mounted at `/mcp`
pub fn http_router(bridge: Bridge) -> axum::Router {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;
    use tower_http::trace::TraceLayer;

    let service = StreamableHttpService::new(
        move || Ok(MintlineMcpServer::new(bridge.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http())
}

/// Start the Streamable HTTP MCP server on the given port
pub async fn serve_http(bridge: Bridge, host: &str, port: u16) -> anyhow::Result<()> {
    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let router = http_router(bridge);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
