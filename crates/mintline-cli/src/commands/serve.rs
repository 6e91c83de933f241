//! Server command implementation

use anyhow::Result;

use super::{catalog_source, load_bridge, resolve_config};
use crate::cli::Cli;

pub async fn cmd_serve(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let source = catalog_source(cli);
    let bridge = load_bridge(&config, &source, true).await?;

    // stdout belongs to the stdio transport, so the banner goes to stderr
    eprintln!("🚀 Mintline MCP server");
    eprintln!("   API: {}", config.api_url);
    eprintln!("   Tools: {}", bridge.tools().len());

    match cli.http_port {
        Some(port) => {
            eprintln!("   Listening: http://{}:{}/mcp", cli.host, port);
            eprintln!("   Press Ctrl+C to stop");
            mintline_server::serve_http(bridge, &cli.host, port).await
        }
        None => {
            eprintln!("   Transport: stdio");
            mintline_server::serve_stdio(bridge).await
        }
    }
}
