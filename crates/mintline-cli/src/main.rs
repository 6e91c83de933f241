//! Mintline MCP bridge
//!
//! Usage:
//!   mintline-mcp                      Serve MCP over stdio
//!   mintline-mcp --http-port 3001     Serve Streamable HTTP at /mcp
//!   mintline-mcp --list-tools         Print the tool catalog
//!   mintline-mcp --static -l          Print the built-in catalog (no API key needed)

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging on stderr; stdout carries the stdio MCP stream
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    if cli.list_tools {
        commands::cmd_list_tools(&cli).await
    } else {
        commands::cmd_serve(&cli).await
    }
}
