//! CLI argument definitions using clap
//!
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::Parser;

/// Mintline MCP bridge - receipts, transactions, and matches as agent tools
#[derive(Parser, Debug)]
#[command(name = "mintline-mcp")]
#[command(
    about = "Expose the Mintline API to MCP clients as a set of tools",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Print the available tools grouped by category and exit
    #[arg(short = 'l', long)]
    pub list_tools: bool,

    /// Use the built-in API description instead of fetching it
    #[arg(long = "static", conflicts_with = "descriptor")]
    pub use_static: bool,

    /// Load the API description from a local JSON or YAML file
    #[arg(long, value_name = "FILE")]
    pub descriptor: Option<PathBuf>,

    /// Serve Streamable HTTP on this port instead of stdio
    #[arg(long, value_name = "PORT")]
    pub http_port: Option<u16>,

    /// Host to bind the HTTP transport to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Mintline API base URL (overrides MINTLINE_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
