//! Mintline MCP server
//!
//! Protocol surface for the Mintline bridge. Tool discovery and invocation
//! are delegated to [`mintline_core::Bridge`]; this crate only speaks MCP.

pub mod mcp;

pub use mcp::{http_router, serve_http, serve_stdio, MintlineMcpServer};
