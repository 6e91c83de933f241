//! Mintline Core Library
//!
//! Bridges the Mintline financial API (receipts, bank transactions,
//! statements, reconciliation matches) to tool-calling agents:
//! - Interface description loading (remote OpenAPI, embedded, or file)
//! - Tool catalog and routing table synthesis
//! - Call routing from tool invocations to HTTP requests
//! - Response formatting into plain text
//! - Layered configuration (file, environment, CLI)

pub mod bridge;
pub mod catalog;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod router;

/// Test utilities including a mock Mintline API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bridge::{Bridge, CatalogSource, ToolOutcome};
pub use catalog::{Catalog, RouteEntry, ToolDefinition};
pub use client::ApiClient;
pub use config::Config;
pub use descriptor::ApiDescription;
pub use error::{Error, Result};
pub use format::FormatterRegistry;
pub use router::{Arguments, CallRouter, Envelope, PreparedRequest};
