//! CLI command implementations
//!
//! - `list_tools` - Print the synthesized catalog grouped by category
//! - `serve` - Serve MCP over stdio or Streamable HTTP

pub mod list_tools;
pub mod serve;

pub use list_tools::*;
pub use serve::*;

use anyhow::Result;
use mintline_core::{ApiClient, Bridge, CatalogSource, Config};
use tracing::debug;

use crate::cli::Cli;

/// Config file and environment, with the `--api-url` override applied
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let config = Config::load()?;
    Ok(match cli.api_url.as_deref() {
        Some(url) => config.with_api_url(url),
        None => config,
    })
}

pub fn catalog_source(cli: &Cli) -> CatalogSource {
    match (&cli.descriptor, cli.use_static) {
        (Some(path), _) => CatalogSource::File(path.clone()),
        (None, true) => CatalogSource::Builtin,
        (None, false) => CatalogSource::Remote,
    }
}

/// Load the description and build the bridge.
///
/// The credential is checked whenever the API will be contacted; listing a
/// local or built-in catalog works without one.
pub async fn load_bridge(
    config: &Config,
    source: &CatalogSource,
    contacts_api: bool,
) -> Result<Bridge> {
    debug!("Catalog source: {:?}", source);
    let client = if contacts_api || *source == CatalogSource::Remote {
        ApiClient::from_config(config)?
    } else {
        ApiClient::new(&config.api_url, config.api_key.as_deref().unwrap_or_default())
    };

    Ok(Bridge::bootstrap(client, source).await?)
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
