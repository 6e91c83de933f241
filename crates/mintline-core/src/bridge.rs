//! Startup and invocation glue
//!
//! [`Bridge::bootstrap`] is the single startup gate: it resolves the
//! description document, synthesizes the catalog, and only then hands back a
//! bridge that can serve calls. After that everything is read-only and shared
//! through `Arc`, so concurrent invocations need no locking.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{Catalog, ToolDefinition};
use crate::client::ApiClient;
use crate::descriptor::{self, ApiDescription};
use crate::error::Result;
use crate::format::FormatterRegistry;
use crate::router::{Arguments, CallRouter};

/// Where the interface description comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// `GET {base}/api/docs/openapi.json`
    Remote,
    /// Description embedded in the binary
    Builtin,
    /// Local JSON or YAML file
    File(PathBuf),
}

impl CatalogSource {
    pub async fn load(&self, client: &ApiClient) -> Result<ApiDescription> {
        match self {
            Self::Remote => descriptor::fetch(client).await,
            Self::Builtin => descriptor::builtin(),
            Self::File(path) => descriptor::load_file(path),
        }
    }
}

/// Result of one tool invocation, ready for the protocol layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {}", message),
            is_error: true,
        }
    }
}

/// Catalog, router, and formatters bundled for serving
#[derive(Clone)]
pub struct Bridge {
    router: CallRouter,
    formatters: Arc<FormatterRegistry>,
}

impl Bridge {
    /// Build from an already-synthesized catalog
    pub fn new(catalog: Catalog, client: ApiClient, formatters: FormatterRegistry) -> Self {
        Self {
            router: CallRouter::new(Arc::new(catalog), client),
            formatters: Arc::new(formatters),
        }
    }

    /// Load the description and synthesize the catalog (startup-fatal on error)
    pub async fn bootstrap(client: ApiClient, source: &CatalogSource) -> Result<Self> {
        let description = source.load(&client).await?;
        let catalog = Catalog::from_description(&description);

        if let Some(info) = &description.info {
            info!(
                "Loaded {} v{}",
                info.title.as_deref().unwrap_or("API"),
                info.version.as_deref().unwrap_or("?")
            );
        }
        info!("Synthesized {} tools", catalog.len());
        if catalog.is_empty() {
            warn!("API description declares no operations with an operationId");
        }

        Ok(Self::new(catalog, client, FormatterRegistry::default()))
    }

    pub fn catalog(&self) -> &Catalog {
        self.router.catalog()
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        self.router.catalog().tools()
    }

    pub fn router(&self) -> &CallRouter {
        &self.router
    }

    /// Invoke a tool; every failure becomes an error-flagged outcome
    pub async fn call(&self, name: &str, args: &Arguments) -> ToolOutcome {
        match self.router.invoke(name, args).await {
            Ok(envelope) => ToolOutcome::success(self.formatters.format(name, &envelope)),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolOutcome::error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_outcome_prefix() {
        let outcome = ToolOutcome::error(Error::Api("not found".into()));
        assert_eq!(outcome.text, "Error: not found");
        assert!(outcome.is_error);

        let outcome = ToolOutcome::success("ok".into());
        assert!(!outcome.is_error);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_flagged_not_fatal() {
        let client = ApiClient::new("http://127.0.0.1:9", "key");
        let bridge = Bridge::bootstrap(client, &CatalogSource::Builtin)
            .await
            .unwrap();
        assert_eq!(bridge.tools().len(), 12);

        let outcome = bridge.call("delete_everything", &Arguments::new()).await;
        assert!(outcome.is_error);
        assert_eq!(outcome.text, "Error: Unknown tool: delete_everything");
    }
}
