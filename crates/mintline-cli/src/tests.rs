//! CLI command tests

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use mintline_core::test_utils::{MockApiServer, MOCK_API_KEY};
use mintline_core::{descriptor, Catalog, CatalogSource, Config};

use crate::cli::Cli;
use crate::commands::{self, truncate};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mintline-mcp").chain(args.iter().copied())).unwrap()
}

fn config_for(url: &str, key: Option<&str>) -> Config {
    Config {
        api_url: url.to_string(),
        api_key: key.map(str::to_string),
        timeout: None,
    }
}

// ========== Argument Parsing ==========

#[test]
fn test_defaults_serve_stdio_from_remote() {
    let cli = parse(&[]);
    assert!(!cli.list_tools);
    assert!(cli.http_port.is_none());
    assert_eq!(cli.host, "127.0.0.1");
    assert_eq!(commands::catalog_source(&cli), CatalogSource::Remote);
}

#[test]
fn test_short_list_flag_and_static() {
    let cli = parse(&["-l", "--static"]);
    assert!(cli.list_tools);
    assert_eq!(commands::catalog_source(&cli), CatalogSource::Builtin);
}

#[test]
fn test_descriptor_flag() {
    let cli = parse(&["--descriptor", "api.yaml", "--api-url", "http://localhost:8787/"]);
    assert_eq!(
        commands::catalog_source(&cli),
        CatalogSource::File(PathBuf::from("api.yaml"))
    );
    assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8787/"));
}

#[test]
fn test_static_conflicts_with_descriptor() {
    let result = Cli::try_parse_from(["mintline-mcp", "--static", "--descriptor", "a.json"]);
    assert!(result.is_err());
}

#[test]
fn test_http_flags() {
    let cli = parse(&["--http-port", "3001", "--host", "0.0.0.0", "-v"]);
    assert_eq!(cli.http_port, Some(3001));
    assert_eq!(cli.host, "0.0.0.0");
    assert!(cli.verbose);
}

#[test]
fn test_help_and_version_exit_cleanly() {
    let err = Cli::try_parse_from(["mintline-mcp", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    assert_eq!(err.exit_code(), 0);

    let err = Cli::try_parse_from(["mintline-mcp", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

// ========== Catalog Listing ==========

#[test]
fn test_render_catalog_groups_by_tag() {
    let catalog = Catalog::from_description(&descriptor::builtin().unwrap());
    let out = commands::render_catalog(&catalog);

    assert!(out.contains("Mintline tools (12)"));
    let receipts = out.find("   Receipts\n").unwrap();
    let transactions = out.find("   Transactions\n").unwrap();
    let analytics = out.find("   Analytics\n").unwrap();
    assert!(receipts < transactions && transactions < analytics);

    assert!(out.contains("   • get_receipt\n"));
    assert!(out.contains("     required: id\n"));
}

#[test]
fn test_render_empty_catalog() {
    let catalog = Catalog::default();
    assert_eq!(
        commands::render_catalog(&catalog),
        "No tools available. The API description declares no operations.\n"
    );
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly ten", 11), "exactly ten");
    assert_eq!(truncate("this is a long description", 10), "this is...");
    assert_eq!(truncate("résumé résumé", 8), "résum...");
}

// ========== Startup ==========

#[tokio::test]
async fn test_static_listing_needs_no_key() {
    let config = config_for("http://127.0.0.1:9", None);
    let bridge = commands::load_bridge(&config, &CatalogSource::Builtin, false)
        .await
        .unwrap();
    assert_eq!(bridge.tools().len(), 12);
}

#[tokio::test]
async fn test_serving_requires_key() {
    let config = config_for("http://127.0.0.1:9", None);
    let err = commands::load_bridge(&config, &CatalogSource::Builtin, true)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("MINTLINE_API_KEY"));

    let err = commands::load_bridge(&config, &CatalogSource::Remote, false)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("MINTLINE_API_KEY"));
}

#[tokio::test]
async fn test_remote_description_from_mock() {
    let api = MockApiServer::start().await;
    let config = config_for(&api.url(), Some(MOCK_API_KEY));

    let bridge = commands::load_bridge(&config, &CatalogSource::Remote, true)
        .await
        .unwrap();
    assert_eq!(bridge.tools().len(), 12);
    assert_eq!(api.requests_to("/api/docs/openapi.json").len(), 1);
}

#[tokio::test]
async fn test_remote_fetch_failure_is_fatal() {
    let api = MockApiServer::start_with_description(None).await;
    let config = config_for(&api.url(), Some(MOCK_API_KEY));

    let err = commands::load_bridge(&config, &CatalogSource::Remote, true)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("Failed to load API description"));
}

#[tokio::test]
async fn test_descriptor_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "openapi: 3.0.3\npaths:\n  /api/ping:\n    get:\n      operationId: ping\n      summary: Ping the API.\n"
    )
    .unwrap();

    let config = config_for("http://127.0.0.1:9", None);
    let source = CatalogSource::File(file.path().to_path_buf());
    let bridge = commands::load_bridge(&config, &source, false).await.unwrap();

    assert_eq!(bridge.tools().len(), 1);
    assert_eq!(bridge.tools()[0].name, "ping");
    assert_eq!(bridge.tools()[0].description, "Ping the API.");
}
