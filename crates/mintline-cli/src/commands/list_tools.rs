//! Catalog listing command

use anyhow::Result;
use mintline_core::Catalog;

use super::{catalog_source, load_bridge, resolve_config, truncate};
use crate::cli::Cli;

const DESCRIPTION_WIDTH: usize = 72;

pub async fn cmd_list_tools(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let source = catalog_source(cli);
    let bridge = load_bridge(&config, &source, false).await?;

    print!("{}", render_catalog(bridge.catalog()));
    Ok(())
}

/// Human-readable catalog, one section per category
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    if catalog.is_empty() {
        out.push_str("No tools available. The API description declares no operations.\n");
        return out;
    }

    out.push('\n');
    out.push_str(&format!("🧰 Mintline tools ({})\n", catalog.len()));

    for (group, tools) in catalog.grouped() {
        out.push('\n');
        out.push_str(&format!("   {}\n", group));
        out.push_str("   ─────────────────────────────────────────────────────────────\n");
        for tool in tools {
            out.push_str(&format!("   • {}\n", tool.name));
            if !tool.description.is_empty() {
                out.push_str(&format!(
                    "     {}\n",
                    truncate(&tool.description, DESCRIPTION_WIDTH)
                ));
            }
            let required = tool.required();
            if !required.is_empty() {
                out.push_str(&format!("     required: {}\n", required.join(", ")));
            }
        }
    }

    out
}
