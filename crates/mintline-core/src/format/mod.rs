//! Response formatting
//!
//! Converts a successful response envelope into the text returned to the MCP
//! client. Renderers are registered by tool name; names without a renderer
//! fall back to a pretty-printed dump of the payload.
//!
//! Formatting is total: a missing field degrades to a placeholder, it never
//! produces an error.

pub mod fields;
mod renderers;

use std::collections::HashMap;

use serde_json::Value;

use crate::router::Envelope;

/// A renderer receives the envelope's `data` member (`null` when absent)
pub type FormatFn = fn(&Value) -> String;

/// Tool name -> renderer
#[derive(Clone)]
pub struct FormatterRegistry {
    renderers: HashMap<&'static str, FormatFn>,
}

impl Default for FormatterRegistry {
    /// Registry with renderers for every Mintline operation
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("list_receipts", renderers::list_receipts);
        registry.register("get_receipt", renderers::get_receipt);
        registry.register("list_transactions", renderers::list_transactions);
        registry.register("get_transaction", renderers::get_transaction);
        registry.register("list_statements", renderers::list_statements);
        registry.register("list_matches", renderers::list_matches);
        registry.register("confirm_match", renderers::confirm_match);
        registry.register("reject_match", renderers::reject_match);
        registry.register("spending_summary", renderers::spending_summary);
        registry.register("top_vendors", renderers::top_vendors);
        registry.register("spending_trends", renderers::spending_trends);
        registry.register("unmatched_summary", renderers::unmatched_summary);
        registry
    }
}

impl FormatterRegistry {
    /// Registry with no bespoke renderers (everything is dumped)
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, renderer: FormatFn) {
        self.renderers.insert(name, renderer);
    }

    pub fn has_renderer(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Render a successful envelope for the given tool
    pub fn format(&self, name: &str, envelope: &Envelope) -> String {
        match self.renderers.get(name) {
            Some(render) => render(envelope.data().unwrap_or(&fields::NULL)),
            None => dump(envelope),
        }
    }
}

/// Structural dump: the `data` member, or the whole envelope without one
fn dump(envelope: &Envelope) -> String {
    let payload = envelope.data().unwrap_or_else(|| envelope.as_value());
    serde_json::to_string_pretty(payload).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_name() {
        let registry = FormatterRegistry::default();
        let env = Envelope::new(json!({"success": true, "data": []}));
        assert_eq!(registry.format("list_receipts", &env), "No receipts found.");
        assert_eq!(registry.format("list_matches", &env), "No matches found.");
    }

    #[test]
    fn test_receipt_with_vendor_name_and_no_date() {
        let registry = FormatterRegistry::default();
        let env = Envelope::new(json!({
            "success": true,
            "data": [{"id": "rcpt_1", "vendorName": "Corner Cafe", "totalAmount": 4}]
        }));
        let out = registry.format("list_receipts", &env);
        assert!(out.contains("Corner Cafe"));
        assert!(out.contains("no date"));
    }

    #[test]
    fn test_unregistered_falls_back_to_dump() {
        let registry = FormatterRegistry::default();
        let env = Envelope::new(json!({"success": true, "data": {"vendors": 3}}));
        assert_eq!(
            registry.format("list_vendors", &env),
            "{\n  \"vendors\": 3\n}"
        );

        let no_data = Envelope::new(json!({"success": true}));
        assert_eq!(
            registry.format("export_csv", &no_data),
            "{\n  \"success\": true\n}"
        );
    }

    #[test]
    fn test_missing_data_never_panics() {
        let registry = FormatterRegistry::default();
        let env = Envelope::new(json!({"success": true}));
        for name in [
            "list_receipts",
            "get_receipt",
            "list_transactions",
            "get_transaction",
            "list_statements",
            "list_matches",
            "confirm_match",
            "reject_match",
            "spending_summary",
            "top_vendors",
            "spending_trends",
            "unmatched_summary",
        ] {
            assert!(registry.has_renderer(name));
            assert!(!registry.format(name, &env).is_empty());
        }
    }

    #[test]
    fn test_custom_registration() {
        fn shout(_: &Value) -> String {
            "HELLO".to_string()
        }
        let mut registry = FormatterRegistry::empty();
        assert!(!registry.has_renderer("greet"));
        registry.register("greet", shout);
        let env = Envelope::new(json!({"success": true, "data": null}));
        assert_eq!(registry.format("greet", &env), "HELLO");
    }
}
