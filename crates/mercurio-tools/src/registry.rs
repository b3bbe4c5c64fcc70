//! Tool registration and discovery
//!
//! Tool names form a closed set known at compile time. The registry maps
//! each name to at most one implementation and rejects duplicates at
//! registration time.

use crate::context::ToolContext;
use crate::error::{Error, Result};
use crate::schema::ParamSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Names of the tools Mercurio can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolName {
    /// Keyword search over the product catalog
    SearchProducts,
    /// Detail lookup for a single product
    GetProduct,
    /// Sale confirmation email
    SendSaleEmail,
}

impl ToolName {
    /// Every declarable tool, in catalog order
    pub const ALL: [ToolName; 3] = [
        ToolName::SearchProducts,
        ToolName::GetProduct,
        ToolName::SendSaleEmail,
    ];

    /// Wire name of the tool
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchProducts => "searchProducts",
            Self::GetProduct => "getProduct",
            Self::SendSaleEmail => "sendSaleEmail",
        }
    }

    /// Parse a wire name; case-sensitive
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.as_str() == name)
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for tool implementations
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Registered name
    fn name(&self) -> ToolName;

    /// Description surfaced to the model
    fn description(&self) -> &str;

    /// Argument schema
    fn schema(&self) -> ParamSchema;

    /// Run the tool with validated arguments
    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Canonical envelope for one tool execution
///
/// Success carries the handler payload untouched. Failure carries a JSON
/// object naming the error and the tool, so the model always learns which
/// call went wrong.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// Whether the handler completed without error
    pub success: bool,
    /// Handler payload, or the failure object
    pub payload: Value,
}

impl ToolOutcome {
    /// Successful execution with the handler payload
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    /// Failed execution; the payload names the error and the tool
    #[must_use]
    pub fn failure(tool: &str, error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            payload: serde_json::json!({
                "success": false,
                "error": error.to_string(),
                "toolName": tool,
            }),
        }
    }

    /// Render the payload as tool-result message content
    ///
    /// String payloads pass through verbatim; everything else serializes
    /// as compact JSON.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.payload {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Registry of tool implementations keyed by [`ToolName`]
pub struct ToolRegistry {
    tools: HashMap<ToolName, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool; a second registration under the same name fails
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name();
        if self.tools.contains_key(&name) {
            return Err(Error::Duplicate(name.as_str().to_string()));
        }
        debug!(tool = %name, "registering tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: ToolName) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name).cloned()
    }

    /// Check whether a tool is registered
    #[must_use]
    pub fn has(&self, name: ToolName) -> bool {
        self.tools.contains_key(&name)
    }

    /// Registered names in catalog order
    #[must_use]
    pub fn names(&self) -> Vec<ToolName> {
        ToolName::ALL
            .iter()
            .copied()
            .filter(|name| self.tools.contains_key(name))
            .collect()
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NoopTool(ToolName);

    #[async_trait::async_trait]
    impl Tool for NoopTool {
        fn name(&self) -> ToolName {
            self.0
        }

        fn description(&self) -> &str {
            "noop"
        }

        fn schema(&self) -> ParamSchema {
            ParamSchema::object()
        }

        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value> {
            Ok(json!({"ok": true}))
        }
    }

    #[test]
    fn test_tool_name_round_trip() {
        for name in ToolName::ALL {
            assert_eq!(ToolName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ToolName::parse("searchproducts"), None);
        assert_eq!(ToolName::parse("unknownTool"), None);
    }

    #[test]
    fn test_tool_name_serde_uses_wire_names() {
        let serialized = serde_json::to_string(&ToolName::SendSaleEmail).unwrap();
        assert_eq!(serialized, "\"sendSaleEmail\"");
        let parsed: ToolName = serde_json::from_str("\"searchProducts\"").unwrap();
        assert_eq!(parsed, ToolName::SearchProducts);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(NoopTool(ToolName::GetProduct)))
            .unwrap();
        let err = registry
            .register(Arc::new(NoopTool(ToolName::GetProduct)))
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(name) if name == "getProduct"));
    }

    #[test]
    fn test_names_follow_catalog_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(NoopTool(ToolName::SendSaleEmail)))
            .unwrap();
        registry
            .register(Arc::new(NoopTool(ToolName::SearchProducts)))
            .unwrap();
        assert_eq!(
            registry.names(),
            vec![ToolName::SearchProducts, ToolName::SendSaleEmail]
        );
    }

    #[test]
    fn test_outcome_render() {
        let text = ToolOutcome::success(json!("hola"));
        assert_eq!(text.render(), "hola");

        let object = ToolOutcome::success(json!({"success": true, "total": 12.5}));
        assert_eq!(object.render(), r#"{"success":true,"total":12.5}"#);

        let failure = ToolOutcome::failure("getProduct", "Producto no encontrado: X1");
        assert!(!failure.success);
        assert_eq!(failure.payload["success"], json!(false));
        assert_eq!(failure.payload["error"], "Producto no encontrado: X1");
        assert_eq!(failure.payload["toolName"], "getProduct");
    }
}
