//! Tool catalog: cached wire schemas and isolated execution
//!
//! The catalog owns the registry and the execution context. Lowered
//! schemas are cached and rebuilt lazily once the TTL passes. Execution
//! never returns an error to the caller; every failure is folded into a
//! [`ToolOutcome`] so one bad call cannot take the conversation down.

use crate::builtins;
use crate::context::ToolContext;
use crate::error::{Error, Result};
use crate::registry::{ToolName, ToolOutcome, ToolRegistry};
use crate::schema::{ArgumentValidator, JsonSchemaLowering};
use mercurio_llm::ToolSchema;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// How long lowered schemas stay cached before a rebuild
pub const SCHEMA_CACHE_TTL: Duration = Duration::from_secs(60);

struct SchemaCache {
    schemas: Vec<ToolSchema>,
    refreshed_at: Instant,
}

/// Catalog owning the registry, the execution context, and the schema cache
pub struct ToolCatalog {
    registry: ToolRegistry,
    context: ToolContext,
    ttl: Duration,
    cache: RwLock<Option<SchemaCache>>,
    refreshes: AtomicU64,
}

impl ToolCatalog {
    /// Create a catalog over a registry and context
    #[must_use]
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry,
            context,
            ttl: SCHEMA_CACHE_TTL,
            cache: RwLock::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Catalog preloaded with the builtin sales tools
    ///
    /// `sendSaleEmail` is registered only when the context carries a
    /// notifier.
    pub fn builtin(context: ToolContext) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        builtins::register_builtins(&mut registry, context.notifier.is_some())?;
        Ok(Self::new(registry, context))
    }

    /// Override the schema cache TTL
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Access the registry
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Access the execution context
    #[must_use]
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Number of times the schema cache has been rebuilt
    #[must_use]
    pub fn cache_refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Wire schemas for the completion request
    ///
    /// Served from cache while fresh; rebuilt from the registry once the
    /// TTL passes.
    pub fn wire_schemas(&self) -> Vec<ToolSchema> {
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.as_ref() {
                if entry.refreshed_at.elapsed() < self.ttl {
                    return entry.schemas.clone();
                }
            }
        }

        let schemas = self.build_schemas();
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        debug!(tools = schemas.len(), "rebuilt tool schema cache");

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(SchemaCache {
            schemas: schemas.clone(),
            refreshed_at: Instant::now(),
        });
        schemas
    }

    fn build_schemas(&self) -> Vec<ToolSchema> {
        self.registry
            .names()
            .into_iter()
            .filter_map(|name| self.registry.get(name))
            .map(|tool| {
                ToolSchema::new(
                    tool.name().as_str(),
                    tool.description(),
                    JsonSchemaLowering::lower(&tool.schema()),
                )
            })
            .collect()
    }

    /// Execute a tool by wire name
    ///
    /// Unknown tools, invalid arguments, and handler errors all come back
    /// as failure outcomes; this method never errors.
    pub async fn execute(&self, name: &str, args: Value) -> ToolOutcome {
        match self.try_execute(name, args).await {
            Ok(payload) => {
                info!(tool = %name, "tool executed");
                ToolOutcome::success(payload)
            }
            Err(Error::NotFound(tool)) => {
                error!(tool = %tool, "tool not registered");
                ToolOutcome::failure(name, format!("Tool \"{tool}\" no existe en MCP"))
            }
            Err(err) => {
                error!(tool = %name, error = %err, "tool execution failed");
                ToolOutcome::failure(name, err)
            }
        }
    }

    async fn try_execute(&self, name: &str, args: Value) -> Result<Value> {
        let tool_name =
            ToolName::parse(name).ok_or_else(|| Error::NotFound(name.to_string()))?;
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let offending = ArgumentValidator::validate(&tool.schema(), &args);
        if !offending.is_empty() {
            return Err(Error::InvalidArguments {
                tool: name.to_string(),
                fields: offending,
            });
        }

        tool.execute(args, &self.context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProductCatalog, ProductView};
    use crate::registry::Tool;
    use crate::schema::ParamSchema;
    use serde_json::json;
    use std::sync::Arc;

    struct EmptyCatalog;

    #[async_trait::async_trait]
    impl ProductCatalog for EmptyCatalog {
        async fn search_products(
            &self,
            _keywords: &[String],
            _limit: i64,
            _min_stock: Option<i32>,
        ) -> Result<Vec<ProductView>> {
            Ok(Vec::new())
        }

        async fn product_by_identifier(
            &self,
            _code: Option<&str>,
            _reference: Option<&str>,
        ) -> Result<ProductView> {
            Err(Error::Execution("Producto no encontrado: X".to_string()))
        }
    }

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> ToolName {
            ToolName::GetProduct
        }

        fn description(&self) -> &str {
            "echoes its arguments"
        }

        fn schema(&self) -> ParamSchema {
            ParamSchema::object().field("code", ParamSchema::string())
        }

        async fn execute(&self, args: Value, _ctx: &ToolContext) -> Result<Value> {
            Ok(args)
        }
    }

    struct FailingTool;

    #[async_trait::async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> ToolName {
            ToolName::SearchProducts
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn schema(&self) -> ParamSchema {
            ParamSchema::object()
        }

        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<Value> {
            Err(Error::Execution("DB down".to_string()))
        }
    }

    fn test_context() -> ToolContext {
        ToolContext::new(Arc::new(EmptyCatalog))
    }

    fn test_catalog() -> ToolCatalog {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        registry.register(Arc::new(FailingTool)).unwrap();
        ToolCatalog::new(registry, test_context())
    }

    #[tokio::test]
    async fn test_execute_success_passes_payload_through() {
        let catalog = test_catalog();
        let outcome = catalog
            .execute("getProduct", json!({"code": "A1"}))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.payload, json!({"code": "A1"}));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_is_enveloped() {
        let catalog = test_catalog();
        let outcome = catalog.execute("noSuchTool", json!({})).await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.payload["error"],
            "Tool \"noSuchTool\" no existe en MCP"
        );
        assert_eq!(outcome.payload["toolName"], "noSuchTool");
    }

    #[tokio::test]
    async fn test_execute_invalid_arguments_name_fields() {
        let catalog = test_catalog();
        let outcome = catalog.execute("getProduct", json!({"code": 7})).await;
        assert!(!outcome.success);
        let message = outcome.payload["error"].as_str().unwrap();
        assert_eq!(message, "invalid arguments for tool getProduct: code");
    }

    #[tokio::test]
    async fn test_execute_handler_failure_is_isolated() {
        let catalog = test_catalog();
        let outcome = catalog.execute("searchProducts", json!({})).await;
        assert!(!outcome.success);
        assert_eq!(outcome.payload["error"], "DB down");
        assert_eq!(outcome.payload["toolName"], "searchProducts");
    }

    #[test]
    fn test_wire_schemas_cached_within_ttl() {
        let catalog = test_catalog();
        assert_eq!(catalog.cache_refreshes(), 0);
        let first = catalog.wire_schemas();
        assert_eq!(catalog.cache_refreshes(), 1);
        let second = catalog.wire_schemas();
        assert_eq!(catalog.cache_refreshes(), 1);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_wire_schemas_rebuilt_after_ttl() {
        let catalog = test_catalog().with_ttl(Duration::ZERO);
        let _ = catalog.wire_schemas();
        let _ = catalog.wire_schemas();
        assert_eq!(catalog.cache_refreshes(), 2);
    }

    #[test]
    fn test_wire_schemas_follow_catalog_order() {
        let catalog = test_catalog();
        let schemas = catalog.wire_schemas();
        let names: Vec<_> = schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["searchProducts", "getProduct"]);
    }
}
