//! Keyword search over the product catalog
//!
//! Success and failure both come back as plain text so the model can
//! forward the list to the customer without reformatting.

use crate::builtins::format::format_search_results;
use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Tool, ToolName};
use crate::schema::ParamSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Results returned when the model does not ask for a limit
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
struct SearchArgs {
    keywords: Vec<String>,
    limit: Option<f64>,
    #[serde(rename = "minStock")]
    min_stock: Option<f64>,
}

/// Searches for products by keywords
#[derive(Debug, Default)]
pub struct SearchProductsTool;

#[async_trait::async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> ToolName {
        ToolName::SearchProducts
    }

    fn description(&self) -> &str {
        "Searches for products using keywords in description, code, or reference. \
         Perfect for finding products when user describes what they need."
    }

    fn schema(&self) -> ParamSchema {
        ParamSchema::object()
            .field(
                "keywords",
                ParamSchema::array(ParamSchema::string())
                    .min_items(1)
                    .describe(
                        "List of keywords to search in products (e.g., ['laptop', 'dell', '16gb'])",
                    ),
            )
            .field(
                "limit",
                ParamSchema::number()
                    .optional()
                    .describe("Maximum number of results to return (default: 10)"),
            )
            .field(
                "minStock",
                ParamSchema::number().optional().describe(
                    "Filter only products with stock greater than or equal to this value",
                ),
            )
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: SearchArgs = serde_json::from_value(args)?;
        let limit = args.limit.map_or(DEFAULT_LIMIT, |value| value as i64);
        let min_stock = args.min_stock.map(|value| value as i32);

        info!(keywords = ?args.keywords, limit, "searching products");

        match ctx
            .products
            .search_products(&args.keywords, limit, min_stock)
            .await
        {
            Ok(products) if products.is_empty() => Ok(Value::String(format!(
                "No se encontraron productos con las palabras clave: {}",
                args.keywords.join(", ")
            ))),
            Ok(products) => {
                info!(found = products.len(), "products found");
                Ok(Value::String(format_search_results(&products)))
            }
            Err(err) => {
                warn!(error = %err, "product search failed");
                Ok(Value::String(format!("❌ Error buscando productos: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProductCatalog, ProductView};
    use crate::error::Error;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    struct StubCatalog {
        products: Vec<ProductView>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ProductCatalog for StubCatalog {
        async fn search_products(
            &self,
            _keywords: &[String],
            _limit: i64,
            _min_stock: Option<i32>,
        ) -> Result<Vec<ProductView>> {
            if self.fail {
                return Err(Error::Execution("connection refused".to_string()));
            }
            Ok(self.products.clone())
        }

        async fn product_by_identifier(
            &self,
            _code: Option<&str>,
            _reference: Option<&str>,
        ) -> Result<ProductView> {
            unreachable!("not used by this tool")
        }
    }

    fn context(products: Vec<ProductView>, fail: bool) -> ToolContext {
        ToolContext::new(Arc::new(StubCatalog { products, fail }))
    }

    fn sample() -> ProductView {
        ProductView {
            id: "p-1".to_string(),
            code: Some("A1".to_string()),
            reference: "REF-1".to_string(),
            description: Some("Teclado mecánico".to_string()),
            stock: 4,
            wholesale_price_bs: None,
            retail_price: Some("45.00".parse().unwrap()),
            wholesale_price_usd: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_formats_found_products() {
        let tool = SearchProductsTool;
        let result = tool
            .execute(
                json!({"keywords": ["teclado"]}),
                &context(vec![sample()], false),
            )
            .await
            .unwrap();
        let text = result.as_str().unwrap();
        assert!(text.starts_with("✅ Encontré 1 producto"));
        assert!(text.contains("Teclado mecánico"));
    }

    #[tokio::test]
    async fn test_empty_results_name_the_keywords() {
        let tool = SearchProductsTool;
        let result = tool
            .execute(
                json!({"keywords": ["tornillo", "m8"]}),
                &context(Vec::new(), false),
            )
            .await
            .unwrap();
        assert_eq!(
            result,
            json!("No se encontraron productos con las palabras clave: tornillo, m8")
        );
    }

    #[tokio::test]
    async fn test_catalog_error_becomes_text() {
        let tool = SearchProductsTool;
        let result = tool
            .execute(json!({"keywords": ["x"]}), &context(Vec::new(), true))
            .await
            .unwrap();
        assert_eq!(
            result,
            json!("❌ Error buscando productos: connection refused")
        );
    }

    #[test]
    fn test_schema_declares_required_keywords() {
        let lowered =
            crate::schema::JsonSchemaLowering::lower(&SearchProductsTool.schema());
        assert_eq!(lowered["required"], json!(["keywords"]));
        assert_eq!(lowered["properties"]["keywords"]["minItems"], 1);
        assert_eq!(
            lowered["properties"]["limit"]["description"],
            "Maximum number of results to return (default: 10)"
        );
    }
}
