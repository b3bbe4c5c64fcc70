//! Tool listing command
//!
//! `mercurio tools` — print the wire schemas advertised to the model,
//! exactly as they travel in a completion request.

use std::sync::Arc;

use anyhow::Result;
use mercurio_tools::{
    ProductCatalog, ProductView, Result as ToolResult, SaleItem, SaleNotifier, ToolCatalog,
    ToolContext,
};

// Schema listing never touches the catalog or the notifier; the stubs
// only satisfy the context so every builtin registers.
struct SchemaOnlyCatalog;

#[async_trait::async_trait]
impl ProductCatalog for SchemaOnlyCatalog {
    async fn search_products(
        &self,
        _keywords: &[String],
        _limit: i64,
        _min_stock: Option<i32>,
    ) -> ToolResult<Vec<ProductView>> {
        Ok(Vec::new())
    }

    async fn product_by_identifier(
        &self,
        _code: Option<&str>,
        _reference: Option<&str>,
    ) -> ToolResult<ProductView> {
        Err(mercurio_tools::Error::Execution(
            "listing only".to_string(),
        ))
    }
}

struct NullNotifier;

#[async_trait::async_trait]
impl SaleNotifier for NullNotifier {
    async fn send_sale_confirmation(
        &self,
        _phone: &str,
        _items: &[SaleItem],
        _total: f64,
    ) -> ToolResult<()> {
        Ok(())
    }
}

/// Run the tools command.
pub async fn run() -> Result<()> {
    let context = ToolContext::new(Arc::new(SchemaOnlyCatalog))
        .with_notifier(Arc::new(NullNotifier));
    let catalog = ToolCatalog::builtin(context)?;

    println!("{}", serde_json::to_string_pretty(&catalog.wire_schemas())?);
    Ok(())
}
