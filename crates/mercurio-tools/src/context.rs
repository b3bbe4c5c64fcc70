//! Execution context and collaborator seams for tools
//!
//! Tools never talk to the database or the mail relay directly; they go
//! through the trait objects carried by [`ToolContext`].

use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Product row as seen by the tools
#[derive(Debug, Clone)]
pub struct ProductView {
    /// Stable identifier, UUID as text
    pub id: String,
    /// Short product code, when assigned
    pub code: Option<String>,
    /// Unique reference
    pub reference: String,
    /// Free-form description
    pub description: Option<String>,
    /// Units in stock
    pub stock: i32,
    /// Wholesale price in bolívares
    pub wholesale_price_bs: Option<Decimal>,
    /// Retail price in USD
    pub retail_price: Option<Decimal>,
    /// Wholesale price in USD
    pub wholesale_price_usd: Option<Decimal>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One line of a sale confirmation
#[derive(Debug, Clone)]
pub struct SaleItem {
    /// Product code, when known
    pub code: Option<String>,
    /// Product description, when known
    pub description: Option<String>,
    /// Retail price counted into the total
    pub retail_price: Option<f64>,
}

/// Read access to the product catalog
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Keyword search over description, reference, and code
    async fn search_products(
        &self,
        keywords: &[String],
        limit: i64,
        min_stock: Option<i32>,
    ) -> Result<Vec<ProductView>>;

    /// Look a product up by code or reference; at least one must be given
    async fn product_by_identifier(
        &self,
        code: Option<&str>,
        reference: Option<&str>,
    ) -> Result<ProductView>;
}

/// Outbound channel for sale confirmations
#[async_trait::async_trait]
pub trait SaleNotifier: Send + Sync {
    /// Send a confirmation for the given purchase
    async fn send_sale_confirmation(
        &self,
        phone: &str,
        items: &[SaleItem],
        total: f64,
    ) -> Result<()>;
}

/// Shared handles passed to every tool execution
#[derive(Clone)]
pub struct ToolContext {
    /// Product catalog access
    pub products: Arc<dyn ProductCatalog>,
    /// Sale notifier, present when mail is configured
    pub notifier: Option<Arc<dyn SaleNotifier>>,
}

impl ToolContext {
    /// Context with catalog access only
    #[must_use]
    pub fn new(products: Arc<dyn ProductCatalog>) -> Self {
        Self {
            products,
            notifier: None,
        }
    }

    /// Attach a sale notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SaleNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}
