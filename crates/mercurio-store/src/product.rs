//! Product entity and insert payload

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Primary key
    pub id: Uuid,
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

/// Payload for inserting a product
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Short product code
    #[serde(default)]
    pub code: Option<String>,
    /// Unique reference; records without one are skipped by the importer
    #[serde(default)]
    pub reference: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Units in stock
    #[serde(default)]
    pub stock: i32,
    /// Wholesale price in bolívares
    #[serde(default)]
    pub wholesale_price_bs: Option<Decimal>,
    /// Retail price in USD
    #[serde(default)]
    pub retail_price: Option<Decimal>,
    /// Wholesale price in USD
    #[serde(default)]
    pub wholesale_price_usd: Option<Decimal>,
}
