//! Detail lookup for a single product
//!
//! Lookup failures are answered inside the payload, so the model can read
//! the reason and try a different identifier.

use crate::context::ToolContext;
use crate::error::Result;
use crate::registry::{Tool, ToolName};
use crate::schema::ParamSchema;
use chrono::SecondsFormat;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct GetProductArgs {
    code: Option<String>,
    reference: Option<String>,
}

/// Fetches one product by code or reference
#[derive(Debug, Default)]
pub struct GetProductTool;

#[async_trait::async_trait]
impl Tool for GetProductTool {
    fn name(&self) -> ToolName {
        ToolName::GetProduct
    }

    fn description(&self) -> &str {
        "Gets detailed information about a specific product by its code or reference number"
    }

    fn schema(&self) -> ParamSchema {
        ParamSchema::object()
            .field(
                "code",
                ParamSchema::string()
                    .optional()
                    .describe("Product code to search for"),
            )
            .field(
                "reference",
                ParamSchema::string()
                    .optional()
                    .describe("Product reference number to search for"),
            )
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: GetProductArgs = serde_json::from_value(args)?;
        let code = args.code.as_deref().filter(|value| !value.is_empty());
        let reference = args.reference.as_deref().filter(|value| !value.is_empty());

        if code.is_none() && reference.is_none() {
            return Ok(json!({
                "success": false,
                "error": "Debe proporcionar al menos un código o referencia del producto",
            }));
        }

        info!(code = ?code, reference = ?reference, "looking up product");

        match ctx.products.product_by_identifier(code, reference).await {
            Ok(product) => Ok(json!({
                "success": true,
                "product": {
                    "id": product.id,
                    "code": product.code,
                    "reference": product.reference,
                    "description": product.description,
                    "stock": product.stock,
                    "prices": {
                        "wholesaleBs": product.wholesale_price_bs.and_then(|p| p.to_f64()),
                        "retail": product.retail_price.and_then(|p| p.to_f64()),
                        "wholesaleUsd": product.wholesale_price_usd.and_then(|p| p.to_f64()),
                    },
                    "createdAt": product
                        .created_at
                        .to_rfc3339_opts(SecondsFormat::Millis, true),
                    "updatedAt": product
                        .updated_at
                        .to_rfc3339_opts(SecondsFormat::Millis, true),
                },
            })),
            Err(err) => {
                warn!(error = %err, "product lookup failed");
                Ok(json!({"success": false, "error": err.to_string()}))
            }
        }
    }
}
