//! Sale confirmation email tool
//!
//! The total is the sum of the retail prices the model echoes back;
//! products without a price count as zero.

use crate::context::{SaleItem, ToolContext};
use crate::error::Result;
use crate::registry::{Tool, ToolName};
use crate::schema::ParamSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct SaleArgs {
    phone: String,
    products: Vec<PurchasedProduct>,
}

#[derive(Debug, Deserialize)]
struct PurchasedProduct {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    retail_price: Option<f64>,
}

/// Sends the sale confirmation email
#[derive(Debug, Default)]
pub struct SendSaleEmailTool;

fn product_item_schema() -> ParamSchema {
    ParamSchema::object()
        .field("id", ParamSchema::string())
        .field("code", ParamSchema::string().optional())
        .field("reference", ParamSchema::string().optional())
        .field("description", ParamSchema::string().optional())
        .field("stock", ParamSchema::number().optional())
        .field("wholesale_price_bs", ParamSchema::number().optional())
        .field("retail_price", ParamSchema::number().optional())
        .field("wholesale_price_usd", ParamSchema::number().optional())
        .field("createdAt", ParamSchema::string().optional())
        .field("updatedAt", ParamSchema::string().optional())
}

#[async_trait::async_trait]
impl Tool for SendSaleEmailTool {
    fn name(&self) -> ToolName {
        ToolName::SendSaleEmail
    }

    fn description(&self) -> &str {
        "Sends a sale confirmation email including product details and total price"
    }

    fn schema(&self) -> ParamSchema {
        ParamSchema::object()
            .field(
                "phone",
                ParamSchema::string().describe("Customer phone number"),
            )
            .field(
                "products",
                ParamSchema::array(product_item_schema())
                    .describe("List of purchased products with prices"),
            )
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value> {
        let args: SaleArgs = serde_json::from_value(args)?;
        let Some(notifier) = ctx.notifier.as_ref() else {
            return Ok(json!({
                "success": false,
                "error": "Servicio de correo no configurado",
            }));
        };

        let total: f64 = args
            .products
            .iter()
            .filter_map(|product| product.retail_price)
            .sum();
        let items: Vec<SaleItem> = args
            .products
            .iter()
            .map(|product| SaleItem {
                code: product.code.clone(),
                description: product.description.clone(),
                retail_price: product.retail_price,
            })
            .collect();

        info!(phone = %args.phone, total, products = items.len(), "sending sale confirmation");

        match notifier
            .send_sale_confirmation(&args.phone, &items, total)
            .await
        {
            Ok(()) => Ok(json!({
                "success": true,
                "message": "Correo de venta enviado correctamente",
                "total": total,
            })),
            Err(err) => {
                warn!(error = %err, "sale confirmation failed");
                Ok(json!({"success": false, "error": err.to_string()}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProductCatalog, ProductView, SaleNotifier};
    use crate::error::Error;
    use std::sync::{Arc, Mutex};

    struct UnusedCatalog;

    #[async_trait::async_trait]
    impl ProductCatalog for UnusedCatalog {
        async fn search_products(
            &self,
            _keywords: &[String],
            _limit: i64,
            _min_stock: Option<i32>,
        ) -> Result<Vec<ProductView>> {
            unreachable!("not used by this tool")
        }

        async fn product_by_identifier(
            &self,
            _code: Option<&str>,
            _reference: Option<&str>,
        ) -> Result<ProductView> {
            unreachable!("not used by this tool")
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, usize, f64)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SaleNotifier for RecordingNotifier {
        async fn send_sale_confirmation(
            &self,
            phone: &str,
            items: &[SaleItem],
            total: f64,
        ) -> Result<()> {
            if self.fail {
                return Err(Error::Execution("smtp unreachable".to_string()));
            }
            self.sent
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((phone.to_string(), items.len(), total));
            Ok(())
        }
    }

    fn sale_args() -> Value {
        json!({
            "phone": "+584121234567",
            "products": [
                {"id": "p-1", "code": "A1", "description": "Mouse", "retail_price": 12.5},
                {"id": "p-2", "description": "Alfombrilla"},
                {"id": "p-3", "code": "C3", "retail_price": 7.25},
            ],
        })
    }

    #[tokio::test]
    async fn test_sends_and_totals_retail_prices() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = ToolContext::new(Arc::new(UnusedCatalog)).with_notifier(notifier.clone());

        let result = SendSaleEmailTool.execute(sale_args(), &ctx).await.unwrap();
        assert_eq!(result["success"], json!(true));
        assert_eq!(result["message"], "Correo de venta enviado correctamente");
        assert_eq!(result["total"], json!(19.75));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("+584121234567".to_string(), 3, 19.75));
    }

    #[tokio::test]
    async fn test_notifier_failure_is_reported() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
            fail: true,
        });
        let ctx = ToolContext::new(Arc::new(UnusedCatalog)).with_notifier(notifier);

        let result = SendSaleEmailTool.execute(sale_args(), &ctx).await.unwrap();
        assert_eq!(result["success"], json!(false));
        assert_eq!(result["error"], "smtp unreachable");
    }

    #[tokio::test]
    async fn test_without_notifier() {
        let ctx = ToolContext::new(Arc::new(UnusedCatalog));
        let result = SendSaleEmailTool.execute(sale_args(), &ctx).await.unwrap();
        assert_eq!(result["success"], json!(false));
        assert_eq!(result["error"], "Servicio de correo no configurado");
    }
}
