//! Bridges from the storage and mail crates into the tool context traits.

use async_trait::async_trait;
use mercurio_mail::{Mailer, SaleProduct};
use mercurio_store::{Product, ProductService};
use mercurio_tools::{
    Error as ToolError, ProductCatalog, ProductView, Result as ToolResult, SaleItem, SaleNotifier,
};

/// Product lookups backed by the Postgres product service.
pub struct StoreCatalog {
    service: ProductService,
}

impl StoreCatalog {
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProductCatalog for StoreCatalog {
    async fn search_products(
        &self,
        keywords: &[String],
        limit: i64,
        min_stock: Option<i32>,
    ) -> ToolResult<Vec<ProductView>> {
        let products = self
            .service
            .search_products(keywords, limit, min_stock)
            .await
            .map_err(|err| ToolError::Execution(err.to_string()))?;
        Ok(products.into_iter().map(product_view).collect())
    }

    async fn product_by_identifier(
        &self,
        code: Option<&str>,
        reference: Option<&str>,
    ) -> ToolResult<ProductView> {
        let product = self
            .service
            .product_by_identifier(code, reference)
            .await
            .map_err(|err| ToolError::Execution(err.to_string()))?;
        Ok(product_view(product))
    }
}

fn product_view(product: Product) -> ProductView {
    ProductView {
        id: product.id.to_string(),
        code: product.code,
        reference: product.reference,
        description: product.description,
        stock: product.stock,
        wholesale_price_bs: product.wholesale_price_bs,
        retail_price: product.retail_price,
        wholesale_price_usd: product.wholesale_price_usd,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

/// Sale notifications delivered through the SMTP mailer.
pub struct MailNotifier {
    mailer: Mailer,
}

impl MailNotifier {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl SaleNotifier for MailNotifier {
    async fn send_sale_confirmation(
        &self,
        phone: &str,
        items: &[SaleItem],
        total: f64,
    ) -> ToolResult<()> {
        let products: Vec<SaleProduct> = items
            .iter()
            .map(|item| SaleProduct {
                code: item.code.clone(),
                description: item.description.clone(),
                retail_price: item.retail_price,
            })
            .collect();

        self.mailer
            .send_sale_confirmation(phone, &products, total)
            .await
            .map_err(|err| ToolError::Execution(err.to_string()))
    }
}
