//! Spanish list rendering for product search results

use crate::context::ProductView;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Most entries shown before the overflow footer kicks in
const DEFAULT_MAX_ITEMS: usize = 5;

/// Render search results as the list text shown to the customer
#[must_use]
pub fn format_search_results(products: &[ProductView]) -> String {
    format_with_limit(products, DEFAULT_MAX_ITEMS)
}

fn format_with_limit(products: &[ProductView], max_items: usize) -> String {
    if products.is_empty() {
        return "No se encontraron productos para mostrar.".to_string();
    }

    let shown = &products[..products.len().min(max_items)];
    let entries: Vec<String> = shown
        .iter()
        .enumerate()
        .map(|(index, product)| format_entry(index + 1, product))
        .collect();

    let header = if products.len() == 1 {
        "✅ Encontré 1 producto que puede servirte:\n\n".to_string()
    } else {
        format!(
            "✅ Encontré {} productos, te muestro los más relevantes:\n\n",
            products.len()
        )
    };

    let remaining = products.len() - shown.len();
    let footer = if remaining > 0 {
        format!("\n...y {remaining} más. Si quieres, aclara mejor lo que buscas para afinar la lista.")
    } else {
        String::new()
    };

    format!("{header}{}{footer}", entries.join("\n\n"))
}

fn format_entry(position: usize, product: &ProductView) -> String {
    let description = product
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or("Sin descripción");

    let mut price_parts = Vec::new();
    if let Some(retail) = as_f64(product.retail_price) {
        price_parts.push(format!("detalle: ${retail:.2}"));
    }
    if let Some(wholesale_bs) = as_f64(product.wholesale_price_bs) {
        price_parts.push(format!("mayor: {wholesale_bs:.2} Bs"));
    }
    if let Some(wholesale_usd) = as_f64(product.wholesale_price_usd) {
        price_parts.push(format!("mayor: ${wholesale_usd:.2}"));
    }

    let price_text = if price_parts.is_empty() {
        "precio no disponible".to_string()
    } else {
        price_parts.join(" | ")
    };

    format!(
        "#️⃣ {position}. {description}\n   {price_text} | 📦 {stock}",
        stock = product.stock
    )
}

fn as_f64(price: Option<Decimal>) -> Option<f64> {
    price.and_then(|value| value.to_f64())
}
