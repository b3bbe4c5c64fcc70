//! Builtin sales tools

mod format;
mod get_product;
mod search_products;
mod send_sale_email;

pub use format::format_search_results;
pub use get_product::GetProductTool;
pub use search_products::SearchProductsTool;
pub use send_sale_email::SendSaleEmailTool;

use crate::error::Result;
use crate::registry::ToolRegistry;
use std::sync::Arc;

/// Register the builtin tools
///
/// `sendSaleEmail` only joins the registry when a notifier is wired in.
pub fn register_builtins(registry: &mut ToolRegistry, with_notifier: bool) -> Result<()> {
    registry.register(Arc::new(SearchProductsTool))?;
    registry.register(Arc::new(GetProductTool))?;
    if with_notifier {
        registry.register(Arc::new(SendSaleEmailTool))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolName;

    #[test]
    fn test_register_builtins_without_notifier() {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, false).unwrap();
        assert_eq!(
            registry.names(),
            vec![ToolName::SearchProducts, ToolName::GetProduct]
        );
    }

    #[test]
    fn test_register_builtins_with_notifier() {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, true).unwrap();
        assert!(registry.has(ToolName::SendSaleEmail));
        assert_eq!(registry.len(), 3);
    }
}
