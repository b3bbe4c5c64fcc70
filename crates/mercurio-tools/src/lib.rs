//! Mercurio Tools - Tool registry and builtin sales tools
//!
//! This crate declares the tools the sales agent can call:
//! - Schema tree with visitors for JSON Schema lowering and argument
//!   validation
//! - Compile-time tool name table and duplicate-rejecting registry
//! - Catalog with TTL-cached wire schemas and isolated execution
//! - Builtin tools: `searchProducts`, `getProduct`, `sendSaleEmail`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod catalog;
pub mod context;
pub mod error;
pub mod registry;
pub mod schema;

pub use catalog::{ToolCatalog, SCHEMA_CACHE_TTL};
pub use context::{ProductCatalog, ProductView, SaleItem, SaleNotifier, ToolContext};
pub use error::{Error, Result};
pub use registry::{Tool, ToolName, ToolOutcome, ToolRegistry};
pub use schema::{ArgumentValidator, JsonSchemaLowering, ParamSchema, SchemaVisitor};
