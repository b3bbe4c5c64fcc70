//! Mercurio Store - Postgres product storage
//!
//! Owns the products table: schema setup, parameterized queries for
//! keyword search and identifier lookup, validated service-level access,
//! and a retrying bulk importer for JSON product files.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod import;
pub mod product;
pub mod repository;
pub mod service;

pub use error::{Error, Result};
pub use import::{import_products, import_products_file, ImportFailure, ImportSummary};
pub use product::{NewProduct, Product};
pub use repository::{create_pool, ProductRepository};
pub use service::ProductService;
