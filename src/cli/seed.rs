//! Product import command
//!
//! `mercurio seed --file products.json` — bulk-load products from a JSON
//! array. Rows without a reference are skipped; transient insert failures
//! are retried before a row is reported as failed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mercurio_store::{create_pool, import_products_file, ProductRepository};

/// Run the seed command.
pub async fn run(file: PathBuf) -> Result<()> {
    let pool = create_pool(&super::database_url()?)
        .await
        .context("cannot connect to Postgres")?;

    let repository = ProductRepository::new(pool);
    repository
        .init_schema()
        .await
        .context("cannot initialize product schema")?;

    let summary = import_products_file(&repository, &file).await?;

    println!("Importados: {}", summary.created);
    if summary.failed > 0 {
        println!("Fallidos: {}", summary.failed);
        for failure in &summary.failures {
            println!("  {} - {}", failure.reference, failure.reason);
        }
    }
    Ok(())
}
