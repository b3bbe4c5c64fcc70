//! Bulk product import
//!
//! Imports run record by record so one bad row never aborts the batch.
//! Transient database errors are retried with backoff; duplicate keys and
//! validation errors fail the row on the first attempt.

use crate::error::{Error, Result};
use crate::product::NewProduct;
use crate::repository::ProductRepository;
use mercurio_retry::{classify, retry, ErrorClass, RetryPolicy};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// One record that could not be imported
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    /// Reference of the failed record
    pub reference: String,
    /// Final error message after retries
    pub reason: String,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// Rows inserted
    pub created: usize,
    /// Rows that failed after exhausting retries or on a fatal error
    pub failed: usize,
    /// Details for every failed row
    pub failures: Vec<ImportFailure>,
}

/// Read a JSON product file and import every record
pub async fn import_products_file(
    repository: &ProductRepository,
    path: impl AsRef<Path>,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::Import(format!("cannot read {}: {err}", path.display())))?;
    let records: Vec<NewProduct> = serde_json::from_str(&contents)
        .map_err(|err| Error::Import(format!("invalid product file: {err}")))?;

    info!(path = %path.display(), records = records.len(), "importing products");
    Ok(import_products(repository, &records).await)
}

/// Import records one at a time, retrying transient failures
///
/// Records without a reference are skipped. The summary reports how many
/// rows were created and which ones failed, with the final error message
/// for each.
pub async fn import_products(
    repository: &ProductRepository,
    records: &[NewProduct],
) -> ImportSummary {
    let policy = RetryPolicy::default();
    let mut summary = ImportSummary::default();

    for record in records {
        if record.reference.is_empty() {
            warn!("skipping product without reference");
            continue;
        }

        let outcome = retry(
            &policy,
            || repository.create(record),
            |err: &Error| classify(&err.to_string(), err.sqlstate().as_deref()) == ErrorClass::Retryable,
        )
        .await;

        match outcome {
            Ok(product) => {
                summary.created += 1;
                debug!(reference = %product.reference, "product imported");
            }
            Err(err) => {
                summary.failed += 1;
                error!(reference = %record.reference, error = %err, "product import failed");
                summary.failures.push(ImportFailure {
                    reference: record.reference.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        created = summary.created,
        failed = summary.failed,
        "product import finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_reference_parses_as_empty() {
        let record: NewProduct = serde_json::from_str(r#"{"description": "sin ref"}"#).unwrap();
        assert!(record.reference.is_empty());
    }

    #[test]
    fn test_duplicate_errors_are_fatal_for_import() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        // RowNotFound has no SQLSTATE; the message signature decides.
        assert_eq!(err.sqlstate(), None);

        let duplicate = Error::Import("duplicate key value violates unique constraint".to_string());
        assert_eq!(
            classify(&duplicate.to_string(), duplicate.sqlstate().as_deref()),
            ErrorClass::Fatal
        );

        let transient = Error::Import("connection reset by peer".to_string());
        assert_eq!(
            classify(&transient.to_string(), transient.sqlstate().as_deref()),
            ErrorClass::Retryable
        );
    }

    #[test]
    fn test_summary_serializes_failures() {
        let summary = ImportSummary {
            created: 2,
            failed: 1,
            failures: vec![ImportFailure {
                reference: "REF-7".to_string(),
                reason: "Non-retryable error: duplicate key".to_string(),
            }],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["created"], 2);
        assert_eq!(json["failures"][0]["reference"], "REF-7");
    }
}
