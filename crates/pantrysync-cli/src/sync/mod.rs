//! Batch sync: list receipts → fetch each → normalize → upsert each record.
//!
//! Everything runs strictly one call at a time. A receipt that cannot be
//! fetched is logged and skipped, and a record that cannot be upserted is
//! logged and counted; neither aborts the run. Only a failure to list
//! receipts propagates.

mod sources;

use pantrysync_core::CatalogRecord;
use pantrysync_lidl::{normalize_receipt, ReceiptDetail, ReceiptSummary};

pub(crate) use sources::{connect_catalog, connect_receipt_source};

/// Print a progress line after every this many successful imports.
const PROGRESS_EVERY: usize = 50;

/// Where receipts come from.
pub(crate) trait ReceiptSource {
    async fn list_receipts(&self) -> anyhow::Result<Vec<ReceiptSummary>>;
    async fn receipt_detail(&self, receipt_id: &str) -> anyhow::Result<ReceiptDetail>;
}

/// Where catalog records go. Upserts are idempotent on `record.id`.
pub(crate) trait CatalogStore {
    async fn upsert(&self, record: &CatalogRecord) -> anyhow::Result<()>;
}

/// Counters for one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct SyncReport {
    pub receipts_total: usize,
    /// Receipts whose detail fetch failed; their items were never collected.
    pub receipts_skipped: usize,
    pub records_collected: usize,
    pub imported: usize,
    /// Records whose upsert failed.
    pub failed: usize,
}

/// Runs one full sync against `source` and `store`.
///
/// # Errors
///
/// Returns an error only if the receipt list cannot be fetched. Per-receipt
/// and per-record failures are reflected in the returned [`SyncReport`].
pub(crate) async fn run_sync<S, C>(source: &S, store: &C) -> anyhow::Result<SyncReport>
where
    S: ReceiptSource,
    C: CatalogStore,
{
    println!("Fetching receipts...");
    let receipts = source.list_receipts().await?;

    let mut report = SyncReport {
        receipts_total: receipts.len(),
        ..SyncReport::default()
    };

    if receipts.is_empty() {
        println!("No receipts found");
        return Ok(report);
    }
    println!("Found {} receipts", receipts.len());

    let records = collect_records(source, &receipts, &mut report).await;
    report.records_collected = records.len();

    println!("Importing {} products to the catalog...", records.len());
    upsert_records(store, records, &mut report).await;

    if report.receipts_skipped > 0 {
        tracing::warn!(
            skipped = report.receipts_skipped,
            total = report.receipts_total,
            "some receipts could not be fetched"
        );
    }
    Ok(report)
}

async fn collect_records<S: ReceiptSource>(
    source: &S,
    receipts: &[ReceiptSummary],
    report: &mut SyncReport,
) -> Vec<CatalogRecord> {
    let mut records = Vec::new();

    for receipt in receipts {
        println!("Processing receipt {}...", receipt_label(receipt));
        match source.receipt_detail(&receipt.id).await {
            Ok(mut detail) => {
                detail.id = Some(receipt.id.clone());
                let normalized = normalize_receipt(&detail);
                tracing::debug!(
                    receipt = %receipt.id,
                    items = normalized.len(),
                    "normalized receipt"
                );
                records.extend(normalized);
            }
            Err(e) => {
                tracing::warn!(
                    receipt = %receipt.id,
                    error = %format!("{e:#}"),
                    "failed to fetch receipt; skipping"
                );
                eprintln!("Error processing receipt {}: {e:#}", receipt.id);
                report.receipts_skipped += 1;
            }
        }
    }

    records
}

async fn upsert_records<C: CatalogStore>(
    store: &C,
    records: Vec<CatalogRecord>,
    report: &mut SyncReport,
) {
    let total = records.len();

    for record in records {
        match store.upsert(&record).await {
            Ok(()) => {
                report.imported += 1;
                tracing::debug!(
                    id = %record.id,
                    category = record.category.label(),
                    "imported record"
                );
                if let Some(line) = progress_line(report.imported, total) {
                    println!("{line}");
                }
            }
            Err(e) => {
                tracing::error!(
                    id = %record.id,
                    product = %record.product_name,
                    error = %format!("{e:#}"),
                    "failed to import record"
                );
                eprintln!("  Failed to import {}: {e:#}", record.product_name);
                report.failed += 1;
            }
        }
    }
}

/// Receipt id, with the purchase date when the listing carried one.
fn receipt_label(receipt: &ReceiptSummary) -> String {
    match receipt.date.as_deref().filter(|d| !d.is_empty()) {
        Some(date) => format!("{} ({date})", receipt.id),
        None => receipt.id.clone(),
    }
}

/// Progress line due after `imported` successful imports, if any.
fn progress_line(imported: usize, total: usize) -> Option<String> {
    (imported > 0 && imported % PROGRESS_EVERY == 0)
        .then(|| format!("  Imported {imported}/{total}..."))
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
