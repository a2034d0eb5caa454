mod config;
mod document;
mod domain;
mod engine;
mod error;
mod input;
mod output;
mod telemetry;

use std::collections::{HashMap, HashSet};

use tracing::info;

pub use config::PipelineConfig;
pub use document::{
    ConcatMerger, DirectoryFetcher, DocumentFetcher, DocumentMerger, FetchedDocument,
};
pub use domain::{
    CarrierGroup, DocumentRequestParams, DocumentType, OrderId, PrintableOrder, ShopGroup, ShopId,
    UNKNOWN_CARRIER,
};
pub use engine::{ProgressState, partition};
pub use error::{Error, FetchError, MergeError};
pub use output::{
    BulkPrintOutcome, FailedOrderRecord, PrintReport, ShopDocument, ShopDocuments, ShopReport,
    TRACKING_PLACEHOLDER,
};
pub use telemetry::setup_logging;

/// Reads orders from a CSV export.
///
/// Malformed rows and rows violating domain rules (e.g. an order without a shop name) are handed
/// to `on_error` and skipped; parsing continues with the remaining rows.
pub fn read_orders(
    reader: impl std::io::Read,
    mut on_error: impl FnMut(Error),
) -> impl Iterator<Item = PrintableOrder> {
    input::parse_orders(reader).filter_map(move |result| match result {
        Ok(order) => Some(order),
        Err(e) => {
            on_error(e);
            None
        }
    })
}

/// Fetches, merges and tallies the shipping documents of the given orders.
///
/// This is the single entry point of the pipeline. The orders are grouped by shop and then by
/// carrier; every carrier group is requested from `fetcher` once, under the limits of `config`.
/// The documents of each shop are combined by `merger`. `on_progress` is called after every
/// completed carrier group.
///
/// # Error handling
///
/// A run never fails as a whole. A carrier group whose request fails or times out counts all its
/// orders as failed; orders named as failed by the document service count individually; a shop
/// whose documents cannot be merged simply has no document in the outcome. All failed orders are
/// listed in [`PrintReport::failed_orders`], and [`retry_orders`] turns them into the input of
/// a retry run.
///
/// # Example
///
/// ```no_run
/// use waybill_print_rs::{
///     ConcatMerger, DirectoryFetcher, PipelineConfig, read_orders, run_bulk_print, unprinted,
/// };
///
/// # async fn demo() -> anyhow::Result<()> {
/// let reader = std::fs::File::open("orders.csv")?;
/// let orders: Vec<_> = read_orders(reader, |e| eprintln!("skipped: {e}")).collect();
///
/// let fetcher = DirectoryFetcher::new("documents");
/// let outcome = run_bulk_print(
///     &unprinted(&orders),
///     &fetcher,
///     &ConcatMerger,
///     &PipelineConfig::default(),
///     |progress| eprintln!("{}/{}", progress.processed, progress.total),
/// )
/// .await;
///
/// println!("{}", outcome.report);
/// # Ok(())
/// # }
/// ```
pub async fn run_bulk_print(
    orders: &[PrintableOrder],
    fetcher: &dyn DocumentFetcher,
    merger: &dyn DocumentMerger,
    config: &PipelineConfig,
    on_progress: impl Fn(&ProgressState) + Sync,
) -> BulkPrintOutcome {
    if orders.is_empty() {
        info!("nothing to print");
        return BulkPrintOutcome::default();
    }

    let shops = engine::partition(orders);
    info!(orders = orders.len(), shops = shops.len(), "starting bulk print");

    let outcomes = engine::process_shops(&shops, fetcher, merger, config, &on_progress).await;
    let mut outcome = output::build_outcome(outcomes);
    outcome.printed = in_submission_order(orders, outcome.printed);

    debug_assert_eq!(
        outcome.report.total(),
        orders.len(),
        "internal logic error: orders lost or duplicated"
    );
    info!(
        success = outcome.report.total_success,
        failed = outcome.report.total_failed,
        documents = outcome.documents.len(),
        "bulk print finished"
    );
    outcome
}

// Carrier groups complete in any order, the input order is the one callers can rely on
fn in_submission_order(orders: &[PrintableOrder], printed: Vec<OrderId>) -> Vec<OrderId> {
    let mut remaining: HashMap<OrderId, usize> = HashMap::new();
    for id in printed {
        *remaining.entry(id).or_default() += 1;
    }

    orders
        .iter()
        .filter_map(|order| {
            let count = remaining.get_mut(order.order_id())?;
            if *count == 0 {
                return None;
            }
            *count -= 1;
            Some(order.order_id().clone())
        })
        .collect()
}

/// The orders whose shipping document can be requested.
pub fn printable(orders: &[PrintableOrder]) -> Vec<PrintableOrder> {
    orders
        .iter()
        .filter(|order| order.is_print_eligible())
        .cloned()
        .collect()
}

/// The printable orders that were not printed before.
pub fn unprinted(orders: &[PrintableOrder]) -> Vec<PrintableOrder> {
    orders
        .iter()
        .filter(|order| order.is_print_eligible() && !order.is_printed())
        .cloned()
        .collect()
}

/// The orders listed as failed in `report`, looked up in the orders of the run that produced it.
pub fn retry_orders(orders: &[PrintableOrder], report: &PrintReport) -> Vec<PrintableOrder> {
    let failed: HashSet<&OrderId> = report
        .failed_orders
        .iter()
        .map(|record| &record.order_id)
        .collect();

    orders
        .iter()
        .filter(|order| failed.contains(order.order_id()))
        .cloned()
        .collect()
}

/// Flags the orders printed by a run. Returns how many orders were flagged.
pub fn mark_printed(orders: &mut [PrintableOrder], outcome: &BulkPrintOutcome) -> usize {
    let printed: HashSet<&OrderId> = outcome.printed.iter().collect();

    let mut flagged = 0;
    for order in orders
        .iter_mut()
        .filter(|order| printed.contains(order.order_id()))
    {
        order.mark_printed();
        flagged += 1;
    }
    flagged
}
