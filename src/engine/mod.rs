//! Module for the core logic of the printing pipeline

mod aggregation;
mod orchestration;
mod partition;
mod progress;

pub(crate) use aggregation::ShopOutcome;
pub use partition::partition;
pub use progress::ProgressState;

use aggregation::{CarrierFetchResult, ShopAccumulator};
use orchestration::{Orchestrator, ResultSink};
use progress::ProgressTracker;
use tracing::info;

use crate::{
    config::PipelineConfig,
    document::{DocumentFetcher, DocumentMerger},
    domain::{CarrierGroup, ShopGroup},
};

/// Fetches the documents of every shop group and folds them into one outcome per shop, in shop order.
pub(crate) async fn process_shops(
    shops: &[ShopGroup],
    fetcher: &dyn DocumentFetcher,
    merger: &dyn DocumentMerger,
    config: &PipelineConfig,
    on_progress: &(dyn Fn(&ProgressState) + Sync),
) -> Vec<ShopOutcome> {
    let total = shops.iter().map(ShopGroup::order_count).sum();
    let progress = ProgressTracker::new(total, on_progress);

    let outcomes = Orchestrator::new(fetcher, config)
        .run(shops, |shop| ShopSink {
            accumulator: ShopAccumulator::new(shop),
            merger,
            progress: &progress,
        })
        .await;

    let state = progress.snapshot();
    info!(processed = state.processed, total = state.total, "all shops drained");
    outcomes
}

/// Sink folding one shop's results and counting them as processed.
struct ShopSink<'a> {
    accumulator: ShopAccumulator,
    merger: &'a dyn DocumentMerger,
    progress: &'a ProgressTracker<'a>,
}

impl ResultSink for ShopSink<'_> {
    type Output = ShopOutcome;

    fn accept(&mut self, group: &CarrierGroup, result: CarrierFetchResult) {
        self.accumulator.fold(group, result);
        self.progress
            .advance(group.len(), self.accumulator.shop_name(), group.carrier());
    }

    async fn finish(self) -> ShopOutcome {
        let outcome = self.accumulator.finish(self.merger).await;
        info!(
            shop = %outcome.shop_name,
            success = outcome.success,
            failed = outcome.failed,
            document = outcome.document.is_some(),
            "shop done"
        );
        outcome
    }
}
