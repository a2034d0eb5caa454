//! Module focusing on the way the document requests are scheduled against the document service
//!
//! Shops are processed in chunks of `shop_concurrency`; inside a shop, carrier groups are processed
//! in chunks of `carrier_concurrency`. Each chunk runs its members concurrently and fully drains
//! before the next chunk starts: a shop finishing early does not pull work from the next chunk.
//! Everything runs as cooperative futures on the calling task, nothing is spawned.

use futures::{StreamExt, future::join_all, stream::FuturesUnordered};
use tracing::{debug, warn};

use crate::{
    config::PipelineConfig,
    document::DocumentFetcher,
    domain::{CarrierGroup, ShopGroup},
    engine::aggregation::CarrierFetchResult,
    error::FetchError,
};

/// Receives the results of one shop's carrier groups, each exactly once, as soon as it is
/// available, then produces the shop's output once all groups reported.
pub(crate) trait ResultSink {
    type Output;

    fn accept(&mut self, group: &CarrierGroup, result: CarrierFetchResult);

    async fn finish(self) -> Self::Output;
}

pub(crate) struct Orchestrator<'a> {
    fetcher: &'a dyn DocumentFetcher,
    config: &'a PipelineConfig,
}

impl<'a> Orchestrator<'a> {
    pub(crate) fn new(fetcher: &'a dyn DocumentFetcher, config: &'a PipelineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs every carrier group of every shop and returns the sink outputs in shop order.
    ///
    /// `make_sink` is called once per shop, right before the shop starts.
    pub(crate) async fn run<S: ResultSink>(
        &self,
        shops: &[ShopGroup],
        mut make_sink: impl FnMut(&ShopGroup) -> S,
    ) -> Vec<S::Output> {
        let mut outputs = Vec::with_capacity(shops.len());

        for (chunk_idx, chunk) in shops.chunks(self.config.shop_concurrency.get()).enumerate() {
            debug!(chunk = chunk_idx, shops = chunk.len(), "starting shop chunk");
            let runs = chunk
                .iter()
                .map(|shop| self.run_shop(shop, make_sink(shop)))
                .collect::<Vec<_>>();
            outputs.extend(join_all(runs).await);
        }

        outputs
    }

    async fn run_shop<S: ResultSink>(&self, shop: &ShopGroup, mut sink: S) -> S::Output {
        debug!(
            shop = shop.shop_name(),
            orders = shop.order_count(),
            carriers = shop.carrier_groups().len(),
            "processing shop"
        );

        for chunk in shop
            .carrier_groups()
            .chunks(self.config.carrier_concurrency.get())
        {
            let mut in_flight: FuturesUnordered<_> = chunk
                .iter()
                .map(|group| async move { (group, self.fetch_group(shop, group).await) })
                .collect();

            // results are handed over as they complete, the chunk ends when all of them did
            while let Some((group, result)) = in_flight.next().await {
                sink.accept(group, result);
            }
        }

        sink.finish().await
    }

    async fn fetch_group(&self, shop: &ShopGroup, group: &CarrierGroup) -> CarrierFetchResult {
        let params = group.request_params();
        let timeout = self.config.fetch_timeout;
        debug!(
            shop = shop.shop_name(),
            carrier = group.carrier(),
            orders = params.len(),
            "requesting documents"
        );

        let outcome = tokio::time::timeout(timeout, self.fetcher.fetch(shop.shop_id(), &params))
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout { after: timeout }));

        match outcome {
            Ok(fetched) => CarrierFetchResult::Fetched {
                document: fetched.document,
                failed: fetched.failed_order_ids,
            },
            Err(err) => {
                warn!(
                    shop = shop.shop_name(),
                    carrier = group.carrier(),
                    orders = group.len(),
                    "document request failed: {err}"
                );
                CarrierFetchResult::Failed(err)
            }
        }
    }
}
