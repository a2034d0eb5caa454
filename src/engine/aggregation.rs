//! Module folding the per-carrier fetch results of one shop into the shop's outcome.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    document::DocumentMerger,
    domain::{CarrierGroup, OrderId, ShopGroup, ShopId},
    error::FetchError,
    output::FailedOrderRecord,
};

/// Outcome of fetching the documents of one carrier group.
#[derive(Debug)]
pub(crate) enum CarrierFetchResult {
    /// The service answered with a document for every order not listed in `failed`
    Fetched {
        document: Vec<u8>,
        failed: Vec<OrderId>,
    },
    /// The whole group failed
    Failed(FetchError),
}

/// Running state of one shop. Owned by the task processing that shop and nobody else.
#[derive(Debug)]
pub(crate) struct ShopAccumulator {
    shop_id: ShopId,
    shop_name: String,
    success: usize,
    failed: usize,
    printed: Vec<OrderId>,
    failed_records: Vec<FailedOrderRecord>,
    pending_documents: Vec<Vec<u8>>,
    remaining_groups: usize,
}

/// Final state of one shop after all its carrier groups reported and its documents were merged.
#[derive(Debug)]
pub(crate) struct ShopOutcome {
    pub(crate) shop_id: ShopId,
    pub(crate) shop_name: String,
    pub(crate) success: usize,
    pub(crate) failed: usize,
    pub(crate) printed: Vec<OrderId>,
    pub(crate) failed_records: Vec<FailedOrderRecord>,
    pub(crate) document: Option<Vec<u8>>,
}

impl ShopAccumulator {
    pub(crate) fn new(shop: &ShopGroup) -> Self {
        Self {
            shop_id: shop.shop_id(),
            shop_name: shop.shop_name().to_string(),
            success: 0,
            failed: 0,
            printed: Vec::new(),
            failed_records: Vec::new(),
            pending_documents: Vec::new(),
            remaining_groups: shop.carrier_groups().len(),
        }
    }

    pub(crate) fn shop_name(&self) -> &str {
        &self.shop_name
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining_groups == 0
    }

    /// Folds the result of one carrier group of this shop. Must be called exactly once per group.
    pub(crate) fn fold(&mut self, group: &CarrierGroup, result: CarrierFetchResult) {
        debug_assert_eq!(group.shop_id(), self.shop_id, "result folded into foreign shop");
        debug_assert!(self.remaining_groups > 0, "more results than carrier groups");
        self.remaining_groups = self.remaining_groups.saturating_sub(1);

        match result {
            CarrierFetchResult::Fetched { document, failed } => {
                let failed: HashSet<&OrderId> = failed.iter().collect();
                let unknown = failed.iter().filter(|id| !group.contains(**id)).count();
                if unknown > 0 {
                    warn!(
                        shop = %self.shop_name,
                        carrier = group.carrier(),
                        unknown,
                        "document service reported failures for orders outside the group"
                    );
                }

                for order in group.orders() {
                    if failed.contains(order.order_id()) {
                        self.record_failure(group, order.order_id(), order.tracking_number());
                    } else {
                        self.success += 1;
                        self.printed.push(order.order_id().clone());
                    }
                }

                if !document.is_empty() {
                    self.pending_documents.push(document);
                }
            }
            CarrierFetchResult::Failed(err) => {
                debug!(
                    shop = %self.shop_name,
                    carrier = group.carrier(),
                    orders = group.len(),
                    "failing whole carrier group: {err}"
                );
                for order in group.orders() {
                    self.record_failure(group, order.order_id(), order.tracking_number());
                }
            }
        }
    }

    fn record_failure(&mut self, group: &CarrierGroup, order_id: &OrderId, tracking: Option<&str>) {
        self.failed += 1;
        self.failed_records.push(FailedOrderRecord::new(
            order_id.clone(),
            &self.shop_name,
            group.carrier(),
            tracking,
        ));
    }

    /// Merges the collected documents into the shop's single document.
    ///
    /// A failed merge leaves the shop without a document but keeps the tallies as they are.
    pub(crate) async fn finish(self, merger: &dyn DocumentMerger) -> ShopOutcome {
        debug_assert!(self.is_complete(), "shop finished before all groups reported");

        let document = if self.pending_documents.is_empty() {
            None
        } else {
            let parts = self.pending_documents.len();
            match merger.merge(self.pending_documents).await {
                Ok(merged) => {
                    debug!(
                        shop = %self.shop_name,
                        parts,
                        bytes = merged.len(),
                        "merged shop documents"
                    );
                    Some(merged)
                }
                Err(err) => {
                    warn!(shop = %self.shop_name, parts, "could not merge shop documents: {err}");
                    None
                }
            }
        };

        ShopOutcome {
            shop_id: self.shop_id,
            shop_name: self.shop_name,
            success: self.success,
            failed: self.failed,
            printed: self.printed,
            failed_records: self.failed_records,
            document,
        }
    }
}
