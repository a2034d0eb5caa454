//! In-memory stand-ins for the document service and merger, scripted per carrier group.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use waybill_print_rs::{
    DocumentFetcher, DocumentMerger, DocumentRequestParams, FetchError, FetchedDocument,
    MergeError, OrderId, PrintableOrder, ShopId,
};

/// How the scripted service answers for one (shop, carrier) group.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Documents for every order
    Succeed,
    /// Documents for every order except the listed ones
    FailOrders(Vec<String>),
    /// The whole request errors
    FailGroup,
    /// The request never answers
    Hang,
}

/// Serves `[<order id>]` as the document of each order.
#[derive(Default)]
pub struct ScriptedFetcher {
    script: HashMap<(ShopId, String), Behaviour>,
    calls: Mutex<Vec<(ShopId, String, Vec<OrderId>)>>,
}

impl ScriptedFetcher {
    pub fn with(mut self, shop: u64, carrier: &str, behaviour: Behaviour) -> Self {
        self.script
            .insert((ShopId::new(shop), carrier.to_string()), behaviour);
        self
    }

    /// Every request received so far: shop, carrier, requested order ids.
    pub fn calls(&self) -> Vec<(ShopId, String, Vec<OrderId>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        shop_id: ShopId,
        params: &[DocumentRequestParams],
    ) -> Result<FetchedDocument, FetchError> {
        let carrier = params[0].carrier.clone();
        self.calls.lock().unwrap().push((
            shop_id,
            carrier.clone(),
            params.iter().map(|p| p.order_id.clone()).collect(),
        ));
        tokio::task::yield_now().await;

        let behaviour = self
            .script
            .get(&(shop_id, carrier))
            .cloned()
            .unwrap_or(Behaviour::Succeed);

        let failed: Vec<String> = match behaviour {
            Behaviour::Succeed => Vec::new(),
            Behaviour::FailOrders(ids) => ids,
            Behaviour::FailGroup => {
                return Err(FetchError::Rejected("scripted failure".to_string()));
            }
            Behaviour::Hang => std::future::pending().await,
        };

        let mut fetched = FetchedDocument::default();
        for param in params {
            if failed.iter().any(|id| id == param.order_id.as_str()) {
                fetched.failed_order_ids.push(param.order_id.clone());
            } else {
                fetched
                    .document
                    .extend_from_slice(format!("[{}]", param.order_id).as_bytes());
            }
        }
        Ok(fetched)
    }
}

/// Merger that always fails.
pub struct BrokenMerger;

#[async_trait]
impl DocumentMerger for BrokenMerger {
    async fn merge(&self, _documents: Vec<Vec<u8>>) -> Result<Vec<u8>, MergeError> {
        Err(MergeError::NothingToMerge)
    }
}

/// Helper: an order of shop `shop` (named after the shop id) with the given carrier.
pub fn order(id: &str, shop: u64, shop_name: &str, carrier: &str) -> PrintableOrder {
    PrintableOrder::new(OrderId::new(id), ShopId::new(shop), shop_name)
        .with_carrier(carrier)
        .with_tracking_number(format!("TRK-{id}"))
}

/// Helper: `count` orders `<prefix>_1..=count` of one shop and carrier.
pub fn orders(
    prefix: &str,
    count: usize,
    shop: u64,
    shop_name: &str,
    carrier: &str,
) -> Vec<PrintableOrder> {
    (1..=count)
        .map(|i| order(&format!("{prefix}_{i}"), shop, shop_name, carrier))
        .collect()
}
