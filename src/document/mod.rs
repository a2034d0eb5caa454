//! Module defining the external collaborators of the pipeline: the document service and the document merger.

use async_trait::async_trait;

use crate::{
    domain::{DocumentRequestParams, OrderId, ShopId},
    error::{FetchError, MergeError},
};

mod concat;
mod directory;

pub use concat::ConcatMerger;
pub use directory::DirectoryFetcher;

/// The answer of the document service for one carrier group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedDocument {
    /// One document covering every order of the group that did not fail
    pub document: Vec<u8>,
    /// Orders of the group for which no document could be produced
    pub failed_order_ids: Vec<OrderId>,
}

/// Retrieves the shipping documents of one carrier group of one shop.
///
/// Called once per carrier group and run. Returning `Err` fails the whole group.
/// Panics are not isolated: a panicking fetcher aborts the whole run.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(
        &self,
        shop_id: ShopId,
        params: &[DocumentRequestParams],
    ) -> Result<FetchedDocument, FetchError>;
}

/// Combines several documents into one, preserving their order.
#[async_trait]
pub trait DocumentMerger: Send + Sync {
    async fn merge(&self, documents: Vec<Vec<u8>>) -> Result<Vec<u8>, MergeError>;
}
