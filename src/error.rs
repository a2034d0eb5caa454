//! Module defining the errors which are exposed to the users of the crate

use std::time::Duration;

/// Errors surfaced while reading orders. Pipeline failures never show up here: they end up in the
/// failed-order ledger of the [`crate::PrintReport`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Valid CSV describing an order which cannot be printed, e.g., a row without a shop name
    #[error("validation error for order {order_id}: {message}")]
    Validation { order_id: String, message: String },
}

/// Failure of a whole carrier group: every order of the group counts as failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("document request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The document service refused the request
    #[error("document request rejected: {0}")]
    Rejected(String),

    /// The request went through, but not a single document was produced
    #[error("no document could be produced for the group")]
    NoDocuments,
}

/// Failure to combine a shop's documents. Only the availability of the merged document degrades.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("no documents to merge")]
    NothingToMerge,

    #[error("document #{index} is empty")]
    EmptyDocument { index: usize },
}

pub(crate) fn validation_error(order_id: impl Into<String>, message: impl Into<String>) -> Error {
    Error::Validation {
        order_id: order_id.into(),
        message: message.into(),
    }
}
