use async_trait::async_trait;

use crate::{document::DocumentMerger, error::MergeError};

/// Merges documents by appending their bytes in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatMerger;

#[async_trait]
impl DocumentMerger for ConcatMerger {
    async fn merge(&self, documents: Vec<Vec<u8>>) -> Result<Vec<u8>, MergeError> {
        if documents.is_empty() {
            return Err(MergeError::NothingToMerge);
        }
        if let Some(index) = documents.iter().position(Vec::is_empty) {
            return Err(MergeError::EmptyDocument { index });
        }

        Ok(documents.concat())
    }
}
