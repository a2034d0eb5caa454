use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    document::{DocumentFetcher, FetchedDocument},
    domain::{DocumentRequestParams, OrderId, ShopId},
    error::FetchError,
};

const DOCUMENT_EXTENSION: &str = "pdf";

/// Serves pre-rendered documents from a directory holding one `<order id>.pdf` file per order.
///
/// Orders without a readable, non-empty file are reported as failed. A group for which no file
/// could be read fails as a whole.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, order_id: &OrderId) -> Option<PathBuf> {
        let id = order_id.as_str();
        // ids name files directly under root, nothing else
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return None;
        }
        Some(self.root.join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }
}

#[async_trait]
impl DocumentFetcher for DirectoryFetcher {
    async fn fetch(
        &self,
        shop_id: ShopId,
        params: &[DocumentRequestParams],
    ) -> Result<FetchedDocument, FetchError> {
        let mut fetched = FetchedDocument::default();
        let mut found = 0usize;

        for param in params {
            let Some(path) = self.document_path(&param.order_id) else {
                fetched.failed_order_ids.push(param.order_id.clone());
                continue;
            };

            match tokio::fs::read(&path).await {
                Ok(bytes) if !bytes.is_empty() => {
                    fetched.document.extend_from_slice(&bytes);
                    found += 1;
                }
                Ok(_) => {
                    debug!(%shop_id, order = %param.order_id, "empty document file");
                    fetched.failed_order_ids.push(param.order_id.clone());
                }
                Err(err) => {
                    debug!(
                        %shop_id,
                        order = %param.order_id,
                        path = %path.display(),
                        "unreadable document: {err}"
                    );
                    fetched.failed_order_ids.push(param.order_id.clone());
                }
            }
        }

        if found == 0 {
            return Err(FetchError::NoDocuments);
        }
        Ok(fetched)
    }
}
