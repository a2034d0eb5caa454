//! Module turning the per-shop outcomes of a run into the report handed back to the caller.

use std::fmt;

use serde::Serialize;

use crate::{
    domain::{OrderId, ShopId},
    engine::ShopOutcome,
};


/// Shown instead of a tracking number the order does not have yet.
pub const TRACKING_PLACEHOLDER: &str = "-";

/// One order whose document could not be produced, with enough context to display and retry it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FailedOrderRecord {
    #[serde(rename = "order_sn")]
    pub order_id: OrderId,
    pub shop_name: String,
    pub carrier: String,
    pub tracking_number: String,
}

impl FailedOrderRecord {
    pub(crate) fn new(
        order_id: OrderId,
        shop_name: &str,
        carrier: &str,
        tracking_number: Option<&str>,
    ) -> Self {
        Self {
            order_id,
            shop_name: shop_name.to_string(),
            carrier: carrier.to_string(),
            tracking_number: tracking_number
                .filter(|tracking| !tracking.is_empty())
                .unwrap_or(TRACKING_PLACEHOLDER)
                .to_string(),
        }
    }
}

/// Tally of one shop.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShopReport {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub success: usize,
    pub failed: usize,
    /// Whether the shop's merged document could be produced
    pub document_available: bool,
}

/// Summary of one run. `total_success + total_failed` equals the number of submitted orders.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintReport {
    pub total_success: usize,
    pub total_failed: usize,
    pub shop_reports: Vec<ShopReport>,
    pub failed_orders: Vec<FailedOrderRecord>,
}

impl PrintReport {
    pub fn total(&self) -> usize {
        self.total_success + self.total_failed
    }

    pub fn has_failures(&self) -> bool {
        self.total_failed > 0
    }
}

impl fmt::Display for PrintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "printed {} of {} orders ({} failed)",
            self.total_success,
            self.total(),
            self.total_failed
        )?;
        for shop in &self.shop_reports {
            write!(
                f,
                "\n  {}: {} printed, {} failed",
                shop.shop_name, shop.success, shop.failed
            )?;
            if !shop.document_available && shop.success > 0 {
                f.write_str(" (document unavailable)")?;
            }
        }
        Ok(())
    }
}

/// The merged document of one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDocument {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub bytes: Vec<u8>,
}

impl ShopDocument {
    /// File name for saving the document, e.g. `Toko_Alpha_17_shipping_labels.pdf`.
    ///
    /// Carries the shop id since several shops may share a display name.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .shop_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("{stem}_{}_shipping_labels.pdf", self.shop_id)
    }
}

/// Merged documents of a run, in shop submission order, keyed by shop name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShopDocuments(Vec<ShopDocument>);

impl ShopDocuments {
    /// The document of the first shop carrying that name.
    pub fn get(&self, shop_name: &str) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|doc| doc.shop_name == shop_name)
            .map(|doc| doc.bytes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShopDocument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops the document of a shop once the caller is done with it.
    pub fn discard(&mut self, shop_name: &str) -> Option<ShopDocument> {
        let position = self.0.iter().position(|doc| doc.shop_name == shop_name)?;
        Some(self.0.remove(position))
    }
}

impl IntoIterator for ShopDocuments {
    type Item = ShopDocument;
    type IntoIter = std::vec::IntoIter<ShopDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Everything a run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkPrintOutcome {
    pub report: PrintReport,
    pub documents: ShopDocuments,
    /// Orders whose document was produced, in submission order
    pub printed: Vec<OrderId>,
}

pub(crate) fn build_outcome(outcomes: Vec<ShopOutcome>) -> BulkPrintOutcome {
    let mut result = BulkPrintOutcome::default();

    for outcome in outcomes {
        let ShopOutcome {
            shop_id,
            shop_name,
            success,
            failed,
            printed,
            failed_records,
            document,
        } = outcome;

        result.report.total_success += success;
        result.report.total_failed += failed;
        result.report.shop_reports.push(ShopReport {
            shop_id,
            shop_name: shop_name.clone(),
            success,
            failed,
            document_available: document.is_some(),
        });
        result.report.failed_orders.extend(failed_records);
        result.printed.extend(printed);

        if let Some(bytes) = document {
            result.documents.0.push(ShopDocument {
                shop_id,
                shop_name,
                bytes,
            });
        }
    }

    result
}
