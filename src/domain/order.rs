//! Module defining the domain types related to the representation of a single order eligible for printing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Carrier label used for orders without a shipping carrier.
pub const UNKNOWN_CARRIER: &str = "unknown";

const READY_DOCUMENT_STATUS: &str = "READY";
const PRINTABLE_ORDER_STATUSES: [&str; 2] = ["PROCESSED", "IN_CANCEL"];

/// Marketplace identifier of an order (the order serial number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of the seller account ("shop") owning an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(u64);

impl ShopId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<ShopId> for u64 {
    fn from(value: ShopId) -> Self {
        value.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of shipping document requested from the document service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentType {
    #[default]
    ThermalAirWaybill,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::ThermalAirWaybill => "THERMAL_AIR_WAYBILL",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One order as seen by the printing pipeline.
///
/// The pipeline never mutates an order; the only mutable bit is the in-memory printed flag,
/// which the caller flips after a run via [`crate::mark_printed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableOrder {
    order_id: OrderId,
    shop_id: ShopId,
    shop_name: String,
    carrier: Option<String>,
    package_number: Option<String>,
    tracking_number: Option<String>,
    order_status: String,
    document_status: String,
    printed: bool,
}

impl PrintableOrder {
    /// Creates an unprinted order whose document is ready and whose status allows printing.
    pub fn new(order_id: OrderId, shop_id: ShopId, shop_name: impl Into<String>) -> Self {
        Self {
            order_id,
            shop_id,
            shop_name: shop_name.into(),
            carrier: None,
            package_number: None,
            tracking_number: None,
            order_status: PRINTABLE_ORDER_STATUSES[0].to_string(),
            document_status: READY_DOCUMENT_STATUS.to_string(),
            printed: false,
        }
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into());
        self
    }

    pub fn with_package_number(mut self, package_number: impl Into<String>) -> Self {
        self.package_number = Some(package_number.into());
        self
    }

    pub fn with_tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    pub fn with_status(
        mut self,
        order_status: impl Into<String>,
        document_status: impl Into<String>,
    ) -> Self {
        self.order_status = order_status.into();
        self.document_status = document_status.into();
        self
    }

    pub fn with_printed(mut self, printed: bool) -> Self {
        self.printed = printed;
        self
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }

    /// The carrier used for grouping; absent or empty carriers collapse into [`UNKNOWN_CARRIER`].
    pub fn carrier(&self) -> &str {
        match self.carrier.as_deref() {
            Some(carrier) if !carrier.is_empty() => carrier,
            _ => UNKNOWN_CARRIER,
        }
    }

    pub fn package_number(&self) -> Option<&str> {
        self.package_number.as_deref()
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn is_printed(&self) -> bool {
        self.printed
    }

    /// An order can be printed once its document is `READY` and it is `PROCESSED` or `IN_CANCEL`.
    pub fn is_print_eligible(&self) -> bool {
        self.document_status == READY_DOCUMENT_STATUS
            && PRINTABLE_ORDER_STATUSES.contains(&self.order_status.as_str())
    }

    pub(crate) fn mark_printed(&mut self) {
        self.printed = true;
    }

    pub(crate) fn to_request_params(&self) -> DocumentRequestParams {
        DocumentRequestParams {
            order_id: self.order_id.clone(),
            package_number: self.package_number.clone(),
            document_type: DocumentType::ThermalAirWaybill,
            carrier: self.carrier().to_string(),
        }
    }
}

/// Parameters for requesting the shipping document of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequestParams {
    pub order_id: OrderId,
    pub package_number: Option<String>,
    pub document_type: DocumentType,
    pub carrier: String,
}
