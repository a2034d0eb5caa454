//! Module defining the two-level grouping of orders: by shop, then by carrier within a shop

use crate::domain::{DocumentRequestParams, OrderId, PrintableOrder, ShopId};

/// All orders of one shop, split by carrier in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopGroup {
    shop_id: ShopId,
    shop_name: String,
    carrier_groups: Vec<CarrierGroup>,
}

impl ShopGroup {
    pub(crate) fn new(shop_id: ShopId, shop_name: impl Into<String>) -> Self {
        Self {
            shop_id,
            shop_name: shop_name.into(),
            carrier_groups: Vec::new(),
        }
    }

    /// Adds the order to the carrier group matching its carrier, opening a new group if needed.
    pub(crate) fn push(&mut self, order: PrintableOrder) {
        debug_assert_eq!(order.shop_id(), self.shop_id, "order pushed into foreign shop");

        match self
            .carrier_groups
            .iter_mut()
            .find(|group| group.carrier() == order.carrier())
        {
            Some(group) => group.orders.push(order),
            None => {
                let mut group = CarrierGroup::new(self.shop_id, order.carrier());
                group.orders.push(order);
                self.carrier_groups.push(group);
            }
        }
    }

    pub fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }

    pub fn carrier_groups(&self) -> &[CarrierGroup] {
        &self.carrier_groups
    }

    /// Iterates the shop's orders carrier group by carrier group.
    pub fn orders(&self) -> impl Iterator<Item = &PrintableOrder> {
        self.carrier_groups.iter().flat_map(|group| group.orders())
    }

    pub fn order_count(&self) -> usize {
        self.carrier_groups.iter().map(CarrierGroup::len).sum()
    }
}

/// The orders of one shop sharing a carrier. This is the unit sent to the document service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierGroup {
    shop_id: ShopId,
    carrier: String,
    orders: Vec<PrintableOrder>,
}

impl CarrierGroup {
    fn new(shop_id: ShopId, carrier: impl Into<String>) -> Self {
        Self {
            shop_id,
            carrier: carrier.into(),
            orders: Vec::new(),
        }
    }

    pub fn shop_id(&self) -> ShopId {
        self.shop_id
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn orders(&self) -> &[PrintableOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.iter().any(|order| order.order_id() == order_id)
    }

    pub(crate) fn request_params(&self) -> Vec<DocumentRequestParams> {
        self.orders
            .iter()
            .map(PrintableOrder::to_request_params)
            .collect()
    }
}
