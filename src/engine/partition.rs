//! Module grouping the submitted orders by shop and carrier.

use std::collections::HashMap;

use crate::domain::{PrintableOrder, ShopGroup, ShopId};

/// Splits the orders into shop groups, each split into carrier groups.
///
/// Shops are keyed by id (never by name) and kept in order of first appearance, as are the
/// carriers within a shop. Every order ends up in exactly one carrier group.
pub fn partition(orders: &[PrintableOrder]) -> Vec<ShopGroup> {
    let mut shops: Vec<ShopGroup> = Vec::new();
    let mut index: HashMap<ShopId, usize> = HashMap::new();

    for order in orders {
        let position = *index.entry(order.shop_id()).or_insert_with(|| {
            shops.push(ShopGroup::new(order.shop_id(), order.shop_name()));
            shops.len() - 1
        });
        shops[position].push(order.clone());
    }

    shops
}
