//! Module for the types defining the shipping-document printing domain.

mod group;
mod order;

pub use group::{CarrierGroup, ShopGroup};
pub use order::{
    DocumentRequestParams, DocumentType, OrderId, PrintableOrder, ShopId, UNKNOWN_CARRIER,
};
