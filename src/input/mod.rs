//! Module defining the parsing logic used to convert the user-provided order export into validated orders that can be provided to the pipeline.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::domain::{OrderId, PrintableOrder, ShopId};
use crate::error::{Error, validation_error};


/// Parses the data provided by the reader and returns an iterator over the parsing results
pub(crate) fn parse_orders(
    reader: impl Read,
) -> impl Iterator<Item = Result<PrintableOrder, Error>> {
    let csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    csv_reader.into_deserialize::<RawOrder>().map(|result| {
        let raw = result?;
        PrintableOrder::try_from(raw)
    })
}

// Intermediate type mirroring the CSV columns
#[derive(Deserialize)]
struct RawOrder {
    order_sn: String,
    shop_id: u64,
    shop_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    shipping_carrier: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    package_number: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    tracking_number: Option<String>,
    order_status: String,
    document_status: String,
    #[serde(default, deserialize_with = "flag")]
    is_printed: bool,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid is_printed flag: {other}"
        ))),
    }
}

impl TryFrom<RawOrder> for PrintableOrder {
    type Error = crate::error::Error;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        let RawOrder {
            order_sn,
            shop_id,
            shop_name,
            shipping_carrier,
            package_number,
            tracking_number,
            order_status,
            document_status,
            is_printed,
        } = raw;

        if order_sn.is_empty() {
            return Err(validation_error("<empty>", "order without order_sn"));
        }
        if shop_name.is_empty() {
            return Err(validation_error(order_sn, "order without shop_name"));
        }

        let mut order = PrintableOrder::new(OrderId::new(order_sn), ShopId::new(shop_id), shop_name)
            .with_status(order_status, document_status)
            .with_printed(is_printed);
        if let Some(carrier) = shipping_carrier {
            order = order.with_carrier(carrier);
        }
        if let Some(package_number) = package_number {
            order = order.with_package_number(package_number);
        }
        if let Some(tracking_number) = tracking_number {
            order = order.with_tracking_number(tracking_number);
        }
        Ok(order)
    }
}
