//! Property-based integration tests.
//! Generates random order sets and random service behaviour per carrier group to verify that
//! every submitted order is accounted for exactly once.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use waybill_print_rs::{ConcatMerger, PipelineConfig, PrintableOrder, run_bulk_print};

use crate::support::{Behaviour, ScriptedFetcher, order};

const CARRIERS: [&str; 4] = ["JNE", "SiCepat", "J&T", ""];

fn build_orders(raw: &[(u64, usize)]) -> Vec<PrintableOrder> {
    raw.iter()
        .enumerate()
        .map(|(i, (shop, carrier))| {
            order(
                &format!("o{i}"),
                *shop,
                &format!("shop-{shop}"),
                CARRIERS[*carrier],
            )
        })
        .collect()
}

/// 0 = succeed, 1 = fail the group, 2 = fail every other order of the group.
fn build_fetcher(orders: &[PrintableOrder], behaviours: &[u8]) -> ScriptedFetcher {
    let mut groups: Vec<(u64, String)> = Vec::new();
    let mut members: HashMap<(u64, String), Vec<String>> = HashMap::new();
    for o in orders {
        let key = (u64::from(o.shop_id()), o.carrier().to_string());
        if !members.contains_key(&key) {
            groups.push(key.clone());
        }
        members
            .entry(key)
            .or_default()
            .push(o.order_id().to_string());
    }

    let mut fetcher = ScriptedFetcher::default();
    for (i, key) in groups.iter().enumerate() {
        let behaviour = match behaviours[i % behaviours.len()] % 3 {
            0 => Behaviour::Succeed,
            1 => Behaviour::FailGroup,
            _ => Behaviour::FailOrders(members[key].iter().step_by(2).cloned().collect()),
        };
        fetcher = fetcher.with(key.0, &key.1, behaviour);
    }
    fetcher
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_order_is_accounted_for_exactly_once(
        raw in prop::collection::vec((0u64..7, 0usize..4), 0..80),
        behaviours in prop::collection::vec(any::<u8>(), 1..10),
    ) {
        let orders = build_orders(&raw);
        let fetcher = build_fetcher(&orders, &behaviours);

        let outcome = runtime().block_on(run_bulk_print(
            &orders,
            &fetcher,
            &ConcatMerger,
            &PipelineConfig::default(),
            |_| {},
        ));
        let report = &outcome.report;

        // count conservation
        prop_assert_eq!(report.total_success + report.total_failed, orders.len());
        prop_assert_eq!(report.failed_orders.len(), report.total_failed);
        prop_assert_eq!(outcome.printed.len(), report.total_success);

        // printed and failed orders are disjoint and cover the input
        let printed: HashSet<&str> = outcome.printed.iter().map(|id| id.as_str()).collect();
        let failed: HashSet<&str> =
            report.failed_orders.iter().map(|r| r.order_id.as_str()).collect();
        prop_assert_eq!(printed.len(), outcome.printed.len());
        prop_assert_eq!(failed.len(), report.failed_orders.len());
        prop_assert!(printed.is_disjoint(&failed));
        let all: HashSet<&str> = orders.iter().map(|o| o.order_id().as_str()).collect();
        prop_assert_eq!(printed.union(&failed).copied().collect::<HashSet<_>>(), all);

        // printed ids follow the submission order, whatever order the groups completed in
        let expected_printed: Vec<&str> = orders
            .iter()
            .map(|o| o.order_id().as_str())
            .filter(|id| printed.contains(id))
            .collect();
        let actual_printed: Vec<&str> = outcome.printed.iter().map(|id| id.as_str()).collect();
        prop_assert_eq!(actual_printed, expected_printed);

        // per shop tallies match the shop's share of the input
        let mut shop_sizes: HashMap<u64, usize> = HashMap::new();
        for o in &orders {
            *shop_sizes.entry(o.shop_id().into()).or_default() += 1;
        }
        prop_assert_eq!(report.shop_reports.len(), shop_sizes.len());
        for shop in &report.shop_reports {
            prop_assert_eq!(shop.success + shop.failed, shop_sizes[&u64::from(shop.shop_id)]);
            prop_assert_eq!(shop.document_available, shop.success > 0);
        }

        // one request per carrier group
        let calls = fetcher.calls();
        let distinct: HashSet<(u64, String)> = calls
            .iter()
            .map(|(shop, carrier, _)| (u64::from(*shop), carrier.clone()))
            .collect();
        prop_assert_eq!(distinct.len(), calls.len());
    }
}
