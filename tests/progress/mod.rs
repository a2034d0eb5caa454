//! Integration tests on the progress reported during a run

use std::sync::Mutex;

use waybill_print_rs::{ConcatMerger, PipelineConfig, ProgressState, run_bulk_print};

use crate::support::{Behaviour, ScriptedFetcher, orders};

#[tokio::test]
async fn progress_counts_every_order_once() {
    let mut input = orders("a", 3, 1, "Alpha", "JNE");
    input.extend(orders("b", 2, 1, "Alpha", "SiCepat"));
    input.extend(orders("c", 4, 2, "Beta", "J&T"));
    input.extend(orders("d", 1, 3, "Gamma", "JNE"));
    input.extend(orders("e", 2, 4, "Delta", "JNE"));
    let fetcher = ScriptedFetcher::default().with(2, "J&T", Behaviour::FailGroup);

    let seen: Mutex<Vec<ProgressState>> = Mutex::new(Vec::new());
    run_bulk_print(
        &input,
        &fetcher,
        &ConcatMerger,
        &PipelineConfig::default(),
        |state| seen.lock().unwrap().push(state.clone()),
    )
    .await;
    let seen = seen.into_inner().unwrap();

    // one notification per carrier group
    assert_eq!(seen.len(), 5);
    assert!(seen.iter().all(|state| state.total == input.len()));
    assert!(
        seen.windows(2)
            .all(|pair| pair[0].processed < pair[1].processed),
        "processed must grow with every group"
    );
    assert_eq!(seen.last().unwrap().processed, input.len());
}

#[tokio::test]
async fn progress_labels_name_the_completed_group() {
    let input = orders("a", 2, 7, "Alpha", "JNE");
    let fetcher = ScriptedFetcher::default();

    let seen: Mutex<Vec<ProgressState>> = Mutex::new(Vec::new());
    run_bulk_print(
        &input,
        &fetcher,
        &ConcatMerger,
        &PipelineConfig::default(),
        |state| seen.lock().unwrap().push(state.clone()),
    )
    .await;

    assert_eq!(
        seen.into_inner().unwrap(),
        vec![ProgressState {
            processed: 2,
            total: 2,
            current_shop: "Alpha".to_string(),
            current_carrier: "JNE".to_string(),
        }]
    );
}
