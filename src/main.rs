use anyhow::{Context, Result};
use std::{env, fs::File, path::PathBuf};
use waybill_print_rs::{
    ConcatMerger, DirectoryFetcher, Error, PipelineConfig, ProgressState, printable, read_orders,
    run_bulk_print, setup_logging, unprinted,
};

const USAGE: &str = "Usage: waybill-print-rs <orders.csv> <documents-dir> <output-dir>";
const UNPRINTED_ONLY_VAR: &str = "PRINT_UNPRINTED_ONLY";

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let args = Args::from_env()?;
    let reader = File::open(&args.orders)
        .with_context(|| format!("cannot open {}", args.orders.display()))?;
    let orders: Vec<_> = read_orders(reader, handle_row_error).collect();

    let selected = if unprinted_only() {
        unprinted(&orders)
    } else {
        printable(&orders)
    };
    tracing::info!(read = orders.len(), selected = selected.len(), "orders loaded");

    let config = PipelineConfig::from_env();
    let fetcher = DirectoryFetcher::new(&args.documents);
    let outcome =
        run_bulk_print(&selected, &fetcher, &ConcatMerger, &config, report_progress).await;

    tokio::fs::create_dir_all(&args.output).await?;
    for document in outcome.documents.iter() {
        let path = args.output.join(document.file_name());
        tokio::fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!(shop = %document.shop_name, path = %path.display(), "document written");
    }
    tracing::info!("{}", outcome.report);

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for record in &outcome.report.failed_orders {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

struct Args {
    orders: PathBuf,
    documents: PathBuf,
    output: PathBuf,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = env::args_os().skip(1).map(PathBuf::from);
        let mut next = || args.next().ok_or_else(|| anyhow::anyhow!(USAGE));
        Ok(Self {
            orders: next()?,
            documents: next()?,
            output: next()?,
        })
    }
}

fn unprinted_only() -> bool {
    env::var(UNPRINTED_ONLY_VAR).is_ok_and(|value| matches!(value.as_str(), "1" | "true"))
}

fn report_progress(progress: &ProgressState) {
    tracing::debug!(
        processed = progress.processed,
        total = progress.total,
        shop = %progress.current_shop,
        carrier = %progress.current_carrier,
        "progress"
    );
}

// Just logs skipped rows here, the rest of the export is still printed
fn handle_row_error(error: Error) {
    tracing::warn!("{error}")
}
