//! firmscope: headless smoke run over the firm analytics platform
//!
//! Connects to the hosted store when `FIRMSCOPE_URL` and `FIRMSCOPE_API_KEY`
//! are set, otherwise browses a seeded demo dataset. Loads the dashboard,
//! walks the explorer through a filter change and a page step, and writes a
//! per-source CSV extract.

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use fa_core::{RangeFilter, Value};
use fa_data::{init_store, QueryExecutor, RestStore, StoreConfig};
use fa_export::ExportFormat;
use fa_views::{DashboardView, FirmExplorer, SourceBrowser};

mod demo;

const DEMO_ROWS: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match (env::var("FIRMSCOPE_URL"), env::var("FIRMSCOPE_API_KEY")) {
        (Ok(url), Ok(api_key)) => {
            info!(%url, "connecting to hosted store");
            let store = RestStore::new(&StoreConfig { url, api_key })?;
            init_store(Arc::new(store))?;
        }
        _ => {
            warn!("FIRMSCOPE_URL / FIRMSCOPE_API_KEY not set, browsing demo data");
            init_store(Arc::new(demo::demo_store(DEMO_ROWS)))?;
        }
    }
    let executor = QueryExecutor::from_global()?;

    show_dashboard(&executor).await?;
    browse(&executor).await?;
    export_extract(executor).await?;

    Ok(())
}

async fn show_dashboard(executor: &QueryExecutor) -> Result<()> {
    let dashboard = DashboardView::new(executor.clone());
    dashboard.load().await;
    let snap = dashboard.snapshot();
    if let Some(e) = snap.error {
        bail!("dashboard load failed: {e}");
    }

    let stats = snap.stats.context("dashboard stats missing after load")?;
    info!(
        total = stats.total,
        for_sale = stats.for_sale,
        high_wealth = stats.high_wealth,
        avg_score = stats.avg_score.map(|s| (s * 10.0).round() / 10.0),
        "dashboard"
    );
    for state in stats.by_state.iter().take(5) {
        info!(state = %state.name, count = state.count, "state breakdown");
    }

    let completeness = snap.completeness.context("completeness report missing after load")?;
    for field in completeness.fields.iter().filter(|f| f.pct < 50) {
        debug!(field = %field.field, pct = field.pct, "sparse field");
    }
    Ok(())
}

async fn browse(executor: &QueryExecutor) -> Result<()> {
    let explorer = FirmExplorer::new(executor.clone());
    explorer.load().await;
    let snap = explorer.snapshot();
    if let Some(e) = snap.error {
        bail!("initial query failed: {e}");
    }
    info!(total = snap.total, pages = snap.total_pages(explorer.page_size()), "explorer loaded");
    print_page(&snap.rows[..snap.rows.len().min(5)]);

    // a typical drill-down: top-tier firms scoring 70 or better
    explorer.toggle_tier("A").await;
    explorer.set_score_range(RangeFilter { min: Some(70.0), max: None }).await;
    let filtered = explorer.snapshot();
    info!(total = filtered.total, "tier A, score >= 70");
    print_page(&filtered.rows[..filtered.rows.len().min(5)]);

    explorer.go_to_page(1).await;
    let paged = explorer.snapshot();
    info!(page = paged.page, rows = paged.rows.len(), "page step");
    Ok(())
}

async fn export_extract(executor: QueryExecutor) -> Result<()> {
    let browser = SourceBrowser::new(executor);
    browser.load().await;

    let dir = env::temp_dir();
    let path = browser
        .export(ExportFormat::Csv, &dir, |fetched| debug!(rows = fetched, "export progress"))
        .await
        .context("export failed")?;
    info!(source = browser.source().key, path = %path.display(), "extract written");
    Ok(())
}

fn print_page(rows: &[fa_core::Row]) {
    for row in rows {
        info!(
            firm = %cell(row, "firm_name"),
            city = %cell(row, "city"),
            state = %cell(row, "state"),
            score = %cell(row, "acquisition_score"),
            tier = %cell(row, "acquisition_tier"),
            "row"
        );
    }
}

fn cell(row: &fa_core::Row, column: &str) -> String {
    row.get(column).map(Value::cell_text).unwrap_or_default()
}
