//! The raw-data browser
//!
//! One upstream pipeline at a time: the view shows exactly the columns that
//! pipeline populates, 100 rows per page, with an optional state narrowing
//! and a debounced filter box per column. This is also where export lives,
//! since analysts pull per-pipeline extracts from here.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fa_core::{columns, ColumnFilter, FilterState, SortDirection};
use fa_data::{OrderBy, Predicate, QueryBuilder, QueryExecutor, FIRMS_TABLE};
use fa_export::{ExportError, ExportFormat, ExportOptions, ExportPhase, Exporter};
use tracing::warn;

use crate::browser::{BrowserSnapshot, RecordBrowser};
use crate::debounce::Debouncer;

pub const RAW_PAGE_SIZE: usize = 100;

const FILTER_DEBOUNCE: Duration = Duration::from_millis(400);

pub struct SourceBrowser {
    executor: QueryExecutor,
    source: &'static columns::SourceSpec,
    browser: Arc<RecordBrowser>,
    filter_debounce: Debouncer,
    exporter: Exporter,
}

impl SourceBrowser {
    /// Open on the first registered pipeline
    pub fn new(executor: QueryExecutor) -> Self {
        let source = &columns::SOURCES[0];
        let browser = Arc::new(Self::browser_for(&executor, source));
        let exporter = Exporter::new(executor.clone());
        Self {
            executor,
            source,
            browser,
            filter_debounce: Debouncer::new(FILTER_DEBOUNCE),
            exporter,
        }
    }

    fn browser_for(executor: &QueryExecutor, source: &columns::SourceSpec) -> RecordBrowser {
        let builder = QueryBuilder::new(FIRMS_TABLE, source.columns, RAW_PAGE_SIZE)
            .with_preset(Predicate::Contains {
                column: "sources".into(),
                needle: source.key.into(),
            })
            .with_default_order(OrderBy {
                column: "acquisition_score".into(),
                direction: SortDirection::Descending,
            });
        RecordBrowser::new(executor.clone(), builder)
    }

    pub fn source(&self) -> &'static columns::SourceSpec {
        self.source
    }

    pub fn snapshot(&self) -> BrowserSnapshot {
        self.browser.snapshot()
    }

    pub fn filters(&self) -> FilterState {
        self.browser.filters()
    }

    pub fn page_size(&self) -> usize {
        RAW_PAGE_SIZE
    }

    pub async fn load(&self) {
        self.browser.refresh().await;
    }

    /// Switch pipelines. Columns, the membership constraint, filters and the
    /// page all start over; filter input still pending for the old pipeline
    /// is dropped.
    pub async fn switch_source(&mut self, key: &str) -> Result<(), String> {
        let source = columns::source(key).ok_or_else(|| format!("Unknown source '{}'", key))?;
        self.source = source;
        self.browser = Arc::new(Self::browser_for(&self.executor, source));
        self.filter_debounce = Debouncer::new(FILTER_DEBOUNCE);
        self.browser.refresh().await;
        Ok(())
    }

    /// Narrow to one state, or `None` for all states
    pub async fn set_state(&self, state: Option<&str>) {
        let state = state.map(str::to_string);
        self.browser
            .apply(|f| {
                for current in f.states().to_vec() {
                    f.toggle_state(&current);
                }
                if let Some(state) = state {
                    f.toggle_state(&state);
                }
            })
            .await;
    }

    /// Debounced per-column filter input. Columns in the floor list treat
    /// numeric input as a lower bound; everything else is a substring match.
    /// An emptied box clears the filter.
    pub fn set_column_filter(&self, column: &str, input: &str) {
        let browser = self.browser.clone();
        let filter = parse_filter(column, input);
        let owned = column.to_string();
        self.filter_debounce.submit(column, async move {
            browser
                .apply(|f| match filter {
                    Some(filter) => f.set_column_filter(&owned, filter),
                    None => f.clear_column_filter(&owned),
                })
                .await;
        });
    }

    pub async fn set_sort(&self, column: &str, direction: SortDirection) -> Result<(), String> {
        self.browser.try_apply(|f| f.set_sort(column, direction)).await
    }

    pub async fn go_to_page(&self, page: i64) {
        self.browser.go_to_page(page).await;
    }

    pub fn export_phase(&self) -> ExportPhase {
        self.exporter.phase()
    }

    /// Export the current result set (all pages, capped) into `dir`. The
    /// file is named after the pipeline and, when one is set, the state
    /// narrowing, e.g. `firmscope_google_maps_FL.csv`. CSV extracts carry
    /// the on-screen column subset; the spreadsheet variant carries every
    /// registered column.
    pub async fn export(
        &self,
        format: ExportFormat,
        dir: &Path,
        progress: impl FnMut(usize),
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.export_file_name(format));
        let mut spec = self.browser.unpaged_spec();
        let export_columns: Vec<&str> = match format {
            ExportFormat::Csv => self.source.columns.to_vec(),
            ExportFormat::Xlsx => {
                spec.columns.clear();
                columns::FIRM_COLUMNS.iter().map(|c| c.name).collect()
            }
        };
        let options =
            ExportOptions::new(format, &export_columns, path).with_sheet_name(self.source.key);
        self.exporter.run(&spec, &options, progress).await
    }

    fn export_file_name(&self, format: ExportFormat) -> String {
        let filters = self.browser.filters();
        match filters.states().first() {
            Some(state) => {
                format!("firmscope_{}_{}.{}", self.source.key, state, format.extension())
            }
            None => format!("firmscope_{}.{}", self.source.key, format.extension()),
        }
    }
}

fn parse_filter(column: &str, input: &str) -> Option<ColumnFilter> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if columns::FLOOR_FILTER_COLUMNS.contains(&column) {
        match input.parse::<f64>() {
            Ok(threshold) => return Some(ColumnFilter::Floor(threshold)),
            Err(_) => {
                warn!(column, input, "ignoring non-numeric floor filter input");
                return None;
            }
        }
    }
    Some(ColumnFilter::Text(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::{Row, Value};
    use fa_data::MemoryStore;

    fn firm(name: &str, state: &str, sources: &str, revenue: Option<f64>) -> Row {
        let mut row = Row::new();
        row.insert("firm_name".into(), name.into());
        row.insert("city".into(), "Atlanta".into());
        row.insert("state".into(), state.into());
        row.insert("sources".into(), sources.into());
        row.insert("acquisition_score".into(), Value::Number(50.0));
        row.insert(
            "annual_revenue".into(),
            revenue.map(Value::Number).unwrap_or(Value::Null),
        );
        row
    }

    fn browser() -> SourceBrowser {
        SourceBrowser::new(QueryExecutor::new(Arc::new(MemoryStore::new(
            FIRMS_TABLE,
            vec![
                firm("Alpha Tax Group", "FL", "cpadirectory, google_maps", None),
                firm("Bayside CPA", "FL", "cpadirectory", None),
                firm(
                    "Crestview Advisors",
                    "GA",
                    "google_maps, accounting_practice_exchange",
                    Some(400_000.0),
                ),
                firm("Delta Accounting", "GA", "accounting_practice_exchange", Some(900_000.0)),
            ],
        ))))
    }

    #[tokio::test]
    async fn only_rows_from_the_active_pipeline_appear() {
        let b = browser();
        assert_eq!(b.source().key, "cpadirectory");
        b.load().await;
        assert_eq!(b.snapshot().total, 2);
    }

    #[tokio::test]
    async fn switching_sources_swaps_columns_and_resets_filters() {
        let mut b = browser();
        b.load().await;
        b.set_state(Some("FL")).await;
        assert_eq!(b.snapshot().total, 2);

        b.switch_source("google_maps").await.unwrap();
        let snap = b.snapshot();
        assert_eq!(snap.total, 2, "state narrowing must not carry over");
        let keys: Vec<_> = snap.rows[0].keys().cloned().collect();
        assert_eq!(keys, columns::source("google_maps").unwrap().columns);

        assert!(b.switch_source("not_a_source").await.is_err());
    }

    #[tokio::test]
    async fn state_narrowing_is_single_select() {
        let b = browser();
        b.load().await;
        b.set_state(Some("FL")).await;
        b.set_state(Some("GA")).await;
        assert_eq!(b.filters().states(), ["GA"]);
        assert_eq!(b.snapshot().total, 0, "no cpadirectory firm is in GA");

        b.set_state(None).await;
        assert_eq!(b.snapshot().total, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn column_filter_input_is_debounced_and_typed() {
        let mut b = browser();
        b.switch_source("accounting_practice_exchange").await.unwrap();

        assert_eq!(b.snapshot().total, 2);

        b.set_column_filter("annual_revenue", "500000");
        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(b.snapshot().total, 1, "the floor excludes Crestview at 400k");
        assert_eq!(
            b.filters().column_filters()["annual_revenue"],
            ColumnFilter::Floor(500_000.0)
        );

        // emptying the box clears the filter
        b.set_column_filter("annual_revenue", "");
        tokio::time::sleep(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(b.snapshot().total, 2);
        assert!(b.filters().column_filters().is_empty());
    }

    #[test]
    fn non_numeric_input_on_a_floor_column_is_ignored() {
        assert_eq!(parse_filter("annual_revenue", "cheap"), None);
        assert_eq!(parse_filter("firm_name", "smith"), Some(ColumnFilter::Text("smith".into())));
        assert_eq!(parse_filter("google_rating", " 4.5 "), Some(ColumnFilter::Floor(4.5)));
    }

    #[tokio::test]
    async fn export_writes_a_named_extract() {
        let b = browser();
        b.load().await;
        b.set_state(Some("FL")).await;

        let dir = tempfile::tempdir().unwrap();
        let path = b.export(ExportFormat::Csv, dir.path(), |_| {}).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "firmscope_cpadirectory_FL.csv");

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3, "header plus both FL firms");
        assert!(text.lines().next().unwrap().contains("Firm Name"));
        assert_eq!(b.export_phase(), ExportPhase::Idle);
    }

    #[tokio::test]
    async fn spreadsheet_extracts_carry_every_registered_column() {
        let b = browser();
        b.load().await;

        let dir = tempfile::tempdir().unwrap();
        let path = b.export(ExportFormat::Xlsx, dir.path(), |_| {}).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "firmscope_cpadirectory.xlsx");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
