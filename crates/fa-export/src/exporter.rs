//! The export driver
//!
//! One long-lived async task per run: `Idle → Fetching(1) → Fetching(2) → …
//! → Serializing → Idle`, or `Fetching(n) → Failed → Idle` when a batch
//! fetch fails. Rows already fetched are discarded on failure and no file is
//! produced. Only one run per exporter may be in flight; a second start is
//! rejected rather than run concurrently.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use fa_data::{QueryExecutor, QuerySpec};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::options::{ExportFormat, ExportOptions};
use crate::{sheet, writer, ExportError};

/// Where an export run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Fetching { batch: usize },
    Serializing,
    Failed,
}

/// Drives batched fetches and serialization for one view
pub struct Exporter {
    executor: QueryExecutor,
    phase: RwLock<ExportPhase>,
    in_flight: AtomicBool,
}

impl Exporter {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor, phase: RwLock::new(ExportPhase::Idle), in_flight: AtomicBool::new(false) }
    }

    pub fn phase(&self) -> ExportPhase {
        *self.phase.read()
    }

    /// Export every row matching `spec`'s predicates (its range, if any, is
    /// ignored) to `options.path`. `progress` receives the number of rows
    /// fetched so far after each batch, so callers can show a live counter
    /// during runs that take seconds to minutes.
    pub async fn run(
        &self,
        spec: &QuerySpec,
        options: &ExportOptions,
        mut progress: impl FnMut(usize),
    ) -> Result<PathBuf, ExportError> {
        if self.in_flight.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err()
        {
            return Err(ExportError::InProgress);
        }
        let _guard = FlightGuard(self);

        let mut unpaged = spec.clone();
        unpaged.range = None;

        *self.phase.write() = ExportPhase::Fetching { batch: 1 };
        let mut batches_done = 0usize;
        let rows = match self
            .executor
            .fetch_all(&unpaged, options.batch_size, options.row_cap, |fetched| {
                batches_done += 1;
                *self.phase.write() = ExportPhase::Fetching { batch: batches_done + 1 };
                progress(fetched);
            })
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                *self.phase.write() = ExportPhase::Failed;
                warn!(batch = batches_done + 1, error = %e, "export aborted, discarding partial rows");
                return Err(e.into());
            }
        };

        *self.phase.write() = ExportPhase::Serializing;
        let options = options.clone();
        let path = options.path.clone();
        let row_count = rows.len();
        tokio::task::spawn_blocking(move || serialize(&options, &rows))
            .await
            .map_err(|e| ExportError::Io(std::io::Error::other(e.to_string())))??;

        info!(rows = row_count, path = %path.display(), "export complete");
        Ok(path)
    }
}

/// Serialize fully in memory first so a failure can never leave a truncated
/// file on disk.
fn serialize(options: &ExportOptions, rows: &[fa_core::Row]) -> Result<(), ExportError> {
    match options.format {
        ExportFormat::Csv => {
            let mut out = Vec::new();
            writer::write_csv(&options.columns, rows, &mut out)?;
            std::fs::write(&options.path, out)?;
        }
        ExportFormat::Xlsx => {
            sheet::write_xlsx(&options.columns, rows, options.clipped_sheet_name(), &options.path)?;
        }
    }
    Ok(())
}

struct FlightGuard<'a>(&'a Exporter);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *self.0.phase.write() = ExportPhase::Idle;
        self.0.in_flight.store(false, Ordering::SeqCst);
    }
}
