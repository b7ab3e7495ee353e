//! CSV export of a user's measurement history.
//!
//! Flattens the height and weight time series into a single
//! chronological CSV for external charting or analysis.

use crate::timeseries::MetricsStore;
use crate::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// A row in the exported CSV
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    recorded_at: String,
    metric: String,
    value: i32,
}

/// Export a user's full height and weight history to a CSV file.
///
/// Rows are sorted oldest first. Returns the number of rows written;
/// when the user has no history, nothing is written and 0 is returned.
pub fn export_metrics_csv<M: MetricsStore>(
    store: &M,
    user_id: &str,
    out_path: &Path,
) -> Result<usize> {
    let start = DateTime::<Utc>::MIN_UTC;
    let end = DateTime::<Utc>::MAX_UTC;

    let mut rows: Vec<(DateTime<Utc>, CsvRow)> = Vec::new();
    for record in store.height_history(user_id, start, end)? {
        rows.push((
            record.recorded_at,
            CsvRow {
                recorded_at: record.recorded_at.to_rfc3339(),
                metric: "height_mm".into(),
                value: record.height_mm,
            },
        ));
    }
    for record in store.weight_history(user_id, start, end)? {
        rows.push((
            record.recorded_at,
            CsvRow {
                recorded_at: record.recorded_at.to_rfc3339(),
                metric: "weight_g".into(),
                value: record.weight_g,
            },
        ));
    }

    if rows.is_empty() {
        tracing::info!(user_id, "No measurement history to export");
        return Ok(0);
    }

    rows.sort_by_key(|(recorded_at, _)| *recorded_at);

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(out_path)?;
    let count = rows.len();
    for (_, row) in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!(user_id, count, "Exported measurement history to CSV");
    Ok(count)
}
