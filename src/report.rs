use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::error::EpigridError;
use crate::statistics::StatisticsDelta;

/// One row of the daily report: the change in each count over one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReportRow {
    pub day: u64,
    pub infections: i64,
    pub deaths: i64,
    pub removed: i64,
}

impl DailyReportRow {
    #[must_use]
    pub fn new(day: u64, delta: &StatisticsDelta) -> Self {
        DailyReportRow {
            day,
            infections: delta.infections,
            deaths: delta.deaths,
            removed: delta.removed,
        }
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful.
fn generate_validate_filepath(path: &Path) -> Result<File, EpigridError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(EpigridError::InvalidParameter(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// Writes a day-indexed table of statistic deltas.
pub struct DailyReport {
    writer: Writer<File>,
}

impl DailyReport {
    /// Creates the report file at `path`, which must have a `.csv` extension.
    ///
    /// # Errors
    ///
    /// Returns an `EpigridError` if the path is not a CSV path or the file cannot be created.
    pub fn create(path: &Path) -> Result<DailyReport, EpigridError> {
        let file = generate_validate_filepath(path)?;
        Ok(DailyReport {
            writer: Writer::from_writer(file),
        })
    }

    /// Appends one row and flushes it to disk.
    ///
    /// # Errors
    ///
    /// Returns an `EpigridError` if the row cannot be serialized or written.
    pub fn send(&mut self, row: &DailyReportRow) -> Result<(), EpigridError> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}
