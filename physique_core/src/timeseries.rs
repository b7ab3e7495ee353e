//! Metrics time-series store: append-only historical measurements.
//!
//! Every record is immutable once written. Each metric gets its own
//! JSONL file, appended under an exclusive lock and scanned under a
//! shared one. History is reconstructed by filtering per user and
//! sorting by recorded-at; nothing is ever updated or deleted.

use crate::{Error, HeartRateZones, HeartRateZonesRecord, HeightRecord, Result, WeightRecord};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl HeightRecord {
    /// Create a height record stamped with the current time
    pub fn new(user_id: impl Into<String>, height_mm: i32) -> Result<Self> {
        if height_mm <= 0 {
            return Err(Error::InvalidArgument(format!(
                "height must be greater than zero, got {}",
                height_mm
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            recorded_at: Utc::now(),
            height_mm,
        })
    }
}

impl WeightRecord {
    /// Create a weight record stamped with the current time
    pub fn new(user_id: impl Into<String>, weight_g: i32) -> Result<Self> {
        if weight_g <= 0 {
            return Err(Error::InvalidArgument(format!(
                "weight must be greater than zero, got {}",
                weight_g
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            recorded_at: Utc::now(),
            weight_g,
        })
    }
}

impl HeartRateZonesRecord {
    /// Snapshot a calculated zone table, stamped with the current time
    pub fn new(user_id: impl Into<String>, zones: HeartRateZones) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            recorded_at: Utc::now(),
            zones,
        }
    }
}

/// Common shape of the three record types, for generic queries
trait Recorded {
    fn user_id(&self) -> &str;
    fn recorded_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_recorded {
    ($($ty:ty),*) => {$(
        impl Recorded for $ty {
            fn user_id(&self) -> &str {
                &self.user_id
            }
            fn recorded_at(&self) -> DateTime<Utc> {
                self.recorded_at
            }
        }
    )*};
}

impl_recorded!(HeightRecord, WeightRecord, HeartRateZonesRecord);

/// Storage seam for metric time series
pub trait MetricsStore {
    fn add_heart_rate_zones(
        &self,
        user_id: &str,
        zones: &HeartRateZones,
    ) -> Result<HeartRateZonesRecord>;
    fn add_weight(&self, user_id: &str, weight_g: i32) -> Result<WeightRecord>;
    fn add_height(&self, user_id: &str, height_mm: i32) -> Result<HeightRecord>;

    fn latest_heart_rate_zones(&self, user_id: &str) -> Result<Option<HeartRateZonesRecord>>;
    fn latest_weight(&self, user_id: &str) -> Result<Option<WeightRecord>>;
    fn latest_height(&self, user_id: &str) -> Result<Option<HeightRecord>>;

    /// History queries return ascending recorded-at order, bounds inclusive
    fn heart_rate_zones_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeartRateZonesRecord>>;
    fn weight_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeightRecord>>;
    fn height_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeightRecord>>;
}

const HEIGHTS_FILE: &str = "heights.jsonl";
const WEIGHTS_FILE: &str = "weights.jsonl";
const ZONES_FILE: &str = "zones.jsonl";

/// JSONL-backed metrics store, one append-only file per metric
pub struct JsonlMetricsStore {
    dir: PathBuf,
}

impl JsonlMetricsStore {
    /// Create a store rooted at the given metrics directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Append one record as a JSON line under an exclusive lock
    fn append<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;
        Ok(())
    }

    /// Read every record in a file, skipping malformed lines with a warning
    fn read_all<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();
        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed record at {:?}:{}: {}",
                        path,
                        line_num + 1,
                        e
                    );
                }
            }
        }

        file.unlock()?;
        Ok(records)
    }

    fn latest_of<T: DeserializeOwned + Recorded>(
        &self,
        name: &str,
        user_id: &str,
    ) -> Result<Option<T>> {
        let records: Vec<T> = self.read_all(&self.file(name))?;
        Ok(records
            .into_iter()
            .filter(|r| r.user_id() == user_id)
            .max_by_key(|r| r.recorded_at()))
    }

    fn history_of<T: DeserializeOwned + Recorded>(
        &self,
        name: &str,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>> {
        let records: Vec<T> = self.read_all(&self.file(name))?;
        let mut matching: Vec<T> = records
            .into_iter()
            .filter(|r| {
                r.user_id() == user_id && r.recorded_at() >= start && r.recorded_at() <= end
            })
            .collect();
        matching.sort_by_key(|r| r.recorded_at());
        Ok(matching)
    }
}

impl MetricsStore for JsonlMetricsStore {
    fn add_heart_rate_zones(
        &self,
        user_id: &str,
        zones: &HeartRateZones,
    ) -> Result<HeartRateZonesRecord> {
        let record = HeartRateZonesRecord::new(user_id, zones.clone());
        self.append(&self.file(ZONES_FILE), &record)?;
        tracing::debug!(user_id, "Appended heart rate zones snapshot");
        Ok(record)
    }

    fn add_weight(&self, user_id: &str, weight_g: i32) -> Result<WeightRecord> {
        let record = WeightRecord::new(user_id, weight_g)?;
        self.append(&self.file(WEIGHTS_FILE), &record)?;
        tracing::debug!(user_id, weight_g, "Appended weight snapshot");
        Ok(record)
    }

    fn add_height(&self, user_id: &str, height_mm: i32) -> Result<HeightRecord> {
        let record = HeightRecord::new(user_id, height_mm)?;
        self.append(&self.file(HEIGHTS_FILE), &record)?;
        tracing::debug!(user_id, height_mm, "Appended height snapshot");
        Ok(record)
    }

    fn latest_heart_rate_zones(&self, user_id: &str) -> Result<Option<HeartRateZonesRecord>> {
        self.latest_of(ZONES_FILE, user_id)
    }

    fn latest_weight(&self, user_id: &str) -> Result<Option<WeightRecord>> {
        self.latest_of(WEIGHTS_FILE, user_id)
    }

    fn latest_height(&self, user_id: &str) -> Result<Option<HeightRecord>> {
        self.latest_of(HEIGHTS_FILE, user_id)
    }

    fn heart_rate_zones_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeartRateZonesRecord>> {
        self.history_of(ZONES_FILE, user_id, start, end)
    }

    fn weight_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeightRecord>> {
        self.history_of(WEIGHTS_FILE, user_id, start, end)
    }

    fn height_history(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HeightRecord>> {
        self.history_of(HEIGHTS_FILE, user_id, start, end)
    }
}
