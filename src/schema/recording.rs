//! corpus.recording.v1 schema definition
//!
//! A per-subject recording file holds the per-sample condition label series
//! and one block per device, each mapping channel names to raw sample arrays
//! at that device's native rate. Wrist channels may each run at their own
//! rate; chest channels and the label series share one rate, so their sample
//! counts must match.

use crate::error::CorpusError;
use crate::types::{ChannelKind, DeviceLocation};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current schema version
pub const SCHEMA_VERSION: &str = "corpus.recording.v1";

/// One channel's raw samples: a 1-D series or a row-major 2-D array
/// (e.g. three-axis acceleration).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelData {
    Series(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl ChannelData {
    /// Number of time steps in this channel
    pub fn rows(&self) -> usize {
        match self {
            ChannelData::Series(v) => v.len(),
            ChannelData::Matrix(m) => m.len(),
        }
    }

    /// Number of components per time step (1 for a 1-D series)
    pub fn width(&self) -> usize {
        match self {
            ChannelData::Series(_) => 1,
            ChannelData::Matrix(m) => m.first().map_or(0, |row| row.len()),
        }
    }

    /// Reshape to a [rows × width] matrix; a 1-D series becomes one column.
    pub fn to_matrix(&self) -> Result<Array2<f64>, CorpusError> {
        match self {
            ChannelData::Series(v) => {
                Array2::from_shape_vec((v.len(), 1), v.clone()).map_err(|e| {
                    CorpusError::MalformedRecord(format!("channel reshape failed: {e}"))
                })
            }
            ChannelData::Matrix(m) => {
                let rows = m.len();
                let width = self.width();
                if width == 0 {
                    return Err(CorpusError::MalformedRecord(
                        "2-D channel has zero-width rows".to_string(),
                    ));
                }
                let mut flat = Vec::with_capacity(rows * width);
                for (i, row) in m.iter().enumerate() {
                    if row.len() != width {
                        return Err(CorpusError::MalformedRecord(format!(
                            "2-D channel is ragged: row {i} has {} values, expected {width}",
                            row.len()
                        )));
                    }
                    flat.extend_from_slice(row);
                }
                Array2::from_shape_vec((rows, width), flat).map_err(|e| {
                    CorpusError::MalformedRecord(format!("channel reshape failed: {e}"))
                })
            }
        }
    }
}

/// All channels recorded by one device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Channel name (e.g. "EDA") → raw sample array at the device's rate
    pub channels: BTreeMap<String, ChannelData>,
}

impl DeviceRecord {
    pub fn channel(&self, kind: ChannelKind) -> Option<&ChannelData> {
        self.channels.get(kind.as_str())
    }
}

/// A per-subject recording file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingFile {
    /// Must equal [`SCHEMA_VERSION`]
    pub schema_version: String,
    /// Subject identifier (matches the subject directory name)
    pub subject_id: String,
    /// Chest device channels, absent if the subject wore no chest device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest: Option<DeviceRecord>,
    /// Wrist device channels, absent if the subject wore no wrist device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrist: Option<DeviceRecord>,
    /// Per-sample condition labels at the chest device's rate.
    /// 0 marks samples outside any defined condition.
    pub labels: Vec<i32>,
}

impl RecordingFile {
    /// Load and parse a recording from disk
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::MissingFile(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a recording from a JSON string
    pub fn from_json(raw: &str) -> Result<Self, CorpusError> {
        let record: RecordingFile = serde_json::from_str(raw)?;
        Ok(record)
    }

    pub fn device(&self, location: DeviceLocation) -> Option<&DeviceRecord> {
        match location {
            DeviceLocation::Chest => self.chest.as_ref(),
            DeviceLocation::Wrist => self.wrist.as_ref(),
        }
    }

    /// Check the structural invariants of the record.
    ///
    /// - schema version matches
    /// - at least one device block is present
    /// - every channel name is known and its array is rectangular
    /// - every chest channel has exactly one sample per label
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(CorpusError::MalformedRecord(format!(
                "unsupported schema version '{}', expected '{}'",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        if self.subject_id.is_empty() {
            return Err(CorpusError::MalformedRecord(
                "empty subject_id".to_string(),
            ));
        }
        if self.chest.is_none() && self.wrist.is_none() {
            return Err(CorpusError::MalformedRecord(
                "recording has no device blocks".to_string(),
            ));
        }
        if self.labels.is_empty() {
            return Err(CorpusError::MalformedRecord(
                "recording has no label series".to_string(),
            ));
        }
        if let Some(&bad) = self.labels.iter().find(|&&l| l < 0) {
            return Err(CorpusError::MalformedRecord(format!(
                "negative condition label {bad}"
            )));
        }

        for location in [DeviceLocation::Chest, DeviceLocation::Wrist] {
            let Some(device) = self.device(location) else {
                continue;
            };
            for (name, data) in &device.channels {
                if ChannelKind::from_name(name).is_none() {
                    return Err(CorpusError::MalformedRecord(format!(
                        "unknown channel '{name}' on {} device",
                        location.as_str()
                    )));
                }
                // Rectangularity check; the matrix itself is discarded here.
                data.to_matrix()?;
                if location == DeviceLocation::Chest && data.rows() != self.labels.len() {
                    return Err(CorpusError::DimensionMismatch(format!(
                        "chest channel '{name}' has {} samples but the label series has {}",
                        data.rows(),
                        self.labels.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
