//! Core types for the Synheart Corpus pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: loaded recordings, labeled windows, and the assembled dataset.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-sample label marking "no defined condition" (transition periods).
/// Windows containing this value are rejected whole.
pub const SENTINEL_LABEL: i32 = 0;

/// Physical device location on the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceLocation {
    Chest,
    Wrist,
}

impl DeviceLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceLocation::Chest => "chest",
            DeviceLocation::Wrist => "wrist",
        }
    }
}

/// Which devices contribute columns to the signal matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSelection {
    Chest,
    Wrist,
    Both,
}

impl DeviceSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceSelection::Chest => "chest",
            DeviceSelection::Wrist => "wrist",
            DeviceSelection::Both => "both",
        }
    }

    /// Whether this selection includes the given device location
    pub fn includes(&self, location: DeviceLocation) -> bool {
        match self {
            DeviceSelection::Chest => location == DeviceLocation::Chest,
            DeviceSelection::Wrist => location == DeviceLocation::Wrist,
            DeviceSelection::Both => true,
        }
    }
}

/// Logical physiological channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelKind {
    /// Electrodermal activity
    Eda,
    /// Skin temperature
    Temp,
    /// Respiration (chest only)
    Resp,
    /// Electrocardiogram (chest only)
    Ecg,
    /// Three-axis acceleration
    Acc,
    /// Electromyogram (chest only)
    Emg,
    /// Blood volume pulse (wrist only)
    Bvp,
}

impl ChannelKind {
    /// All logical channels, in canonical order
    pub const ALL: [ChannelKind; 7] = [
        ChannelKind::Eda,
        ChannelKind::Temp,
        ChannelKind::Resp,
        ChannelKind::Ecg,
        ChannelKind::Acc,
        ChannelKind::Emg,
        ChannelKind::Bvp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Eda => "EDA",
            ChannelKind::Temp => "TEMP",
            ChannelKind::Resp => "RESP",
            ChannelKind::Ecg => "ECG",
            ChannelKind::Acc => "ACC",
            ChannelKind::Emg => "EMG",
            ChannelKind::Bvp => "BVP",
        }
    }

    /// Fixed channel-availability table.
    ///
    /// | channel | chest | wrist |
    /// |---------|-------|-------|
    /// | EDA     | yes   | yes   |
    /// | TEMP    | yes   | yes   |
    /// | RESP    | yes   | no    |
    /// | ECG     | yes   | no    |
    /// | ACC     | yes   | yes   |
    /// | EMG     | yes   | no    |
    /// | BVP     | no    | yes   |
    pub const fn available_on(self, location: DeviceLocation) -> bool {
        match (self, location) {
            (ChannelKind::Eda, _) => true,
            (ChannelKind::Temp, _) => true,
            (ChannelKind::Acc, _) => true,
            (ChannelKind::Resp, DeviceLocation::Chest) => true,
            (ChannelKind::Ecg, DeviceLocation::Chest) => true,
            (ChannelKind::Emg, DeviceLocation::Chest) => true,
            (ChannelKind::Bvp, DeviceLocation::Wrist) => true,
            _ => false,
        }
    }

    /// Parse a channel name as it appears in recording files (e.g. "EDA")
    pub fn from_name(name: &str) -> Option<ChannelKind> {
        ChannelKind::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

/// Provenance of one column in the signal matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Logical channel this column belongs to
    pub channel: ChannelKind,
    /// Device the source array came from
    pub device: DeviceLocation,
    /// Component index within the source array (0 for 1-D sources)
    pub component: usize,
}

/// A recording after channel resolution and resampling.
///
/// `matrix` is [rows × columns]: rows are uniform time steps at the target
/// rate, columns are the resolved channel sources in request order. `labels`
/// has exactly one entry per row.
#[derive(Debug, Clone)]
pub struct LoadedRecording {
    pub subject_id: String,
    pub matrix: Array2<f64>,
    pub labels: Vec<i32>,
    pub columns: Vec<ColumnInfo>,
    pub target_rate_hz: f64,
}

impl LoadedRecording {
    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.matrix.ncols()
    }
}

/// A fixed-length window with its majority-vote condition label
#[derive(Debug, Clone)]
pub struct LabeledWindow {
    /// [window_samples × columns] slice of the signal matrix
    pub data: Array2<f64>,
    /// Majority label over the window's per-sample labels, never the sentinel
    pub label: i32,
    /// Row offset of this window's first sample in the source matrix
    pub start: usize,
}

/// Windows, labels, and regression targets for one subject
#[derive(Debug, Clone)]
pub struct SubjectExamples {
    pub subject_id: String,
    pub windows: Vec<Array2<f64>>,
    pub labels: Vec<i32>,
    /// Per-window self-report vector, rescaled to [0, 1]
    pub targets: Vec<Vec<f64>>,
}

impl SubjectExamples {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Why a subject directory was excluded from the assembled dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    MissingRecording(PathBuf),
    MissingQuestionnaire(PathBuf),
    LoadFailed(String),
}

/// The final dataset: four aligned arrays, one entry per window.
///
/// Invariant: `windows`, `labels`, `targets`, and `subjects` always have the
/// same length.
#[derive(Debug, Clone, Default)]
pub struct AssembledDataset {
    pub windows: Vec<Array2<f64>>,
    pub labels: Vec<i32>,
    pub targets: Vec<Vec<f64>>,
    /// Per-window subject id, broadcast from the window's source subject
    pub subjects: Vec<String>,
}

impl AssembledDataset {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Append one subject's examples, broadcasting its id across its windows
    pub fn extend_from_subject(&mut self, examples: SubjectExamples) {
        let n = examples.len();
        self.windows.extend(examples.windows);
        self.labels.extend(examples.labels);
        self.targets.extend(examples.targets);
        self.subjects
            .extend(std::iter::repeat(examples.subject_id).take(n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_table() {
        use ChannelKind::*;
        use DeviceLocation::*;

        assert!(Eda.available_on(Chest));
        assert!(Eda.available_on(Wrist));
        assert!(Temp.available_on(Chest));
        assert!(Temp.available_on(Wrist));
        assert!(Acc.available_on(Chest));
        assert!(Acc.available_on(Wrist));

        assert!(Resp.available_on(Chest));
        assert!(!Resp.available_on(Wrist));
        assert!(Ecg.available_on(Chest));
        assert!(!Ecg.available_on(Wrist));
        assert!(Emg.available_on(Chest));
        assert!(!Emg.available_on(Wrist));

        assert!(!Bvp.available_on(Chest));
        assert!(Bvp.available_on(Wrist));
    }

    #[test]
    fn test_channel_from_name() {
        assert_eq!(ChannelKind::from_name("EDA"), Some(ChannelKind::Eda));
        assert_eq!(ChannelKind::from_name("bvp"), Some(ChannelKind::Bvp));
        assert_eq!(ChannelKind::from_name("HRV"), None);
    }

    #[test]
    fn test_device_selection_includes() {
        assert!(DeviceSelection::Both.includes(DeviceLocation::Chest));
        assert!(DeviceSelection::Both.includes(DeviceLocation::Wrist));
        assert!(DeviceSelection::Chest.includes(DeviceLocation::Chest));
        assert!(!DeviceSelection::Chest.includes(DeviceLocation::Wrist));
        assert!(!DeviceSelection::Wrist.includes(DeviceLocation::Chest));
    }

    #[test]
    fn test_dataset_extend_broadcasts_subject() {
        let mut dataset = AssembledDataset::default();
        let examples = SubjectExamples {
            subject_id: "S2".to_string(),
            windows: vec![Array2::zeros((4, 2)), Array2::zeros((4, 2))],
            labels: vec![1, 2],
            targets: vec![vec![0.2; 3], vec![0.4; 3]],
        };

        dataset.extend_from_subject(examples);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.subjects, vec!["S2".to_string(), "S2".to_string()]);
        assert_eq!(dataset.labels, vec![1, 2]);
    }
}
