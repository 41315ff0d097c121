//! Signal loading
//!
//! Resolves requested logical channels against a recording's device blocks,
//! resamples every resolved source to the common target row count, and
//! assembles the [rows × columns] signal matrix together with the resampled,
//! integer-rounded label series.

use crate::config::PipelineConfig;
use crate::error::CorpusError;
use crate::resample::{resample_labels, resample_to, target_rows};
use crate::schema::RecordingFile;
use crate::types::{ColumnInfo, DeviceLocation, LoadedRecording};
use ndarray::Array2;

/// Loader turning a raw recording into an aligned signal matrix
pub struct SignalLoader;

impl SignalLoader {
    /// Load, resolve, and resample a recording.
    ///
    /// Columns appear in channel request order; a channel requested on both
    /// devices contributes its chest columns before its wrist columns. A
    /// channel/device pairing that is unavailable (per the availability
    /// table) or absent from the record contributes nothing. If no pairing
    /// contributes a column the configuration is unusable and an error is
    /// returned.
    pub fn load(
        record: &RecordingFile,
        config: &PipelineConfig,
    ) -> Result<LoadedRecording, CorpusError> {
        config.validate()?;
        record.validate()?;

        let rows = target_rows(
            record.labels.len(),
            config.chest_rate_hz,
            config.target_rate_hz,
        );
        if rows == 0 {
            return Err(CorpusError::ResampleError(format!(
                "recording of {} samples collapses to zero rows at {} Hz",
                record.labels.len(),
                config.target_rate_hz
            )));
        }

        let mut resampled_columns: Vec<Vec<f64>> = Vec::new();
        let mut columns: Vec<ColumnInfo> = Vec::new();

        for &channel in &config.channels {
            for location in [DeviceLocation::Chest, DeviceLocation::Wrist] {
                if !config.devices.includes(location) || !channel.available_on(location) {
                    continue;
                }
                let Some(device) = record.device(location) else {
                    continue;
                };
                let Some(data) = device.channel(channel) else {
                    // Absent source: skipped, never zero-filled.
                    continue;
                };
                let source = data.to_matrix()?;
                for (component, column) in source.columns().into_iter().enumerate() {
                    let values = column.to_vec();
                    resampled_columns.push(resample_to(&values, rows)?);
                    columns.push(ColumnInfo {
                        channel,
                        device: location,
                        component,
                    });
                }
            }
        }

        if columns.is_empty() {
            return Err(CorpusError::NoUsableChannels(format!(
                "recording '{}' has no sources for the requested channels on '{}'",
                record.subject_id,
                config.devices.as_str()
            )));
        }

        let mut matrix = Array2::zeros((rows, columns.len()));
        for (c, values) in resampled_columns.iter().enumerate() {
            for (r, &v) in values.iter().enumerate() {
                matrix[[r, c]] = v;
            }
        }

        let labels = resample_labels(&record.labels, rows)?;

        Ok(LoadedRecording {
            subject_id: record.subject_id.clone(),
            matrix,
            labels,
            columns,
            target_rate_hz: config.target_rate_hz,
        })
    }
}
