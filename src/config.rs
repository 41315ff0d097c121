//! Pipeline configuration
//!
//! [`PipelineConfig`] holds every tunable parameter for the dataset pipeline.
//! Defaults match the named constants below; library users can override any
//! field with struct-update syntax.

use crate::error::CorpusError;
use crate::types::{ChannelKind, DeviceSelection};
use serde::{Deserialize, Serialize};

/// Native sample rate of the chest device, and of the label series (Hz)
pub const CHEST_RATE_HZ: f64 = 700.0;

/// Common rate all channels are resampled to (Hz)
pub const TARGET_RATE_HZ: f64 = 4.0;

/// Window length in seconds
pub const WINDOW_SECONDS: f64 = 60.0;

/// Stride between consecutive window starts in seconds
pub const STRIDE_SECONDS: f64 = 30.0;

/// Subject directories must start with this prefix
pub const SUBJECT_PREFIX: &str = "S";

/// Configuration for the full dataset pipeline.
///
/// ```
/// use synheart_corpus::config::PipelineConfig;
/// use synheart_corpus::types::DeviceSelection;
///
/// let cfg = PipelineConfig {
///     devices: DeviceSelection::Wrist,
///     window_seconds: 30.0,
///     ..PipelineConfig::default()
/// };
/// assert_eq!(cfg.window_samples(), 120);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Logical channels to extract, in the order their columns appear
    pub channels: Vec<ChannelKind>,
    /// Which devices contribute sources for each channel
    pub devices: DeviceSelection,
    /// Native rate of the chest device and the label series (Hz)
    pub chest_rate_hz: f64,
    /// Common rate every source is resampled to (Hz)
    pub target_rate_hz: f64,
    /// Window length (seconds)
    pub window_seconds: f64,
    /// Stride between window starts (seconds)
    pub stride_seconds: f64,
    /// Affect adjectives whose scores form the regression target vector
    pub target_adjectives: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channels: ChannelKind::ALL.to_vec(),
            devices: DeviceSelection::Both,
            chest_rate_hz: CHEST_RATE_HZ,
            target_rate_hz: TARGET_RATE_HZ,
            window_seconds: WINDOW_SECONDS,
            stride_seconds: STRIDE_SECONDS,
            target_adjectives: default_target_adjectives(),
        }
    }
}

impl PipelineConfig {
    /// Number of samples per window at the target rate
    pub fn window_samples(&self) -> usize {
        (self.window_seconds * self.target_rate_hz) as usize
    }

    /// Number of samples between window starts at the target rate
    pub fn stride_samples(&self) -> usize {
        (self.stride_seconds * self.target_rate_hz) as usize
    }

    /// Check that this configuration can produce at least one signal column.
    ///
    /// Requesting only channels that are unavailable on the selected devices
    /// (e.g. BVP with `DeviceSelection::Chest`) yields an empty matrix and is
    /// rejected here rather than deep inside the loader.
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.channels.is_empty() {
            return Err(CorpusError::NoUsableChannels(
                "no channels requested".to_string(),
            ));
        }
        let usable = self.channels.iter().any(|c| {
            use crate::types::DeviceLocation::*;
            (self.devices.includes(Chest) && c.available_on(Chest))
                || (self.devices.includes(Wrist) && c.available_on(Wrist))
        });
        if !usable {
            return Err(CorpusError::NoUsableChannels(format!(
                "none of the requested channels are available on device selection '{}'",
                self.devices.as_str()
            )));
        }
        if self.window_samples() == 0 || self.stride_samples() == 0 {
            return Err(CorpusError::NoUsableChannels(format!(
                "window/stride of {}s/{}s collapse to zero samples at {} Hz",
                self.window_seconds, self.stride_seconds, self.target_rate_hz
            )));
        }
        Ok(())
    }
}

/// Default regression target: the negative-affect adjectives
pub fn default_target_adjectives() -> Vec<String> {
    ["Stressed", "Frustrated", "Nervous", "Jittery", "Afraid"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
