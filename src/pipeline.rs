//! Pipeline orchestration
//!
//! Single-subject processing, staged as an ordered transform:
//! signal loading → per-column standardization → windowing/labeling →
//! self-report join. Directory-level assembly across subjects lives in
//! [`crate::assembler`].

use crate::config::PipelineConfig;
use crate::error::CorpusError;
use crate::loader::SignalLoader;
use crate::normalizer::Normalizer;
use crate::questionnaire::{PanasResponse, ParsedQuestionnaire, PANAS_SCALE_MAX};
use crate::schema::RecordingFile;
use crate::types::{ColumnInfo, LabeledWindow, SubjectExamples};
use crate::windower::Windower;

/// A recording reduced to labeled windows
#[derive(Debug, Clone)]
pub struct WindowedRecording {
    pub subject_id: String,
    /// Provenance of each signal-matrix column
    pub columns: Vec<ColumnInfo>,
    pub windows: Vec<LabeledWindow>,
}

/// Run load → standardize → window for one recording.
///
/// The window count depends on recording length and sentinel coverage and is
/// not fixed a priori.
pub fn process_recording(
    record: &RecordingFile,
    config: &PipelineConfig,
) -> Result<WindowedRecording, CorpusError> {
    let mut loaded = SignalLoader::load(record, config)?;
    Normalizer::standardize(&mut loaded.matrix);
    let windows = Windower::windows(
        &loaded.matrix,
        &loaded.labels,
        config.window_samples(),
        config.stride_samples(),
    )?;
    Ok(WindowedRecording {
        subject_id: loaded.subject_id,
        columns: loaded.columns,
        windows,
    })
}

/// Run the full per-subject pipeline: windows joined with their condition's
/// self-report vector.
pub fn process_subject(
    record: &RecordingFile,
    questionnaire: &ParsedQuestionnaire,
    config: &PipelineConfig,
) -> Result<SubjectExamples, CorpusError> {
    let windowed = process_recording(record, config)?;

    let mut examples = SubjectExamples {
        subject_id: windowed.subject_id,
        windows: Vec::with_capacity(windowed.windows.len()),
        labels: Vec::with_capacity(windowed.windows.len()),
        targets: Vec::with_capacity(windowed.windows.len()),
    };
    for window in windowed.windows {
        let target = regression_target(
            &questionnaire.responses,
            window.label,
            &config.target_adjectives,
        );
        examples.windows.push(window.data);
        examples.labels.push(window.label);
        examples.targets.push(target);
    }
    Ok(examples)
}

/// Regression target for a window with condition label `label`.
///
/// Response row `label - 1` supplies the scores, rescaled from the 1–5 scale
/// into [0, 1]. A label with no corresponding response row (or an adjective
/// missing from the vocabulary) contributes zeros, so the vector length
/// always equals the target-adjective count.
pub fn regression_target(
    responses: &[PanasResponse],
    label: i32,
    adjectives: &[String],
) -> Vec<f64> {
    let response = usize::try_from(label - 1)
        .ok()
        .and_then(|index| responses.get(index));
    match response {
        Some(response) => adjectives
            .iter()
            .map(|a| {
                response
                    .score_for(a)
                    .map(|score| score / PANAS_SCALE_MAX)
                    .unwrap_or(0.0)
            })
            .collect(),
        None => vec![0.0; adjectives.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChannelData, DeviceRecord, SCHEMA_VERSION};
    use crate::types::{ChannelKind, DeviceSelection};
    use pretty_assertions::assert_eq;

    /// 10 s chest recording at 700 Hz: label 1 for the first half, label 2
    /// for the second half.
    fn make_test_recording() -> RecordingFile {
        let eda: Vec<f64> = (0..7000)
            .map(|j| (2.0 * std::f64::consts::PI * j as f64 / 700.0).sin())
            .collect();
        let temp: Vec<f64> = (0..7000).map(|j| 32.0 + (j as f64) * 1e-4).collect();

        let mut chest = DeviceRecord::default();
        chest
            .channels
            .insert("EDA".to_string(), ChannelData::Series(eda));
        chest
            .channels
            .insert("TEMP".to_string(), ChannelData::Series(temp));

        let mut labels = vec![1; 3500];
        labels.extend(vec![2; 3500]);

        RecordingFile {
            schema_version: SCHEMA_VERSION.to_string(),
            subject_id: "S7".to_string(),
            chest: Some(chest),
            wrist: None,
            labels,
        }
    }

    fn make_test_config() -> PipelineConfig {
        PipelineConfig {
            channels: vec![ChannelKind::Eda, ChannelKind::Temp],
            devices: DeviceSelection::Chest,
            window_seconds: 2.0,
            stride_seconds: 1.0,
            ..PipelineConfig::default()
        }
    }

    fn make_responses(n: usize) -> Vec<PanasResponse> {
        (0..n)
            .map(|i| PanasResponse {
                scores: vec![(i + 1) as f64; 26],
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_windowing() {
        let record = make_test_recording();
        let config = make_test_config();

        let windowed = process_recording(&record, &config).unwrap();

        // 7000 samples at 700 Hz → 40 rows at 4 Hz; W = 8, S = 4:
        // floor((40 − 8) / 4) + 1 = 9 windows, none dropped (no sentinels).
        assert_eq!(windowed.windows.len(), 9);
        assert_eq!(windowed.columns.len(), 2);
        for window in &windowed.windows {
            assert_eq!(window.data.dim(), (8, 2));
            assert!(window.label == 1 || window.label == 2);
        }
        // Majority labeling flips from 1 to 2 across the halfway boundary
        // and never goes back.
        let labels: Vec<i32> = windowed.windows.iter().map(|w| w.label).collect();
        let first_two = labels.iter().position(|&l| l == 2).unwrap();
        assert!(labels[first_two..].iter().all(|&l| l == 2));
        assert!(labels[..first_two].iter().all(|&l| l == 1));
    }

    #[test]
    fn test_subject_examples_are_aligned() {
        let record = make_test_recording();
        let config = make_test_config();
        let questionnaire = ParsedQuestionnaire {
            responses: make_responses(2),
            row_errors: vec![],
        };

        let examples = process_subject(&record, &questionnaire, &config).unwrap();

        assert_eq!(examples.subject_id, "S7");
        assert_eq!(examples.windows.len(), examples.labels.len());
        assert_eq!(examples.windows.len(), examples.targets.len());
        for target in &examples.targets {
            assert_eq!(target.len(), config.target_adjectives.len());
        }
    }

    #[test]
    fn test_regression_target_rescaled() {
        let responses = make_responses(2);
        let adjectives = vec!["Stressed".to_string(), "Afraid".to_string()];

        // Label 2 → response row 1, every score 2 → 2/5.
        assert_eq!(
            regression_target(&responses, 2, &adjectives),
            vec![0.4, 0.4]
        );
    }

    #[test]
    fn test_regression_target_out_of_range_is_zeros() {
        let responses = make_responses(1);
        let adjectives = vec!["Stressed".to_string(), "Afraid".to_string()];

        assert_eq!(
            regression_target(&responses, 4, &adjectives),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn test_regression_target_unknown_adjective_is_zero() {
        let responses = make_responses(1);
        let adjectives = vec!["Stressed".to_string(), "Serene".to_string()];

        let target = regression_target(&responses, 1, &adjectives);
        assert_eq!(target.len(), 2);
        assert_eq!(target[0], 0.2);
        assert_eq!(target[1], 0.0);
    }
}
