//! Dataset assembly
//!
//! Walks a root directory of per-subject recordings, runs the per-subject
//! pipeline on every complete subject, and concatenates the results into one
//! dataset of aligned windows, labels, regression targets, and subject tags.
//!
//! A subject missing its recording or questionnaire file, or failing to load,
//! is skipped with a recorded reason — never fatal for the batch.

use crate::config::{PipelineConfig, SUBJECT_PREFIX};
use crate::error::CorpusError;
use crate::pipeline::process_subject;
use crate::questionnaire::QuestionnaireExtractor;
use crate::schema::RecordingFile;
use crate::types::{AssembledDataset, SkipReason};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Recording file name within a subject directory: `<subject>.json`
pub const RECORDING_EXTENSION: &str = "json";

/// Questionnaire file name within a subject directory: `<subject>_quest.csv`
pub const QUESTIONNAIRE_SUFFIX: &str = "_quest.csv";

/// What happened to one subject directory during assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectOutcome {
    pub subject_id: String,
    /// Number of windows this subject contributed (0 when skipped)
    pub windows: usize,
    /// Present when the subject was excluded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

/// An assembled dataset together with per-subject outcomes
#[derive(Debug, Clone)]
pub struct Assembly {
    pub dataset: AssembledDataset,
    pub outcomes: Vec<SubjectOutcome>,
}

/// Assembler joining every subject under a root directory into one dataset
pub struct DatasetAssembler {
    config: PipelineConfig,
}

impl DatasetAssembler {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Assemble all subject directories under `root`.
    ///
    /// Only directories whose name starts with the subject prefix are
    /// considered; they are processed in name order so output is
    /// deterministic. Returns an error only for problems with `root` itself
    /// or an invalid configuration — per-subject failures degrade to skips.
    pub fn assemble(&self, root: &Path) -> Result<Assembly, CorpusError> {
        self.config.validate()?;
        if !root.is_dir() {
            return Err(CorpusError::MissingFile(root.to_path_buf()));
        }

        let mut subject_dirs: Vec<PathBuf> = std::fs::read_dir(root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(SUBJECT_PREFIX))
            })
            .collect();
        subject_dirs.sort();

        let mut dataset = AssembledDataset::default();
        let mut outcomes = Vec::with_capacity(subject_dirs.len());

        for dir in subject_dirs {
            let subject_id = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            match self.process_one(&dir, &subject_id) {
                Ok(examples) => {
                    let windows = examples.len();
                    debug!("subject {subject_id}: {windows} windows");
                    outcomes.push(SubjectOutcome {
                        subject_id,
                        windows,
                        skipped: None,
                    });
                    dataset.extend_from_subject(examples);
                }
                Err(reason) => {
                    warn!("skipping subject {subject_id}: {reason:?}");
                    outcomes.push(SubjectOutcome {
                        subject_id,
                        windows: 0,
                        skipped: Some(reason),
                    });
                }
            }
        }

        Ok(Assembly { dataset, outcomes })
    }

    fn process_one(
        &self,
        dir: &Path,
        subject_id: &str,
    ) -> Result<crate::types::SubjectExamples, SkipReason> {
        let recording_path = dir.join(format!("{subject_id}.{RECORDING_EXTENSION}"));
        let questionnaire_path = dir.join(format!("{subject_id}{QUESTIONNAIRE_SUFFIX}"));

        if !recording_path.exists() {
            return Err(SkipReason::MissingRecording(recording_path));
        }
        if !questionnaire_path.exists() {
            return Err(SkipReason::MissingQuestionnaire(questionnaire_path));
        }

        let record = RecordingFile::from_path(&recording_path)
            .map_err(|e| SkipReason::LoadFailed(e.to_string()))?;
        let questionnaire = QuestionnaireExtractor::parse_file(&questionnaire_path)
            .map_err(|e| SkipReason::LoadFailed(e.to_string()))?;

        process_subject(&record, &questionnaire, &self.config)
            .map_err(|e| SkipReason::LoadFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ChannelData, DeviceRecord, SCHEMA_VERSION};
    use crate::types::{ChannelKind, DeviceSelection};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn make_test_config() -> PipelineConfig {
        PipelineConfig {
            channels: vec![ChannelKind::Eda],
            devices: DeviceSelection::Chest,
            window_seconds: 2.0,
            stride_seconds: 1.0,
            ..PipelineConfig::default()
        }
    }

    fn write_subject(root: &Path, subject_id: &str, with_quest: bool) {
        let dir = root.join(subject_id);
        fs::create_dir(&dir).unwrap();

        let eda: Vec<f64> = (0..1400)
            .map(|j| (2.0 * std::f64::consts::PI * j as f64 / 700.0).sin())
            .collect();
        let mut chest = DeviceRecord::default();
        chest
            .channels
            .insert("EDA".to_string(), ChannelData::Series(eda));
        let record = RecordingFile {
            schema_version: SCHEMA_VERSION.to_string(),
            subject_id: subject_id.to_string(),
            chest: Some(chest),
            wrist: None,
            labels: vec![1; 1400],
        };
        fs::write(
            dir.join(format!("{subject_id}.json")),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();

        if with_quest {
            let scores: Vec<String> = (0..26).map(|_| "4".to_string()).collect();
            fs::write(
                dir.join(format!("{subject_id}_quest.csv")),
                format!("# PANAS;{}\n", scores.join(";")),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_assembles_complete_subjects() {
        let root = tempfile::tempdir().unwrap();
        write_subject(root.path(), "S2", true);
        write_subject(root.path(), "S3", true);

        let assembly = DatasetAssembler::new(make_test_config())
            .assemble(root.path())
            .unwrap();

        // 1400 samples → 8 rows; W = 8, S = 4 → 1 window per subject.
        assert_eq!(assembly.dataset.len(), 2);
        assert_eq!(
            assembly.dataset.subjects,
            vec!["S2".to_string(), "S3".to_string()]
        );
        assert_eq!(assembly.dataset.labels, vec![1, 1]);
        // All scores 4 → 4/5 per target adjective.
        for target in &assembly.dataset.targets {
            assert!(target.iter().all(|&v| (v - 0.8).abs() < 1e-12));
        }
        assert!(assembly.outcomes.iter().all(|o| o.skipped.is_none()));
    }

    #[test]
    fn test_missing_questionnaire_skips_subject() {
        let root = tempfile::tempdir().unwrap();
        write_subject(root.path(), "S2", true);
        write_subject(root.path(), "S3", false);

        let assembly = DatasetAssembler::new(make_test_config())
            .assemble(root.path())
            .unwrap();

        assert_eq!(assembly.dataset.len(), 1);
        assert_eq!(assembly.dataset.subjects, vec!["S2".to_string()]);
        let skipped = &assembly.outcomes[1];
        assert_eq!(skipped.subject_id, "S3");
        assert!(matches!(
            skipped.skipped,
            Some(SkipReason::MissingQuestionnaire(_))
        ));
    }

    #[test]
    fn test_malformed_recording_skips_subject() {
        let root = tempfile::tempdir().unwrap();
        write_subject(root.path(), "S2", true);
        let bad_dir = root.path().join("S4");
        fs::create_dir(&bad_dir).unwrap();
        fs::write(bad_dir.join("S4.json"), "{ not json").unwrap();
        fs::write(bad_dir.join("S4_quest.csv"), "# PANAS;1\n").unwrap();

        let assembly = DatasetAssembler::new(make_test_config())
            .assemble(root.path())
            .unwrap();

        assert_eq!(assembly.dataset.len(), 1);
        assert!(matches!(
            assembly.outcomes[1].skipped,
            Some(SkipReason::LoadFailed(_))
        ));
    }

    #[test]
    fn test_non_subject_directories_ignored() {
        let root = tempfile::tempdir().unwrap();
        write_subject(root.path(), "S2", true);
        fs::create_dir(root.path().join("models")).unwrap();

        let assembly = DatasetAssembler::new(make_test_config())
            .assemble(root.path())
            .unwrap();

        assert_eq!(assembly.outcomes.len(), 1);
        assert_eq!(assembly.outcomes[0].subject_id, "S2");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = DatasetAssembler::new(make_test_config())
            .assemble(Path::new("/nonexistent/corpus"));
        assert!(matches!(result, Err(CorpusError::MissingFile(_))));
    }
}
