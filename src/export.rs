//! Dataset export
//!
//! Encodes an assembled dataset into its persisted form: a manifest carrying
//! producer, provenance, and per-subject outcome blocks, plus the example
//! records themselves in newline-delimited or array JSON.

use crate::assembler::{Assembly, SubjectOutcome};
use crate::config::PipelineConfig;
use crate::error::CorpusError;
use crate::types::AssembledDataset;
use crate::{CORPUS_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current dataset export version
pub const DATASET_VERSION: &str = "corpus.dataset.v1";

/// Producer metadata embedded in every manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Where and when the dataset was computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestProvenance {
    pub source_root: String,
    pub computed_at_utc: String,
}

/// Manifest describing one assembled dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub dataset_version: String,
    pub producer: ManifestProducer,
    pub provenance: ManifestProvenance,
    pub config: PipelineConfig,
    pub subjects: Vec<SubjectOutcome>,
    pub total_windows: usize,
}

/// Builder producing manifests with a stable per-run instance id
pub struct ManifestBuilder {
    instance_id: String,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestBuilder {
    /// Create a builder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a builder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Build the manifest for one assembly run
    pub fn build(
        &self,
        assembly: &Assembly,
        config: &PipelineConfig,
        source_root: &str,
    ) -> DatasetManifest {
        DatasetManifest {
            dataset_version: DATASET_VERSION.to_string(),
            producer: ManifestProducer {
                name: PRODUCER_NAME.to_string(),
                version: CORPUS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ManifestProvenance {
                source_root: source_root.to_string(),
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            config: config.clone(),
            subjects: assembly.outcomes.clone(),
            total_windows: assembly.dataset.len(),
        }
    }
}

/// One exported window with its labels and provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub subject_id: String,
    pub label: i32,
    /// Regression target vector in [0, 1]
    pub target: Vec<f64>,
    /// [rows × columns] window, row-major
    pub window: Vec<Vec<f64>>,
}

/// Output encoding for example records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One example per line
    Ndjson,
    /// JSON array of examples
    Json,
    /// Pretty-printed JSON array
    JsonPretty,
}

/// Flatten an assembled dataset into serializable example records
pub fn example_records(dataset: &AssembledDataset) -> Vec<ExampleRecord> {
    (0..dataset.len())
        .map(|i| ExampleRecord {
            subject_id: dataset.subjects[i].clone(),
            label: dataset.labels[i],
            target: dataset.targets[i].clone(),
            window: dataset.windows[i]
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
        })
        .collect()
}

/// Serialize example records in the requested format
pub fn format_examples(
    records: &[ExampleRecord],
    format: ExportFormat,
) -> Result<String, CorpusError> {
    match format {
        ExportFormat::Ndjson => {
            let mut lines = Vec::with_capacity(records.len());
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        ExportFormat::Json => Ok(serde_json::to_string(records)?),
        ExportFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use pretty_assertions::assert_eq;

    fn make_test_assembly() -> Assembly {
        let mut dataset = AssembledDataset::default();
        dataset.windows.push(Array2::from_shape_fn((2, 2), |(r, c)| {
            r as f64 * 2.0 + c as f64
        }));
        dataset.labels.push(2);
        dataset.targets.push(vec![0.4, 0.8]);
        dataset.subjects.push("S5".to_string());

        Assembly {
            dataset,
            outcomes: vec![SubjectOutcome {
                subject_id: "S5".to_string(),
                windows: 1,
                skipped: None,
            }],
        }
    }

    #[test]
    fn test_manifest_fields() {
        let assembly = make_test_assembly();
        let config = PipelineConfig::default();
        let builder = ManifestBuilder::with_instance_id("test-instance".to_string());

        let manifest = builder.build(&assembly, &config, "/data/corpus");

        assert_eq!(manifest.dataset_version, DATASET_VERSION);
        assert_eq!(manifest.producer.name, PRODUCER_NAME);
        assert_eq!(manifest.producer.version, CORPUS_VERSION);
        assert_eq!(manifest.producer.instance_id, "test-instance");
        assert_eq!(manifest.provenance.source_root, "/data/corpus");
        assert_eq!(manifest.total_windows, 1);
        assert_eq!(manifest.subjects.len(), 1);
    }

    #[test]
    fn test_example_records_flatten_windows() {
        let assembly = make_test_assembly();
        let records = example_records(&assembly.dataset);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject_id, "S5");
        assert_eq!(records[0].window, vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn test_ndjson_one_line_per_example() {
        let assembly = make_test_assembly();
        let records = example_records(&assembly.dataset);

        let out = format_examples(&records, ExportFormat::Ndjson).unwrap();
        assert_eq!(out.lines().count(), 1);
        let parsed: ExampleRecord = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(parsed.label, 2);
    }

    #[test]
    fn test_json_array_roundtrip() {
        let assembly = make_test_assembly();
        let records = example_records(&assembly.dataset);

        let out = format_examples(&records, ExportFormat::Json).unwrap();
        let parsed: Vec<ExampleRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].target, vec![0.4, 0.8]);
    }
}
