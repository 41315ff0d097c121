//! Audio batch pipeline
//!
//! Runs a file list through the worker pool and serializes the outcome list
//! as a single JSON array: success records as
//! `{file, embedding, tags: [[name, score]]}`, failures as `{file, error}`.

use crate::audio::pool::{run_pool, PoolConfig};
use crate::audio::types::{AudioAnalyzer, AudioOutcome};
use crate::error::CorpusError;
use std::path::Path;

/// Analyze every file and return per-file outcomes in input order
pub fn analyze_files(
    analyzer: &dyn AudioAnalyzer,
    files: &[String],
    config: &PoolConfig,
) -> Vec<AudioOutcome> {
    run_pool(analyzer, files, config)
}

/// Serialize outcomes as a JSON array
pub fn to_json(outcomes: &[AudioOutcome]) -> Result<String, CorpusError> {
    Ok(serde_json::to_string_pretty(outcomes)?)
}

/// Write outcomes as a JSON array to `path`
pub fn write_results(outcomes: &[AudioOutcome], path: &Path) -> Result<(), CorpusError> {
    std::fs::write(path, to_json(outcomes)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::{AudioFeatures, EMBEDDING_DIM};
    use pretty_assertions::assert_eq;

    struct ConstantAnalyzer;

    impl AudioAnalyzer for ConstantAnalyzer {
        fn analyze(
            &self,
            file: &str,
            _device: usize,
        ) -> Result<(Vec<f32>, Vec<(String, f32)>), CorpusError> {
            if file.ends_with(".txt") {
                return Err(CorpusError::AudioError("not an audio file".to_string()));
            }
            Ok((vec![0.25; EMBEDDING_DIM], vec![("ambient".to_string(), 0.7)]))
        }
    }

    #[test]
    fn test_json_output_shape() {
        let outcomes = vec![
            AudioOutcome::Features(AudioFeatures {
                file: "a.mp3".to_string(),
                embedding: vec![0.1, 0.2],
                tags: vec![("jazz".to_string(), 0.6)],
            }),
            AudioOutcome::Error {
                file: "b.mp3".to_string(),
                error: "decode failed".to_string(),
            },
        ];

        let json = to_json(&outcomes).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["file"], "a.mp3");
        assert_eq!(value[0]["tags"][0][0], "jazz");
        assert_eq!(value[1]["file"], "b.mp3");
        assert_eq!(value[1]["error"], "decode failed");
        assert!(value[1].get("embedding").is_none());
    }

    #[test]
    fn test_write_results_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("features.json");
        let files = vec![
            "one.mp3".to_string(),
            "notes.txt".to_string(),
            "two.mp3".to_string(),
        ];

        let outcomes = analyze_files(&ConstantAnalyzer, &files, &PoolConfig::default());
        write_results(&outcomes, &out_path).unwrap();

        let raw = std::fs::read_to_string(&out_path).unwrap();
        let parsed: Vec<AudioOutcome> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].file(), "notes.txt");
        assert!(parsed[1].is_error());
    }
}
