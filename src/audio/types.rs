//! Core types for the audio feature pipeline

use crate::error::CorpusError;
use serde::{Deserialize, Serialize};

/// Length of the embedding vector every analyzer backend must produce
pub const EMBEDDING_DIM: usize = 512;

/// Extracted features for one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub file: String,
    /// Fixed-length embedding vector ([`EMBEDDING_DIM`] entries)
    pub embedding: Vec<f32>,
    /// (tag name, confidence) pairs, serialized as `[[name, score], ...]`
    pub tags: Vec<(String, f32)>,
}

/// Result of analyzing one file: features, or an error tagged with the
/// original file name. A failed file never aborts its batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudioOutcome {
    Features(AudioFeatures),
    Error { file: String, error: String },
}

impl AudioOutcome {
    /// The file this outcome belongs to
    pub fn file(&self) -> &str {
        match self {
            AudioOutcome::Features(f) => &f.file,
            AudioOutcome::Error { file, .. } => file,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AudioOutcome::Error { .. })
    }
}

/// Backend seam in front of pretrained embedding/tagging models.
///
/// `device` is the zero-based accelerator index the caller assigned to this
/// file; backends without accelerators may ignore it.
pub trait AudioAnalyzer: Send + Sync {
    #[allow(clippy::type_complexity)]
    fn analyze(
        &self,
        file: &str,
        device: usize,
    ) -> Result<(Vec<f32>, Vec<(String, f32)>), CorpusError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tags_serialize_as_pairs() {
        let features = AudioFeatures {
            file: "song.mp3".to_string(),
            embedding: vec![0.0; 4],
            tags: vec![("rock".to_string(), 0.9), ("guitar".to_string(), 0.5)],
        };

        let json = serde_json::to_value(&features).unwrap();
        assert_eq!(json["tags"][0][0], "rock");
        assert_eq!(json["tags"][0][1], 0.9);
    }

    #[test]
    fn test_outcome_untagged_roundtrip() {
        let error = AudioOutcome::Error {
            file: "broken.mp3".to_string(),
            error: "decode failed".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        let parsed: AudioOutcome = serde_json::from_str(&json).unwrap();

        assert!(parsed.is_error());
        assert_eq!(parsed.file(), "broken.mp3");
    }
}
