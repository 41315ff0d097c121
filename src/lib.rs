//! Synheart Corpus - Offline dataset builder for multimodal wearable
//! stress/affect recordings
//!
//! Corpus turns raw per-subject recordings into model-ready examples through
//! a deterministic pipeline: signal loading → per-column standardization →
//! windowing/labeling → self-report join → cross-subject assembly.
//!
//! ## Modules
//!
//! - **Biometric Pipeline**: Resolve, resample, normalize, window, and label
//!   multichannel physiological recordings, joined with PANAS self-reports
//! - **Audio Module**: Batch-extract embeddings and tags from music files via
//!   a pretrained analyzer backend on a fixed-size worker pool

pub mod assembler;
pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod questionnaire;
pub mod resample;
pub mod schema;
pub mod types;
pub mod windower;

pub use assembler::{Assembly, DatasetAssembler};
pub use config::PipelineConfig;
pub use error::CorpusError;
pub use pipeline::{process_recording, process_subject};

// Schema exports
pub use schema::{RecordingFile, SCHEMA_VERSION};

// Audio exports
pub use audio::{analyze_files, AudioAnalyzer, AudioOutcome};

/// Corpus version embedded in all dataset manifests
pub const CORPUS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for dataset manifests
pub const PRODUCER_NAME: &str = "synheart-corpus";
