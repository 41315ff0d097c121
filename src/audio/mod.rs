//! Audio feature extraction module
//!
//! Processes batches of music files into embedding vectors and tag lists via
//! a pretrained analyzer backend, using a fixed-size worker pool with static
//! device assignment.
//!
//! Pipeline: file list → worker pool → per-file outcome → JSON dump

pub mod pipeline;
pub mod pool;
pub mod types;

pub use pipeline::{analyze_files, to_json, write_results};
pub use pool::{run_pool, PoolConfig};
pub use types::{AudioAnalyzer, AudioFeatures, AudioOutcome, EMBEDDING_DIM};
