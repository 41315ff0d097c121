//! On-disk recording schema
//!
//! Defines `corpus.recording.v1`, the serialized per-subject record the
//! pipeline consumes: a label series plus a nested device → channel → array
//! mapping.

mod recording;

pub use recording::{ChannelData, DeviceRecord, RecordingFile, SCHEMA_VERSION};
