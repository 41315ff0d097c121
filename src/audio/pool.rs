//! Fixed-size worker pool
//!
//! Maps a static file list over a small pool of worker threads. Device
//! assignment is round-robin by list position, fixed before any work starts;
//! there is no dynamic load balancing, no retry, and no cancellation. A
//! per-item analyzer error becomes an error-tagged outcome rather than
//! aborting the batch, and outcomes come back in input order.

use crate::audio::types::{AudioAnalyzer, AudioFeatures, AudioOutcome};
use crossbeam_channel::unbounded;

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 2;

/// Default number of accelerator devices to spread files over
pub const DEFAULT_DEVICES: usize = 2;

/// Worker pool sizing
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub workers: usize,
    pub devices: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            devices: DEFAULT_DEVICES,
        }
    }
}

/// Run every file through the analyzer on the pool.
///
/// Returns exactly one outcome per input file, in input order.
pub fn run_pool(
    analyzer: &dyn AudioAnalyzer,
    files: &[String],
    config: &PoolConfig,
) -> Vec<AudioOutcome> {
    if files.is_empty() {
        return Vec::new();
    }
    let workers = config.workers.max(1);
    let devices = config.devices.max(1);

    let (task_tx, task_rx) = unbounded::<(usize, String, usize)>();
    let (result_tx, result_rx) = unbounded::<(usize, AudioOutcome)>();

    for (index, file) in files.iter().enumerate() {
        // Static assignment: position decides the device.
        let _ = task_tx.send((index, file.clone(), index % devices));
    }
    drop(task_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok((index, file, device)) = task_rx.recv() {
                    let outcome = match analyzer.analyze(&file, device) {
                        Ok((embedding, tags)) => AudioOutcome::Features(AudioFeatures {
                            file,
                            embedding,
                            tags,
                        }),
                        Err(e) => AudioOutcome::Error {
                            file,
                            error: e.to_string(),
                        },
                    };
                    let _ = result_tx.send((index, outcome));
                }
            });
        }
    });
    drop(result_tx);

    let mut indexed: Vec<(usize, AudioOutcome)> = result_rx.iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}
