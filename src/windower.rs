//! Windowing and labeling
//!
//! Slices the normalized signal matrix into fixed-length overlapping windows.
//! A window containing any sentinel-labeled sample is discarded whole; every
//! surviving window carries the majority label of its samples, ties broken
//! toward the smaller label value.

use crate::error::CorpusError;
use crate::types::{LabeledWindow, SENTINEL_LABEL};
use ndarray::{s, Array2};
use std::collections::BTreeMap;

/// Windower producing labeled, sentinel-free windows
pub struct Windower;

impl Windower {
    /// Cut `matrix` into windows of `window` rows every `stride` rows.
    ///
    /// Scans from row 0 while `start + window <= rows`. Emitted windows keep
    /// scan order; the count before sentinel filtering is
    /// `floor((rows - window) / stride) + 1` whenever `rows >= window`.
    pub fn windows(
        matrix: &Array2<f64>,
        labels: &[i32],
        window: usize,
        stride: usize,
    ) -> Result<Vec<LabeledWindow>, CorpusError> {
        if window == 0 || stride == 0 {
            return Err(CorpusError::DimensionMismatch(format!(
                "window/stride must be positive, got {window}/{stride}"
            )));
        }
        if labels.len() != matrix.nrows() {
            return Err(CorpusError::DimensionMismatch(format!(
                "label series has {} entries for a {}-row matrix",
                labels.len(),
                matrix.nrows()
            )));
        }

        let total = matrix.nrows();
        let mut out = Vec::new();
        let mut start = 0;
        while start + window <= total {
            let window_labels = &labels[start..start + window];
            if !window_labels.contains(&SENTINEL_LABEL) {
                out.push(LabeledWindow {
                    data: matrix.slice(s![start..start + window, ..]).to_owned(),
                    label: majority_label(window_labels),
                    start,
                });
            }
            start += stride;
        }
        Ok(out)
    }
}

/// Most frequent label; ties resolve to the smallest label value.
fn majority_label(labels: &[i32]) -> i32 {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    // Ascending key iteration plus strict comparison keeps the smallest
    // label when counts tie.
    let mut best_label = SENTINEL_LABEL;
    let mut best_count = 0;
    for (&label, &count) in &counts {
        if count > best_count {
            best_label = label;
            best_count = count;
        }
    }
    best_label
}
