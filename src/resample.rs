//! Band-limited resampling
//!
//! Fourier-domain resampling to an explicit output length: forward FFT,
//! spectrum truncation (downsampling) or zero-padding (upsampling), inverse
//! FFT. Exact for band-limited periodic inputs; a constant signal resamples
//! to the same constant at any length.

use crate::error::CorpusError;
use rustfft::{num_complex::Complex, FftPlanner};

/// Output row count when resampling `source_rows` samples between rates.
///
/// Every channel of a recording and its label series share this count, so the
/// resampled matrix stays rectangular and aligned.
pub fn target_rows(source_rows: usize, source_rate_hz: f64, target_rate_hz: f64) -> usize {
    (source_rows as f64 * target_rate_hz / source_rate_hz).round() as usize
}

/// Resample `signal` to exactly `out_len` samples.
pub fn resample_to(signal: &[f64], out_len: usize) -> Result<Vec<f64>, CorpusError> {
    let n = signal.len();
    if n == 0 {
        return Err(CorpusError::ResampleError(
            "cannot resample an empty signal".to_string(),
        ));
    }
    if out_len == 0 {
        return Ok(Vec::new());
    }
    if out_len == n {
        return Ok(signal.to_vec());
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(out_len);

    let mut spectrum: Vec<Complex<f64>> =
        signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut spectrum);

    // Keep the frequencies both lengths can represent, drop or zero the rest.
    let mut out_spec = vec![Complex::new(0.0, 0.0); out_len];
    let nmin = n.min(out_len);
    let nyq = nmin / 2 + 1;
    out_spec[..nyq].copy_from_slice(&spectrum[..nyq]);
    if nmin > 2 {
        let tail = nmin - nyq;
        for k in 1..=tail {
            out_spec[out_len - k] = spectrum[n - k];
        }
    }
    if nmin % 2 == 0 {
        let h = nmin / 2;
        if out_len < n {
            // The output Nyquist bin absorbs both input bins that land on it,
            // keeping the spectrum conjugate-symmetric.
            out_spec[h] += spectrum[n - h];
        } else {
            // Split the input Nyquist bin across the two output bins.
            out_spec[h] *= 0.5;
            out_spec[out_len - h] = out_spec[h].conj();
        }
    }

    ifft.process(&mut out_spec);
    // rustfft transforms are unnormalized: forward picks up a factor of n,
    // the inverse none, so 1/n recovers amplitudes at the new length.
    let scale = 1.0 / n as f64;
    Ok(out_spec.iter().map(|c| c.re * scale).collect())
}

/// Resample an integer label series to `out_len`, rounding to nearest integer.
pub fn resample_labels(labels: &[i32], out_len: usize) -> Result<Vec<i32>, CorpusError> {
    let as_f64: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
    let resampled = resample_to(&as_f64, out_len)?;
    Ok(resampled.iter().map(|&v| v.round() as i32).collect())
}
