// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Complex Array Helpers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Magnitude, log-magnitude and scaling helpers for k-space and images.

use ndarray::Array2;
use num_complex::Complex64;
use recon_types::constants::LOG_EPS;

/// Elementwise modulus |z|.
pub fn complex_abs(input: &Array2<Complex64>) -> Array2<f64> {
    input.mapv(|c| c.norm())
}

/// ln(|z| + LOG_EPS), the usual dynamic-range compression for k-space display.
pub fn log_magnitude(input: &Array2<Complex64>) -> Array2<f64> {
    input.mapv(|c| (c.norm() + LOG_EPS).ln())
}

/// Scale so the maximum value is 1. Arrays with no positive maximum are
/// returned unchanged.
pub fn normalize_max(input: &Array2<f64>) -> Array2<f64> {
    let max = input.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return input.clone();
    }
    input.mapv(|v| v / max)
}

/// Sum of |z|², used for energy checks across transforms.
pub fn energy(input: &Array2<Complex64>) -> f64 {
    input.iter().map(|c| c.norm_sqr()).sum()
}
