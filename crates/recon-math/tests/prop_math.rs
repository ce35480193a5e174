// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Property-Based Tests (proptest) for recon-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for recon-math using proptest.
//!
//! Covers: centered FFT inversion, Parseval energy, shift inversion,
//! max normalization.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use recon_math::complex::{energy, normalize_max};
use recon_math::fft::{fft2c, fftshift, ifft2c, ifftshift};

fn field(nrows: usize, ncols: usize, phase: f64) -> Array2<Complex64> {
    Array2::from_shape_fn((nrows, ncols), |(i, j)| {
        let x = i as f64 * 0.37 + j as f64 * 1.13 + phase;
        Complex64::new(x.sin(), (0.5 * x).cos())
    })
}

// ── Centered FFT ─────────────────────────────────────────────────────

proptest! {
    /// ifft2c undoes fft2c for odd and even sizes.
    #[test]
    fn centered_fft_inverts(
        nrows in 1usize..24,
        ncols in 1usize..24,
        phase in -3.0f64..3.0,
    ) {
        let x = field(nrows, ncols, phase);
        let back = ifft2c(&fft2c(&x));
        for ((i, j), v) in x.indexed_iter() {
            prop_assert!((back[[i, j]] - v).norm() < 1e-9,
                "mismatch at ({}, {}): {} vs {}", i, j, back[[i, j]], v);
        }
    }

    /// Orthonormal scaling preserves energy (Parseval).
    #[test]
    fn centered_fft_preserves_energy(
        nrows in 1usize..24,
        ncols in 1usize..24,
        phase in -3.0f64..3.0,
    ) {
        let x = field(nrows, ncols, phase);
        let e_image = energy(&x);
        let e_kspace = energy(&fft2c(&x));
        prop_assert!((e_image - e_kspace).abs() < 1e-8 * e_image.max(1.0),
            "energy {} vs {}", e_image, e_kspace);
    }

    /// ifftshift inverts fftshift for every shape.
    #[test]
    fn shift_inverts(nrows in 1usize..20, ncols in 1usize..20) {
        let x = field(nrows, ncols, 0.0);
        prop_assert_eq!(ifftshift(&fftshift(&x)), x.clone());
        prop_assert_eq!(fftshift(&ifftshift(&x)), x);
    }
}

// ── Normalization ────────────────────────────────────────────────────

proptest! {
    /// After normalize_max the peak is exactly 1 for positive data.
    #[test]
    fn normalize_peak_is_one(
        values in proptest::collection::vec(0.001f64..1e4, 4..64),
    ) {
        let n = values.len();
        let x = Array2::from_shape_vec((1, n), values).unwrap();
        let y = normalize_max(&x);
        let peak = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!((peak - 1.0).abs() < 1e-12);
        prop_assert!(y.iter().all(|&v| v > 0.0 && v <= 1.0));
    }
}
