//! Rectangular frequency masks over centered k-space.
//!
//! The central box spans rows `[h/4, 3h/4)` and columns `[w/4, 3w/4)`.
//! Low-pass keeps only the box, high-pass keeps only its complement.

use ndarray::Array2;
use num_complex::Complex64;
use recon_types::state::MaskType;
use std::ops::Range;

/// Row and column ranges of the central half of k-space.
pub fn center_box(h: usize, w: usize) -> (Range<usize>, Range<usize>) {
    (h / 4..3 * h / 4, w / 4..3 * w / 4)
}

/// Binary mask of shape (h, w): 1.0 where k-space is kept.
pub fn build_mask(h: usize, w: usize, mask: MaskType) -> Array2<f64> {
    let (rows, cols) = center_box(h, w);
    Array2::from_shape_fn((h, w), |(i, j)| {
        let inside = rows.contains(&i) && cols.contains(&j);
        let keep = match mask {
            MaskType::Full => true,
            MaskType::LowPass => inside,
            MaskType::HighPass => !inside,
        };
        if keep {
            1.0
        } else {
            0.0
        }
    })
}

/// Multiply k-space by the mask for `mask`.
pub fn apply_mask(kspace: &Array2<Complex64>, mask: MaskType) -> Array2<Complex64> {
    if mask == MaskType::Full {
        return kspace.clone();
    }
    let (h, w) = kspace.dim();
    let weights = build_mask(h, w, mask);
    let mut out = kspace.clone();
    out.zip_mut_with(&weights, |k, &m| *k *= m);
    out
}
