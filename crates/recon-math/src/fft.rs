//! 2D FFT wrappers around rustfft.
//!
//! Convention matches numpy / fastMRI:
//! - Forward FFT (fft2): unnormalized
//! - Inverse FFT (ifft2): normalized by 1/(nrows*ncols)
//! - Centered transforms (fft2c / ifft2c): orthonormal, DC at the array center

use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// Run a 1D transform over every lane of `data` along `axis`.
fn transform_lanes(data: &mut Array2<Complex64>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    let mut buf = vec![Complex64::new(0.0, 0.0); data.len_of(axis)];
    for mut lane in data.lanes_mut(axis) {
        for (b, v) in buf.iter_mut().zip(lane.iter()) {
            *b = *v;
        }
        fft.process(&mut buf);
        for (v, b) in lane.iter_mut().zip(buf.iter()) {
            *v = *b;
        }
    }
}

/// Unnormalized 2D transform in the given direction.
fn transform_2d(input: &Array2<Complex64>, direction: FftDirection) -> Array2<Complex64> {
    let mut data = input.clone();
    if data.is_empty() {
        return data;
    }
    let (nrows, ncols) = data.dim();
    let mut planner = FftPlanner::new();

    // Lanes along axis 1 are rows, along axis 0 are columns
    let row_fft = planner.plan_fft(ncols, direction);
    transform_lanes(&mut data, Axis(1), &row_fft);
    let col_fft = planner.plan_fft(nrows, direction);
    transform_lanes(&mut data, Axis(0), &col_fft);

    data
}

/// Forward 2D FFT. Matches `numpy.fft.fft2()`.
pub fn fft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    transform_2d(input, FftDirection::Forward)
}

/// Inverse 2D FFT. Matches `numpy.fft.ifft2()`.
///
/// Applies 1/(nrows*ncols) normalization.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    let n = input.len().max(1) as f64;
    let mut out = transform_2d(input, FftDirection::Inverse);
    out.mapv_inplace(|c| c / n);
    out
}

/// Circularly shift both axes: `out[(i + dr) % n, (j + dc) % m] = x[i, j]`.
fn roll2(input: &Array2<Complex64>, dr: usize, dc: usize) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    let mut out = Array2::zeros((nrows, ncols));
    for ((i, j), &v) in input.indexed_iter() {
        out[[(i + dr) % nrows, (j + dc) % ncols]] = v;
    }
    out
}

/// Move the zero-frequency bin to the center. Matches `numpy.fft.fftshift`.
pub fn fftshift(input: &Array2<Complex64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    roll2(input, nrows / 2, ncols / 2)
}

/// Inverse of [`fftshift`], differs from it for odd sizes.
pub fn ifftshift(input: &Array2<Complex64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    roll2(input, nrows - nrows / 2, ncols - ncols / 2)
}

fn ortho_scale(data: &mut Array2<Complex64>) {
    let scale = 1.0 / (data.len().max(1) as f64).sqrt();
    data.mapv_inplace(|c| c * scale);
}

/// Centered orthonormal forward FFT: image domain -> k-space.
pub fn fft2c(image: &Array2<Complex64>) -> Array2<Complex64> {
    let mut k = transform_2d(&ifftshift(image), FftDirection::Forward);
    ortho_scale(&mut k);
    fftshift(&k)
}

/// Centered orthonormal inverse FFT: k-space -> image domain.
pub fn ifft2c(kspace: &Array2<Complex64>) -> Array2<Complex64> {
    let mut x = transform_2d(&ifftshift(kspace), FftDirection::Inverse);
    ortho_scale(&mut x);
    fftshift(&x)
}

/// Lift a real image into the complex domain.
pub fn to_complex(input: &Array2<f64>) -> Array2<Complex64> {
    input.mapv(|v| Complex64::new(v, 0.0))
}
