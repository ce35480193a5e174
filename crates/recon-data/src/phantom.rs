// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Synthetic Phantom
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Modified Shepp-Logan phantom and synthetic k-space volumes.
//!
//! Lets the loader, visualizer and forward-noise demo run without scanner
//! data. Slices are scaled copies of the same phantom, brightest at the
//! middle slice.

use ndarray::{Array2, Array3, Axis};
use ndarray_npy::NpzWriter;
use recon_math::fft::{fft2c, to_complex};
use recon_types::error::{ReconError, ReconResult};
use std::fs::File;
use tracing::info;

use crate::loader::KSpaceVolume;

/// Ellipse: (intensity, semi-axis a, semi-axis b, center x, center y, angle [deg]).
type Ellipse = (f64, f64, f64, f64, f64, f64);

/// Modified Shepp-Logan table (Toft's contrast-enhanced variant).
const SHEPP_LOGAN: [Ellipse; 10] = [
    (1.0, 0.69, 0.92, 0.0, 0.0, 0.0),
    (-0.8, 0.6624, 0.874, 0.0, -0.0184, 0.0),
    (-0.2, 0.11, 0.31, 0.22, 0.0, -18.0),
    (-0.2, 0.16, 0.41, -0.22, 0.0, 18.0),
    (0.1, 0.21, 0.25, 0.0, 0.35, 0.0),
    (0.1, 0.046, 0.046, 0.0, 0.1, 0.0),
    (0.1, 0.046, 0.046, 0.0, -0.1, 0.0),
    (0.1, 0.046, 0.023, -0.08, -0.605, 0.0),
    (0.1, 0.023, 0.023, 0.0, -0.606, 0.0),
    (0.1, 0.023, 0.046, 0.06, -0.605, 0.0),
];

/// Pixel center mapped into [-1, 1].
fn coord(index: usize, n: usize) -> f64 {
    (2.0 * index as f64 + 1.0) / n as f64 - 1.0
}

/// Phantom image of shape (rows, cols), values in [0, 1].
pub fn shepp_logan(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let x = coord(j, cols);
        // Row 0 is the top of the image
        let y = -coord(i, rows);
        let mut value = 0.0;
        for &(intensity, a, b, x0, y0, angle) in SHEPP_LOGAN.iter() {
            let (sin, cos) = angle.to_radians().sin_cos();
            let dx = x - x0;
            let dy = y - y0;
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if (u / a).powi(2) + (v / b).powi(2) <= 1.0 {
                value += intensity;
            }
        }
        f64::max(value, 0.0)
    })
}

/// Synthetic k-space volume of `n_slices` slices of shape (rows, cols).
pub fn phantom_volume(n_slices: usize, rows: usize, cols: usize) -> ReconResult<KSpaceVolume> {
    if n_slices == 0 || rows < 2 || cols < 2 {
        return Err(ReconError::ConfigError(format!(
            "phantom needs >= 1 slice and >= 2x2 pixels, got {n_slices} x {rows} x {cols}"
        )));
    }
    let base = shepp_logan(rows, cols);
    let mid = n_slices / 2;
    let half_span = (n_slices as f64 / 2.0).max(1.0);

    let mut data = Array3::zeros((n_slices, rows, cols));
    for (s, mut slice) in data.axis_iter_mut(Axis(0)).enumerate() {
        let offset = (s as f64 - mid as f64).abs() / half_span;
        let scale = 1.0 - 0.5 * offset;
        let image = base.mapv(|v| v * scale);
        slice.assign(&fft2c(&to_complex(&image)));
    }
    KSpaceVolume::new(data)
}

/// Write a volume to a NumPy `.npz` archive under `key`.
pub fn write_npz(path: &str, key: &str, volume: &KSpaceVolume) -> ReconResult<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = NpzWriter::new(file);
    writer
        .add_array(key, &volume.data)
        .map_err(|e| ReconError::DataError(format!("Failed to write '{key}' to '{path}': {e}")))?;
    writer
        .finish()
        .map_err(|e| ReconError::DataError(format!("Failed to finish npz '{path}': {e}")))?;
    info!(path, key, shape = ?volume.data.dim(), "wrote k-space archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::load_and_reconstruct;
    use recon_types::state::MaskType;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn test_phantom_range_and_corners() {
        let p = shepp_logan(64, 64);
        assert!(p.iter().all(|&v| (0.0..=1.0 + 1e-12).contains(&v)));
        // Outer ellipse skull at 1.0, corners empty
        assert_eq!(p[[0, 0]], 0.0);
        assert!(p.iter().any(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_skull_ring_mirrors_left_right() {
        // Only the two outer ellipses (centered on x = 0, unrotated) produce
        // exactly 1.0. The inner features are not mirror symmetric.
        let n = 64;
        let p = shepp_logan(n, n);
        let ring = |i: usize, j: usize| p[[i, j]] == 1.0;
        let mut count = 0;
        for i in 0..n {
            for j in 0..n {
                assert_eq!(ring(i, j), ring(i, n - 1 - j), "pixel ({i}, {j})");
                count += usize::from(ring(i, j));
            }
        }
        assert!(count > 0);
        // Inner features break the full-image mirror
        assert!(p
            .indexed_iter()
            .any(|((i, j), &v)| (v - p[[i, n - 1 - j]]).abs() > 1e-12));
    }

    #[test]
    fn test_volume_middle_slice_is_brightest() {
        let vol = phantom_volume(5, 16, 16).unwrap();
        let dc = |s: usize| vol.data[[s, 8, 8]].norm();
        assert!(dc(2) > dc(1));
        assert!(dc(2) > dc(4));
    }

    #[test]
    fn test_rejects_degenerate_shapes() {
        assert!(phantom_volume(0, 16, 16).is_err());
        assert!(phantom_volume(3, 1, 16).is_err());
    }

    #[test]
    fn test_archive_roundtrip_through_loader() {
        let epoch_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "recon_phantom_{}_{}.npz",
            std::process::id(),
            epoch_ns
        ));
        let path_str = path.to_str().unwrap();

        let vol = phantom_volume(3, 24, 20).unwrap();
        write_npz(path_str, "kspace", &vol).unwrap();

        let recon = load_and_reconstruct(path_str, "kspace", MaskType::Full).unwrap();
        let expected = shepp_logan(24, 20);
        for ((i, j), &v) in expected.indexed_iter() {
            assert!(
                (recon.image_abs[[i, j]] - v).abs() < 1e-9,
                "pixel ({i}, {j}): {} vs {v}",
                recon.image_abs[[i, j]]
            );
        }

        std::fs::remove_file(path).ok();
    }
}
