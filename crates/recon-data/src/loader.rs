// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — k-space Loader
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Singlecoil k-space volumes stored as NumPy archives.
//!
//! A volume is a complex array of shape (slices, H, W). `.npz` archives are
//! read by dataset name, bare `.npy` files directly. Both complex64 and
//! complex128 are accepted; a single 2D slice is promoted to one-slice volume.

use ndarray::{Array2, Array3, Axis, Ix2, Ix3, OwnedRepr};
use ndarray_npy::{NpzReader, ReadNpzError};
use num_complex::{Complex32, Complex64};
use recon_types::error::{ReconError, ReconResult};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct KSpaceVolume {
    /// Raw k-space [slices, H, W].
    pub data: Array3<Complex64>,
}

fn widen(c: &Complex32) -> Complex64 {
    Complex64::new(c.re as f64, c.im as f64)
}

fn read_complex3(npz: &mut NpzReader<File>, name: &str) -> Result<Array3<Complex64>, ReadNpzError> {
    npz.by_name::<OwnedRepr<Complex32>, Ix3>(name)
        .map(|a| a.map(widen))
        .or_else(|_| npz.by_name::<OwnedRepr<Complex64>, Ix3>(name))
        .or_else(|_| {
            npz.by_name::<OwnedRepr<Complex32>, Ix2>(name)
                .map(|a| a.map(widen).insert_axis(Axis(0)))
        })
        .or_else(|_| {
            npz.by_name::<OwnedRepr<Complex64>, Ix2>(name)
                .map(|a| a.insert_axis(Axis(0)))
        })
}

impl KSpaceVolume {
    /// Wrap an in-memory volume. Rejects empty dimensions.
    pub fn new(data: Array3<Complex64>) -> ReconResult<Self> {
        let (n_slices, h, w) = data.dim();
        if n_slices == 0 || h == 0 || w == 0 {
            return Err(ReconError::DataError(format!(
                "k-space volume must be non-empty, got shape ({n_slices}, {h}, {w})"
            )));
        }
        Ok(Self { data })
    }

    /// Open `.npy` directly, anything else as an `.npz` archive holding `key`.
    pub fn open(path: &str, key: &str) -> ReconResult<Self> {
        let is_npy = Path::new(path)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("npy"))
            .unwrap_or(false);
        if is_npy {
            Self::from_npy(path)
        } else {
            Self::from_npz(path, key)
        }
    }

    /// Load dataset `key` (or `key.npy`) from a NumPy `.npz` archive.
    pub fn from_npz(path: &str, key: &str) -> ReconResult<Self> {
        let file = File::open(path)?;
        let mut npz = NpzReader::new(file)
            .map_err(|e| ReconError::DataError(format!("Failed to open npz '{path}': {e}")))?;

        let names = npz
            .names()
            .map_err(|e| ReconError::DataError(format!("Failed to list npz '{path}': {e}")))?;
        let with_ext = format!("{key}.npy");
        let entry = names
            .iter()
            .find(|n| n.as_str() == with_ext || n.as_str() == key)
            .cloned()
            .ok_or_else(|| {
                ReconError::DataError(format!(
                    "dataset '{key}' not found in '{path}' (available: {})",
                    names.join(", ")
                ))
            })?;

        let data = read_complex3(&mut npz, &entry).map_err(|e| {
            ReconError::DataError(format!(
                "Failed to read '{entry}' from '{path}' as complex (slices, H, W): {e}"
            ))
        })?;
        info!(path, dataset = %entry, shape = ?data.dim(), "loaded k-space volume");
        Self::new(data)
    }

    /// Load a bare `.npy` complex array.
    pub fn from_npy(path: &str) -> ReconResult<Self> {
        // Surface a missing file as Io rather than a parse failure
        File::open(path)?;
        let data = ndarray_npy::read_npy::<_, Array3<Complex32>>(path)
            .map(|a| a.map(widen))
            .or_else(|_| ndarray_npy::read_npy::<_, Array3<Complex64>>(path))
            .or_else(|_| {
                ndarray_npy::read_npy::<_, Array2<Complex32>>(path)
                    .map(|a| a.map(widen).insert_axis(Axis(0)))
            })
            .or_else(|_| {
                ndarray_npy::read_npy::<_, Array2<Complex64>>(path).map(|a| a.insert_axis(Axis(0)))
            })
            .map_err(|e| {
                ReconError::DataError(format!(
                    "Failed to read '{path}' as complex (slices, H, W): {e}"
                ))
            })?;
        info!(path, shape = ?data.dim(), "loaded k-space volume");
        Self::new(data)
    }

    pub fn n_slices(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// (H, W) of each slice.
    pub fn slice_dim(&self) -> (usize, usize) {
        let (_, h, w) = self.data.dim();
        (h, w)
    }

    pub fn slice(&self, index: usize) -> ReconResult<Array2<Complex64>> {
        if index >= self.n_slices() {
            return Err(ReconError::DataError(format!(
                "slice {index} out of range for volume with {} slices",
                self.n_slices()
            )));
        }
        Ok(self.data.index_axis(Axis(0), index).to_owned())
    }

    /// Slice `n_slices / 2`, the usual pick for a representative view.
    pub fn middle_slice(&self) -> Array2<Complex64> {
        let idx = self.n_slices() / 2;
        debug!(slice = idx, of = self.n_slices(), "selecting middle slice");
        self.data.index_axis(Axis(0), idx).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::{write_npy, NpzWriter};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str, ext: &str) -> PathBuf {
        let epoch_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "recon_loader_{tag}_{}_{}.{ext}",
            std::process::id(),
            epoch_ns
        ))
    }

    fn volume_c32(n: usize, h: usize, w: usize) -> Array3<Complex32> {
        Array3::from_shape_fn((n, h, w), |(s, i, j)| {
            Complex32::new((s * 100 + i * 10 + j) as f32, -(s as f32))
        })
    }

    #[test]
    fn test_npz_complex64_roundtrip() {
        let path = temp_path("c64", "npz");
        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        writer.add_array("kspace", &volume_c32(3, 4, 5)).unwrap();
        writer.finish().unwrap();

        let vol = KSpaceVolume::from_npz(path.to_str().unwrap(), "kspace").unwrap();
        assert_eq!(vol.n_slices(), 3);
        assert_eq!(vol.slice_dim(), (4, 5));
        let mid = vol.middle_slice();
        assert!((mid[[2, 3]].re - 123.0).abs() < 1e-6);
        assert!((mid[[2, 3]].im + 1.0).abs() < 1e-6);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_npz_missing_key() {
        let path = temp_path("nokey", "npz");
        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        writer.add_array("image", &volume_c32(1, 2, 2)).unwrap();
        writer.finish().unwrap();

        let err = KSpaceVolume::from_npz(path.to_str().unwrap(), "kspace").unwrap_err();
        match err {
            ReconError::DataError(msg) => assert!(msg.contains("kspace"), "{msg}"),
            other => panic!("expected DataError, got {other:?}"),
        }

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_npz_real_dtype_rejected() {
        let path = temp_path("real", "npz");
        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        writer
            .add_array("kspace", &Array3::<f64>::zeros((2, 3, 3)))
            .unwrap();
        writer.finish().unwrap();

        let err = KSpaceVolume::from_npz(path.to_str().unwrap(), "kspace").unwrap_err();
        assert!(matches!(err, ReconError::DataError(_)));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_npy_single_slice_promoted() {
        let path = temp_path("single", "npy");
        let slice = Array2::from_elem((4, 4), Complex64::new(1.0, 2.0));
        write_npy(&path, &slice).unwrap();

        let vol = KSpaceVolume::open(path.to_str().unwrap(), "ignored").unwrap();
        assert_eq!(vol.n_slices(), 1);
        assert_eq!(vol.middle_slice(), slice);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_npy_complex64_slice_promoted() {
        let path = temp_path("single_c64", "npy");
        let slice = Array2::from_shape_fn((4, 4), |(i, j)| Complex32::new(i as f32, -(j as f32)));
        write_npy(&path, &slice).unwrap();

        let vol = KSpaceVolume::open(path.to_str().unwrap(), "kspace").unwrap();
        assert_eq!(vol.n_slices(), 1);
        assert_eq!(vol.slice_dim(), (4, 4));
        let mid = vol.middle_slice();
        assert_eq!(mid[[2, 3]], Complex64::new(2.0, -3.0));
        assert_eq!(mid, slice.map(widen));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io() {
        let err = KSpaceVolume::open("/nonexistent/file1000000.npz", "kspace").unwrap_err();
        assert!(matches!(err, ReconError::Io(_)));
    }

    #[test]
    fn test_empty_volume_rejected() {
        let err = KSpaceVolume::new(Array3::zeros((0, 4, 4))).unwrap_err();
        assert!(matches!(err, ReconError::DataError(_)));
    }

    #[test]
    fn test_slice_bounds() {
        let vol = KSpaceVolume::new(Array3::zeros((2, 3, 3))).unwrap();
        assert!(vol.slice(1).is_ok());
        assert!(vol.slice(2).is_err());
    }
}
