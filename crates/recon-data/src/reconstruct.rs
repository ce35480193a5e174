// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Slice Reconstruction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Zero-filled reconstruction: mask k-space, centered inverse FFT, magnitude.

use ndarray::Array2;
use num_complex::Complex64;
use recon_math::complex::{complex_abs, normalize_max};
use recon_math::fft::ifft2c;
use recon_types::error::ReconResult;
use recon_types::state::{MaskType, Reconstruction};
use tracing::debug;

use crate::loader::KSpaceVolume;
use crate::mask::apply_mask;

/// Reconstruct one k-space slice after applying `mask`.
pub fn reconstruct_slice(kspace: &Array2<Complex64>, mask: MaskType) -> Reconstruction {
    let masked = apply_mask(kspace, mask);
    let image_abs = complex_abs(&ifft2c(&masked));
    debug!(%mask, shape = ?image_abs.dim(), "reconstructed slice");
    Reconstruction {
        image_abs,
        kspace: masked,
        mask,
    }
}

/// Load the middle slice of an archive and reconstruct it.
pub fn load_and_reconstruct(path: &str, key: &str, mask: MaskType) -> ReconResult<Reconstruction> {
    let volume = KSpaceVolume::open(path, key)?;
    Ok(reconstruct_slice(&volume.middle_slice(), mask))
}

/// Unmasked magnitude image scaled to peak 1, the clean x_0 for forward noising.
pub fn load_clean_image(path: &str, key: &str) -> ReconResult<Array2<f64>> {
    let recon = load_and_reconstruct(path, key, MaskType::Full)?;
    Ok(normalize_max(&recon.image_abs))
}
