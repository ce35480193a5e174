// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Figures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Composite figures built from k-space slices and the forward scheduler.

use image::GrayImage;
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;
use recon_data::reconstruct::reconstruct_slice;
use recon_diffusion::scheduler::DiffusionScheduler;
use recon_math::complex::{log_magnitude, normalize_max};
use recon_types::error::{ReconError, ReconResult};
use recon_types::state::MaskType;
use tracing::{debug, info};

use crate::render::{tile, to_gray, FigureLayout};

/// 2x3 grid. Columns: masks none, low_pass, high_pass.
/// Top row: log k-space magnitude. Bottom row: reconstructed magnitude image.
pub fn comparison_figure(kspace: &Array2<Complex64>, layout: &FigureLayout) -> ReconResult<GrayImage> {
    let mut top = Vec::with_capacity(MaskType::ALL.len());
    let mut bottom = Vec::with_capacity(MaskType::ALL.len());
    for mask in MaskType::ALL {
        let recon = reconstruct_slice(kspace, mask);
        debug!(%mask, "rendering comparison column");
        top.push(to_gray(&log_magnitude(&recon.kspace)));
        bottom.push(to_gray(&recon.image_abs));
    }
    top.extend(bottom);
    info!(
        columns = ?MaskType::ALL.map(|m| m.as_str()),
        "comparison figure: top = log k-space, bottom = image"
    );
    tile(&top, 2, MaskType::ALL.len() as u32, layout)
}

/// 1x2 grid: log k-space | reconstructed image. `mask_outer` keeps only the
/// central half of k-space.
pub fn loader_figure(
    kspace: &Array2<Complex64>,
    mask_outer: bool,
    layout: &FigureLayout,
) -> ReconResult<GrayImage> {
    let mask = if mask_outer {
        MaskType::LowPass
    } else {
        MaskType::Full
    };
    let recon = reconstruct_slice(kspace, mask);
    let panels = [
        to_gray(&log_magnitude(&recon.kspace)),
        to_gray(&recon.image_abs),
    ];
    info!(%mask, "loader figure: left = log k-space, right = image");
    tile(&panels, 1, 2, layout)
}

/// 1xN strip of x_t for each step in `steps`, starting from `clean` scaled
/// to peak 1.
pub fn forward_figure<R: Rng + ?Sized>(
    clean: &Array2<f64>,
    scheduler: &DiffusionScheduler,
    steps: &[usize],
    rng: &mut R,
    layout: &FigureLayout,
) -> ReconResult<GrayImage> {
    if steps.is_empty() {
        return Err(ReconError::ConfigError(
            "forward figure needs at least one timestep".to_string(),
        ));
    }
    let x0 = normalize_max(clean);
    let mut panels = Vec::with_capacity(steps.len());
    for &t in steps {
        let (x_t, _) = scheduler.add_noise_2d(&x0, t, rng)?;
        debug!(t, "noised clean image");
        panels.push(to_gray(&x_t));
    }
    info!(?steps, "forward figure: x_t left to right");
    tile(&panels, 1, steps.len() as u32, layout)
}
