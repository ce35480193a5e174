// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — Panel Rendering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;
use recon_types::error::{ReconError, ReconResult};
use std::path::Path;
use tracing::info;

/// Grid spacing and background for tiled figures.
#[derive(Debug, Clone, Copy)]
pub struct FigureLayout {
    /// Gap between panels and around the border [px].
    pub padding: u32,
    pub background: Luma<u8>,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            padding: 8,
            background: Luma([0]),
        }
    }
}

/// Min-max scale to 0..=255, row index as image y. Constant input renders
/// black; non-finite values render as the minimum.
pub fn to_gray(values: &Array2<f64>) -> GrayImage {
    let (h, w) = values.dim();
    let finite = values.iter().cloned().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = hi - lo;

    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let v = values[[y as usize, x as usize]];
        if !v.is_finite() || !(range > 0.0) {
            return Luma([0]);
        }
        let scaled = ((v - lo) / range * 255.0).round().clamp(0.0, 255.0);
        Luma([scaled as u8])
    })
}

/// Tile `panels` row-major into a `rows` x `cols` grid.
pub fn tile(
    panels: &[GrayImage],
    rows: u32,
    cols: u32,
    layout: &FigureLayout,
) -> ReconResult<GrayImage> {
    if panels.len() != (rows * cols) as usize || panels.is_empty() {
        return Err(ReconError::RenderError(format!(
            "grid {rows}x{cols} needs {} panels, got {}",
            rows * cols,
            panels.len()
        )));
    }
    let (pw, ph) = panels[0].dimensions();
    if let Some(bad) = panels.iter().find(|p| p.dimensions() != (pw, ph)) {
        return Err(ReconError::RenderError(format!(
            "panels must share one size: {:?} vs {:?}",
            (pw, ph),
            bad.dimensions()
        )));
    }

    let pad = layout.padding;
    let width = cols * pw + (cols + 1) * pad;
    let height = rows * ph + (rows + 1) * pad;
    let mut canvas = GrayImage::from_pixel(width, height, layout.background);

    for (idx, panel) in panels.iter().enumerate() {
        let r = idx as u32 / cols;
        let c = idx as u32 % cols;
        let x = pad + c * (pw + pad);
        let y = pad + r * (ph + pad);
        image::imageops::replace(&mut canvas, panel, x as i64, y as i64);
    }
    Ok(canvas)
}

/// Write PNG, creating parent directories.
pub fn save_png(img: &GrayImage, path: &Path) -> ReconResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| ReconError::RenderError(format!("Failed to write '{}': {e}", path.display())))?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "saved figure");
    Ok(())
}
